//! Wiring for the domain services.

use std::sync::Arc;

use audit::{AuditAction, AuditTrail};
use common::{Actor, EntityKind, RecordId};
use entity_store::{EntityStore, Record};

use crate::case::{Case, CaseService};
use crate::criminal::{Criminal, CriminalService};
use crate::error::{DomainError, Result};
use crate::fir::{Fir, FirService};
use crate::locks::LockManager;
use crate::officer::{Officer, OfficerService};
use crate::user::{User, UserService};

/// Fails with `NotFound` unless every id in `ids` is stored in `store`.
pub(crate) async fn ensure_exists<T: Record>(
    store: &EntityStore<T>,
    kind: EntityKind,
    ids: impl IntoIterator<Item = RecordId>,
) -> Result<()> {
    for id in ids {
        if !store.exists(id).await {
            return Err(DomainError::not_found(kind, id));
        }
    }
    Ok(())
}

/// One entity store per record kind.
#[derive(Clone, Default)]
pub struct Stores {
    pub users: EntityStore<User>,
    pub officers: EntityStore<Officer>,
    pub criminals: EntityStore<Criminal>,
    pub firs: EntityStore<Fir>,
    pub cases: EntityStore<Case>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}

/// State shared by every service.
#[derive(Clone)]
pub(crate) struct Context {
    pub(crate) stores: Stores,
    pub(crate) locks: Arc<LockManager>,
    pub(crate) audit: AuditTrail,
}

impl Context {
    /// Counts a successful mutation and hands it to the audit trail.
    ///
    /// Must be called after the operation's domain locks are released.
    pub(crate) fn record(
        &self,
        kind: EntityKind,
        id: RecordId,
        action: AuditAction,
        actor: &Actor,
        details: impl Into<String>,
    ) {
        metrics::counter!(
            "domain_mutations_total",
            "entity" => kind.as_str(),
            "action" => action.as_str()
        )
        .increment(1);

        tracing::info!(entity = %kind, %id, %action, actor = %actor.username, "mutation applied");
        self.audit.log_action(kind, id, action, actor, details);
    }
}

/// All domain services over one set of stores, one lock manager and one
/// audit trail.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub officers: OfficerService,
    pub criminals: CriminalService,
    pub firs: FirService,
    pub cases: CaseService,
    stores: Stores,
    audit: AuditTrail,
}

impl Services {
    /// Builds the services. Must be called inside a Tokio runtime when the
    /// audit trail is created with [`AuditTrail::spawn`].
    pub fn new(stores: Stores, audit: AuditTrail) -> Self {
        let ctx = Context {
            stores: stores.clone(),
            locks: Arc::new(LockManager::new()),
            audit: audit.clone(),
        };

        Self {
            users: UserService::new(ctx.clone()),
            officers: OfficerService::new(ctx.clone()),
            criminals: CriminalService::new(ctx.clone()),
            firs: FirService::new(ctx.clone()),
            cases: CaseService::new(ctx),
            stores,
            audit,
        }
    }

    /// Creates empty stores and a fresh audit trail.
    pub fn in_memory() -> Self {
        Self::new(Stores::new(), AuditTrail::spawn())
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }
}

use audit::AuditAction;
use chrono::Utc;
use common::{Actor, EntityKind, RecordId};

use crate::assignment::{self, Assignment};
use crate::error::{DomainError, Result};
use crate::locks::LockDomain;
use crate::services::{Context, ensure_exists};

use super::{Fir, FirChanges, FirStatus, NewFir, repository};

/// Service for registering and tracking FIRs.
#[derive(Clone)]
pub struct FirService {
    ctx: Context,
}

impl FirService {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Registers a FIR. FIR numbers are unique and a referenced criminal
    /// must exist.
    #[tracing::instrument(skip(self, new, actor), fields(fir_number = %new.fir_number))]
    pub async fn create(&self, new: NewFir, actor: &Actor) -> Result<Fir> {
        new.validate()?;
        let stores = &self.ctx.stores;

        let fir = {
            let _held = self
                .ctx
                .locks
                .acquire(&Self::domains_for(new.criminal_id))
                .await;
            ensure_exists(&stores.criminals, EntityKind::Criminal, new.criminal_id).await?;
            if repository::find_by_fir_number(&stores.firs, &new.fir_number)
                .await
                .is_some()
            {
                return Err(DomainError::Conflict(format!(
                    "FIR number already exists: {}",
                    new.fir_number
                )));
            }
            stores
                .firs
                .save(Fir::from_new(new, actor, Utc::now()), None)
                .await?
        };

        self.ctx.record(
            EntityKind::Fir,
            fir.id,
            AuditAction::Create,
            actor,
            format!("Registered FIR: {}", fir.fir_number),
        );
        Ok(fir)
    }

    pub async fn get(&self, id: RecordId) -> Result<Fir> {
        self.ctx
            .stores
            .firs
            .find_by_id(id)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::Fir, id))
    }

    pub async fn get_by_number(&self, fir_number: &str) -> Result<Fir> {
        repository::find_by_fir_number(&self.ctx.stores.firs, fir_number)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::Fir, fir_number))
    }

    pub async fn list(&self) -> Vec<Fir> {
        self.ctx.stores.firs.find_all().await
    }

    pub async fn by_status(&self, status: FirStatus) -> Vec<Fir> {
        repository::find_by_status(&self.ctx.stores.firs, status).await
    }

    pub async fn by_officer(&self, officer_id: RecordId) -> Vec<Fir> {
        repository::find_by_officer_id(&self.ctx.stores.firs, officer_id).await
    }

    pub async fn by_criminal(&self, criminal_id: RecordId) -> Vec<Fir> {
        repository::find_by_criminal_id(&self.ctx.stores.firs, criminal_id).await
    }

    #[tracing::instrument(skip(self, changes, actor))]
    pub async fn update(&self, id: RecordId, changes: FirChanges, actor: &Actor) -> Result<Fir> {
        changes.validate()?;
        let stores = &self.ctx.stores;

        let fir = {
            let _held = self
                .ctx
                .locks
                .acquire(&Self::domains_for(changes.criminal_id))
                .await;
            ensure_exists(&stores.criminals, EntityKind::Criminal, changes.criminal_id).await?;
            let mut fir = stores
                .firs
                .find_by_id(id)
                .await
                .ok_or_else(|| DomainError::not_found(EntityKind::Fir, id))?;
            fir.apply(changes, actor, Utc::now());
            stores.firs.update(id, fir).await?
        };

        self.ctx.record(
            EntityKind::Fir,
            id,
            AuditAction::Update,
            actor,
            format!("Updated FIR: {}", fir.fir_number),
        );
        Ok(fir)
    }

    #[tracing::instrument(skip(self, actor))]
    pub async fn update_status(
        &self,
        id: RecordId,
        status: FirStatus,
        actor: &Actor,
    ) -> Result<Fir> {
        let firs = &self.ctx.stores.firs;

        let fir = {
            let _held = self.ctx.locks.acquire(&[LockDomain::Fir]).await;
            let mut fir = firs
                .find_by_id(id)
                .await
                .ok_or_else(|| DomainError::not_found(EntityKind::Fir, id))?;
            fir.status = status;
            fir.touch(actor, Utc::now());
            firs.update(id, fir).await?
        };

        self.ctx.record(
            EntityKind::Fir,
            id,
            AuditAction::StatusUpdate,
            actor,
            format!("Changed status to: {status}"),
        );
        Ok(fir)
    }

    /// Assigns the FIR to an officer and opens the investigation.
    #[tracing::instrument(skip(self, actor))]
    pub async fn assign_to_officer(
        &self,
        id: RecordId,
        officer_id: RecordId,
        actor: &Actor,
    ) -> Result<Fir> {
        let Assignment { record, officer, .. } = assignment::assign_to_officer(
            &self.ctx.stores.firs,
            &self.ctx.stores.officers,
            &self.ctx.locks,
            id,
            officer_id,
            actor,
        )
        .await?;

        self.ctx.record(
            EntityKind::Fir,
            id,
            AuditAction::Assign,
            actor,
            format!("Assigned to officer: {}", officer.name),
        );
        Ok(record)
    }

    /// Deletes a FIR and releases its officer's FIR counter.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, id: RecordId, actor: &Actor) -> Result<()> {
        let fir = assignment::delete_assigned(
            &self.ctx.stores.firs,
            &self.ctx.stores.officers,
            &self.ctx.locks,
            id,
        )
        .await?;

        self.ctx.record(
            EntityKind::Fir,
            id,
            AuditAction::Delete,
            actor,
            format!("Deleted FIR: {}", fir.fir_number),
        );
        Ok(())
    }

    fn domains_for(criminal_id: Option<RecordId>) -> Vec<LockDomain> {
        match criminal_id {
            Some(_) => vec![LockDomain::Criminal, LockDomain::Fir],
            None => vec![LockDomain::Fir],
        }
    }
}

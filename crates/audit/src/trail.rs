//! Asynchronous audit trail.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use common::{Actor, EntityKind, RecordId};
use entity_store::EntityStore;
use tokio::sync::{mpsc, oneshot};

use crate::{AuditAction, AuditLogEntry, AuditQuery};

/// A logging request waiting for the writer task.
#[derive(Debug)]
struct PendingEntry {
    entity_type: EntityKind,
    entity_id: RecordId,
    action: AuditAction,
    actor: Actor,
    details: String,
}

enum WriterCommand {
    Write(PendingEntry),
    Flush(oneshot::Sender<()>),
}

/// Append-only audit log fed through an unbounded queue.
///
/// [`AuditTrail::log_action`] never waits: it enqueues the request and
/// returns. A dedicated writer task builds each [`AuditLogEntry`] (stamping
/// the time it is built, not the time it was requested) and saves it into the
/// trail's own [`EntityStore`], which assigns the id.
///
/// The queue is unbounded: producers are never blocked or dropped, and memory
/// grows with the backlog. Its depth is exported as the `audit_queue_depth`
/// gauge. A write that cannot be enqueued is logged and counted in
/// `audit_entries_dropped_total`; it is never reported to the caller.
///
/// Cloning yields another handle to the same trail. The writer stops once every
/// handle is dropped.
#[derive(Clone)]
pub struct AuditTrail {
    store: EntityStore<AuditLogEntry>,
    queue: mpsc::UnboundedSender<WriterCommand>,
    depth: Arc<AtomicUsize>,
}

impl AuditTrail {
    /// Creates a trail with an empty store and spawns its writer task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn() -> Self {
        Self::with_store(EntityStore::new())
    }

    /// Creates a trail writing into `store` and spawns its writer task.
    pub fn with_store(store: EntityStore<AuditLogEntry>) -> Self {
        let (queue, receiver) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));

        tokio::spawn(run_writer(store.clone(), receiver, Arc::clone(&depth)));

        Self {
            store,
            queue,
            depth,
        }
    }

    /// Records a mutation without waiting for it to be stored.
    pub fn log_action(
        &self,
        entity_type: EntityKind,
        entity_id: RecordId,
        action: AuditAction,
        actor: &Actor,
        details: impl Into<String>,
    ) {
        let pending = PendingEntry {
            entity_type,
            entity_id,
            action,
            actor: actor.clone(),
            details: details.into(),
        };

        let depth = self.depth.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::gauge!("audit_queue_depth").set(depth as f64);

        if let Err(mpsc::error::SendError(WriterCommand::Write(lost))) =
            self.queue.send(WriterCommand::Write(pending))
        {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            metrics::counter!("audit_entries_dropped_total").increment(1);
            tracing::warn!(
                entity_type = %lost.entity_type,
                entity_id = %lost.entity_id,
                action = %lost.action,
                "audit writer unavailable, entry dropped"
            );
        }
    }

    /// Waits until every entry enqueued before this call has been stored.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.queue.send(WriterCommand::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Returns the number of requests not yet written.
    pub fn pending(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    pub async fn get_all_logs(&self) -> Vec<AuditLogEntry> {
        self.store.find_all().await
    }

    pub async fn get_logs_by_entity_type(&self, entity_type: EntityKind) -> Vec<AuditLogEntry> {
        self.query(AuditQuery::new().entity_type(entity_type)).await
    }

    pub async fn get_logs_by_entity_id(&self, entity_id: RecordId) -> Vec<AuditLogEntry> {
        self.query(AuditQuery::new().entity_id(entity_id)).await
    }

    pub async fn get_logs_by_user_id(&self, user_id: RecordId) -> Vec<AuditLogEntry> {
        self.query(AuditQuery::new().user_id(user_id)).await
    }

    /// Returns entries with `start <= timestamp <= end`.
    pub async fn get_logs_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<AuditLogEntry> {
        self.query(AuditQuery::new().from_timestamp(start).to_timestamp(end))
            .await
    }

    /// Returns entries matching every filter of `query`, in id order.
    pub async fn query(&self, query: AuditQuery) -> Vec<AuditLogEntry> {
        let mut entries = self.store.find_by(|entry| query.matches(entry)).await;
        if let Some(limit) = query.limit {
            entries.truncate(limit);
        }
        entries
    }

    /// Returns the number of stored entries.
    pub async fn count(&self) -> usize {
        self.store.count().await
    }

    /// Removes every stored entry. Intended for test resets.
    pub async fn clear(&self) {
        self.store.clear().await;
    }
}

async fn run_writer(
    store: EntityStore<AuditLogEntry>,
    mut receiver: mpsc::UnboundedReceiver<WriterCommand>,
    depth: Arc<AtomicUsize>,
) {
    tracing::debug!("audit writer started");

    while let Some(command) = receiver.recv().await {
        match command {
            WriterCommand::Write(pending) => {
                let entry = AuditLogEntry::create(
                    pending.entity_type,
                    pending.entity_id,
                    pending.action,
                    &pending.actor,
                    pending.details,
                );
                let saved = store.save(entry, None).await;

                let remaining = depth.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
                metrics::gauge!("audit_queue_depth").set(remaining as f64);
                match saved {
                    Ok(stored) => {
                        metrics::counter!("audit_entries_written_total").increment(1);
                        tracing::trace!(
                            audit_id = %stored.id(),
                            entity_type = %stored.entity_type(),
                            entity_id = %stored.entity_id(),
                            action = %stored.action(),
                            "audit entry written"
                        );
                    }
                    Err(error) => {
                        metrics::counter!("audit_entries_dropped_total").increment(1);
                        tracing::error!(%error, "audit entry could not be stored");
                    }
                }
            }
            WriterCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    tracing::debug!("audit writer stopped");
}

use audit::AuditAction;
use chrono::Utc;
use common::{Actor, EntityKind, RecordId};

use crate::error::{DomainError, Result};
use crate::locks::LockDomain;
use crate::services::Context;

use super::{Criminal, CriminalChanges, CriminalStatus, NewCriminal, repository};

/// Service for managing criminal records.
#[derive(Clone)]
pub struct CriminalService {
    ctx: Context,
}

impl CriminalService {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    #[tracing::instrument(skip(self, new, actor), fields(name = %new.name))]
    pub async fn create(&self, new: NewCriminal, actor: &Actor) -> Result<Criminal> {
        new.validate()?;

        let criminal = {
            let _held = self.ctx.locks.acquire(&[LockDomain::Criminal]).await;
            self.ctx
                .stores
                .criminals
                .save(Criminal::from_new(new, actor, Utc::now()), None)
                .await?
        };

        self.ctx.record(
            EntityKind::Criminal,
            criminal.id,
            AuditAction::Create,
            actor,
            format!("Created criminal record: {}", criminal.name),
        );
        Ok(criminal)
    }

    pub async fn get(&self, id: RecordId) -> Result<Criminal> {
        self.ctx
            .stores
            .criminals
            .find_by_id(id)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::Criminal, id))
    }

    pub async fn list(&self) -> Vec<Criminal> {
        self.ctx.stores.criminals.find_all().await
    }

    pub async fn by_status(&self, status: CriminalStatus) -> Vec<Criminal> {
        repository::find_by_status(&self.ctx.stores.criminals, status).await
    }

    pub async fn search(&self, name: &str) -> Vec<Criminal> {
        repository::search_by_name(&self.ctx.stores.criminals, name).await
    }

    #[tracing::instrument(skip(self, changes, actor))]
    pub async fn update(
        &self,
        id: RecordId,
        changes: CriminalChanges,
        actor: &Actor,
    ) -> Result<Criminal> {
        changes.validate()?;
        let criminal = self
            .modify(id, |criminal| criminal.apply(changes, actor, Utc::now()))
            .await?;

        self.ctx.record(
            EntityKind::Criminal,
            id,
            AuditAction::Update,
            actor,
            format!("Updated criminal record: {}", criminal.name),
        );
        Ok(criminal)
    }

    #[tracing::instrument(skip(self, actor))]
    pub async fn update_status(
        &self,
        id: RecordId,
        status: CriminalStatus,
        actor: &Actor,
    ) -> Result<Criminal> {
        let criminal = self
            .modify(id, |criminal| {
                criminal.status = status;
                criminal.touch(actor, Utc::now());
            })
            .await?;

        self.ctx.record(
            EntityKind::Criminal,
            id,
            AuditAction::StatusUpdate,
            actor,
            format!("Changed status to: {status}"),
        );
        Ok(criminal)
    }

    /// Deletes a criminal record. Cases and FIRs that reference it keep the id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, id: RecordId, actor: &Actor) -> Result<()> {
        let criminals = &self.ctx.stores.criminals;

        let criminal = {
            let _held = self.ctx.locks.acquire(&[LockDomain::Criminal]).await;
            let criminal = criminals
                .find_by_id(id)
                .await
                .ok_or_else(|| DomainError::not_found(EntityKind::Criminal, id))?;
            criminals.delete(id).await;
            criminal
        };

        self.ctx.record(
            EntityKind::Criminal,
            id,
            AuditAction::Delete,
            actor,
            format!("Deleted criminal record: {}", criminal.name),
        );
        Ok(())
    }

    /// Loads, edits and stores one record under the Criminal lock.
    async fn modify<F>(&self, id: RecordId, edit: F) -> Result<Criminal>
    where
        F: FnOnce(&mut Criminal),
    {
        let criminals = &self.ctx.stores.criminals;
        let _held = self.ctx.locks.acquire(&[LockDomain::Criminal]).await;

        let mut criminal = criminals
            .find_by_id(id)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::Criminal, id))?;
        edit(&mut criminal);
        Ok(criminals.update(id, criminal).await?)
    }
}

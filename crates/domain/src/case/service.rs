use audit::AuditAction;
use chrono::Utc;
use common::{Actor, EntityKind, RecordId};

use crate::assignment::{self, Assignment};
use crate::error::{DomainError, Result};
use crate::locks::LockDomain;
use crate::services::{Context, ensure_exists};

use super::{Case, CaseChanges, CaseStatus, NewCase, repository};

/// Service for filing and tracking court cases.
#[derive(Clone)]
pub struct CaseService {
    ctx: Context,
}

impl CaseService {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Files a case. Case numbers are unique and every referenced criminal
    /// and FIR must exist.
    #[tracing::instrument(skip(self, new, actor), fields(case_number = %new.case_number))]
    pub async fn create(&self, new: NewCase, actor: &Actor) -> Result<Case> {
        new.validate()?;

        let case = {
            let _held = self
                .ctx
                .locks
                .acquire(&Self::domains_for(&new.criminal_ids, &new.fir_ids))
                .await;
            self.ensure_references(&new.criminal_ids, &new.fir_ids)
                .await?;
            if repository::find_by_case_number(&self.ctx.stores.cases, &new.case_number)
                .await
                .is_some()
            {
                return Err(DomainError::Conflict(format!(
                    "Case number already exists: {}",
                    new.case_number
                )));
            }
            self.ctx
                .stores
                .cases
                .save(Case::from_new(new, actor, Utc::now()), None)
                .await?
        };

        self.ctx.record(
            EntityKind::Case,
            case.id,
            AuditAction::Create,
            actor,
            format!("Created case: {}", case.case_number),
        );
        Ok(case)
    }

    pub async fn get(&self, id: RecordId) -> Result<Case> {
        self.ctx
            .stores
            .cases
            .find_by_id(id)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::Case, id))
    }

    pub async fn get_by_number(&self, case_number: &str) -> Result<Case> {
        repository::find_by_case_number(&self.ctx.stores.cases, case_number)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::Case, case_number))
    }

    pub async fn list(&self) -> Vec<Case> {
        self.ctx.stores.cases.find_all().await
    }

    pub async fn by_status(&self, status: CaseStatus) -> Vec<Case> {
        repository::find_by_status(&self.ctx.stores.cases, status).await
    }

    pub async fn by_officer(&self, officer_id: RecordId) -> Vec<Case> {
        repository::find_by_officer_id(&self.ctx.stores.cases, officer_id).await
    }

    pub async fn by_criminal(&self, criminal_id: RecordId) -> Vec<Case> {
        repository::find_by_criminal_id(&self.ctx.stores.cases, criminal_id).await
    }

    #[tracing::instrument(skip(self, changes, actor))]
    pub async fn update(&self, id: RecordId, changes: CaseChanges, actor: &Actor) -> Result<Case> {
        changes.validate()?;
        let cases = &self.ctx.stores.cases;

        let case = {
            let _held = self
                .ctx
                .locks
                .acquire(&Self::domains_for(&changes.criminal_ids, &changes.fir_ids))
                .await;
            let mut case = cases
                .find_by_id(id)
                .await
                .ok_or_else(|| DomainError::not_found(EntityKind::Case, id))?;
            self.ensure_references(&changes.criminal_ids, &changes.fir_ids)
                .await?;
            case.apply(changes, actor, Utc::now());
            cases.update(id, case).await?
        };

        self.ctx.record(
            EntityKind::Case,
            id,
            AuditAction::Update,
            actor,
            format!("Updated case: {}", case.case_number),
        );
        Ok(case)
    }

    #[tracing::instrument(skip(self, actor))]
    pub async fn update_status(
        &self,
        id: RecordId,
        status: CaseStatus,
        actor: &Actor,
    ) -> Result<Case> {
        let cases = &self.ctx.stores.cases;

        let case = {
            let _held = self.ctx.locks.acquire(&[LockDomain::Case]).await;
            let mut case = cases
                .find_by_id(id)
                .await
                .ok_or_else(|| DomainError::not_found(EntityKind::Case, id))?;
            case.status = status;
            case.touch(actor, Utc::now());
            cases.update(id, case).await?
        };

        self.ctx.record(
            EntityKind::Case,
            id,
            AuditAction::StatusUpdate,
            actor,
            format!("Changed status to: {status}"),
        );
        Ok(case)
    }

    /// Makes `officer_id` the investigating officer. The case status is kept.
    #[tracing::instrument(skip(self, actor))]
    pub async fn assign_to_officer(
        &self,
        id: RecordId,
        officer_id: RecordId,
        actor: &Actor,
    ) -> Result<Case> {
        let Assignment { record, officer, .. } = assignment::assign_to_officer(
            &self.ctx.stores.cases,
            &self.ctx.stores.officers,
            &self.ctx.locks,
            id,
            officer_id,
            actor,
        )
        .await?;

        self.ctx.record(
            EntityKind::Case,
            id,
            AuditAction::Assign,
            actor,
            format!("Assigned to officer: {}", officer.name),
        );
        Ok(record)
    }

    /// Deletes a case and releases its officer's case counter.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, id: RecordId, actor: &Actor) -> Result<()> {
        let case = assignment::delete_assigned(
            &self.ctx.stores.cases,
            &self.ctx.stores.officers,
            &self.ctx.locks,
            id,
        )
        .await?;

        self.ctx.record(
            EntityKind::Case,
            id,
            AuditAction::Delete,
            actor,
            format!("Deleted case: {}", case.case_number),
        );
        Ok(())
    }

    async fn ensure_references(&self, criminal_ids: &[RecordId], fir_ids: &[RecordId]) -> Result<()> {
        let stores = &self.ctx.stores;
        ensure_exists(&stores.criminals, EntityKind::Criminal, criminal_ids.iter().copied()).await?;
        ensure_exists(&stores.firs, EntityKind::Fir, fir_ids.iter().copied()).await
    }

    fn domains_for(criminal_ids: &[RecordId], fir_ids: &[RecordId]) -> Vec<LockDomain> {
        let mut domains = vec![LockDomain::Case];
        if !criminal_ids.is_empty() {
            domains.push(LockDomain::Criminal);
        }
        if !fir_ids.is_empty() {
            domains.push(LockDomain::Fir);
        }
        domains
    }
}

use audit::AuditAction;
use chrono::Utc;
use common::{Actor, EntityKind, RecordId};
use serde::Serialize;

use crate::case::{self, Case};
use crate::error::{DomainError, Result};
use crate::fir::{self, Fir};
use crate::locks::LockDomain;
use crate::services::Context;

use super::{NewOfficer, Officer, OfficerChanges, OfficerStatus, Workload, repository};

/// An officer together with the cases and FIRs assigned to them, read at a
/// single point in time.
#[derive(Debug, Clone, Serialize)]
pub struct OfficerWorkload {
    pub officer: Officer,
    pub cases: Vec<Case>,
    pub firs: Vec<Fir>,
}

impl OfficerWorkload {
    /// True when the stored counters match the assigned records.
    pub fn is_consistent(&self) -> bool {
        self.officer.active_cases as usize == self.cases.len()
            && self.officer.active_firs as usize == self.firs.len()
    }
}

/// Service for managing officers.
#[derive(Clone)]
pub struct OfficerService {
    ctx: Context,
}

impl OfficerService {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Registers an officer with empty workload counters.
    #[tracing::instrument(skip(self, new, actor), fields(badge = %new.badge_number))]
    pub async fn create(&self, new: NewOfficer, actor: &Actor) -> Result<Officer> {
        new.validate()?;
        let officers = &self.ctx.stores.officers;

        let officer = {
            let _held = self.ctx.locks.acquire(&[LockDomain::Officer]).await;
            if repository::find_by_badge_number(officers, &new.badge_number)
                .await
                .is_some()
            {
                return Err(DomainError::Conflict(format!(
                    "Badge number already exists: {}",
                    new.badge_number
                )));
            }
            officers.save(Officer::from_new(new, Utc::now()), None).await?
        };

        self.ctx.record(
            EntityKind::Officer,
            officer.id,
            AuditAction::Create,
            actor,
            format!("Created officer: {}", officer.name),
        );
        Ok(officer)
    }

    pub async fn get(&self, id: RecordId) -> Result<Officer> {
        self.ctx
            .stores
            .officers
            .find_by_id(id)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::Officer, id))
    }

    pub async fn get_by_badge(&self, badge_number: &str) -> Result<Officer> {
        repository::find_by_badge_number(&self.ctx.stores.officers, badge_number)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::Officer, badge_number))
    }

    pub async fn list(&self) -> Vec<Officer> {
        self.ctx.stores.officers.find_all().await
    }

    pub async fn by_status(&self, status: OfficerStatus) -> Vec<Officer> {
        repository::find_by_status(&self.ctx.stores.officers, status).await
    }

    pub async fn by_department(&self, department: &str) -> Vec<Officer> {
        repository::find_by_department(&self.ctx.stores.officers, department).await
    }

    /// Applies the editable fields. Badge number and counters are kept.
    #[tracing::instrument(skip(self, changes, actor))]
    pub async fn update(
        &self,
        id: RecordId,
        changes: OfficerChanges,
        actor: &Actor,
    ) -> Result<Officer> {
        changes.validate()?;
        let officers = &self.ctx.stores.officers;

        let officer = {
            let _held = self.ctx.locks.acquire(&[LockDomain::Officer]).await;
            let mut officer = officers
                .find_by_id(id)
                .await
                .ok_or_else(|| DomainError::not_found(EntityKind::Officer, id))?;
            officer.apply(changes, Utc::now());
            officers.update(id, officer).await?
        };

        self.ctx.record(
            EntityKind::Officer,
            id,
            AuditAction::Update,
            actor,
            format!("Updated officer: {}", officer.name),
        );
        Ok(officer)
    }

    /// Removes an officer. Records still pointing at them keep the dangling
    /// id until reassigned.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, id: RecordId, actor: &Actor) -> Result<()> {
        let officers = &self.ctx.stores.officers;

        let officer = {
            let _held = self.ctx.locks.acquire(&[LockDomain::Officer]).await;
            let officer = officers
                .find_by_id(id)
                .await
                .ok_or_else(|| DomainError::not_found(EntityKind::Officer, id))?;
            officers.delete(id).await;
            officer
        };

        self.ctx.record(
            EntityKind::Officer,
            id,
            AuditAction::Delete,
            actor,
            format!("Deleted officer: {}", officer.name),
        );
        Ok(())
    }

    /// Reads an officer and their assigned records under the Case, FIR and
    /// Officer locks, so no assignment can land halfway through the read.
    #[tracing::instrument(skip(self))]
    pub async fn workload(&self, officer_id: RecordId) -> Result<OfficerWorkload> {
        let stores = &self.ctx.stores;
        let _held = self
            .ctx
            .locks
            .acquire(&[LockDomain::Case, LockDomain::Fir, LockDomain::Officer])
            .await;

        let officer = stores
            .officers
            .find_by_id(officer_id)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::Officer, officer_id))?;
        let cases = case::repository::find_by_officer_id(&stores.cases, officer_id).await;
        let firs = fir::repository::find_by_officer_id(&stores.firs, officer_id).await;

        Ok(OfficerWorkload {
            officer,
            cases,
            firs,
        })
    }

    /// Recomputes every officer's counters from the case and FIR collections.
    ///
    /// Returns the officers whose counters changed. Each corrected officer
    /// gets its own `UPDATE` audit entry; a recount that changes nothing
    /// records none.
    #[tracing::instrument(skip(self, actor))]
    pub async fn recount_workloads(&self, actor: &Actor) -> Result<Vec<Officer>> {
        let stores = &self.ctx.stores;

        let corrected = {
            let _held = self
                .ctx
                .locks
                .acquire(&[LockDomain::Case, LockDomain::Fir, LockDomain::Officer])
                .await;

            let cases = stores.cases.find_all().await;
            let firs = stores.firs.find_all().await;
            let now = Utc::now();

            let mut corrected = Vec::new();
            for mut officer in stores.officers.find_all().await {
                let id = officer.id;
                let case_count = cases
                    .iter()
                    .filter(|case| case.investigating_officer_id == Some(id))
                    .count() as u32;
                let fir_count = firs
                    .iter()
                    .filter(|fir| fir.assigned_officer_id == Some(id))
                    .count() as u32;

                if officer.load(Workload::Cases) == case_count
                    && officer.load(Workload::Firs) == fir_count
                {
                    continue;
                }

                tracing::warn!(
                    officer_id = %id,
                    stored_cases = officer.active_cases,
                    stored_firs = officer.active_firs,
                    case_count,
                    fir_count,
                    "officer workload drifted, correcting"
                );
                officer.set_load(Workload::Cases, case_count);
                officer.set_load(Workload::Firs, fir_count);
                officer.updated_at = now;
                corrected.push(stores.officers.update(id, officer).await?);
            }
            corrected
        };

        for officer in &corrected {
            self.ctx.record(
                EntityKind::Officer,
                officer.id,
                AuditAction::Update,
                actor,
                format!(
                    "Recounted workload: {} cases, {} FIRs",
                    officer.active_cases, officer.active_firs
                ),
            );
        }
        Ok(corrected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Services;

    #[tokio::test]
    async fn create_rejects_duplicate_badge() {
        let services = Services::in_memory();
        let actor = Actor::system();

        services
            .officers
            .create(NewOfficer::new("B001", "Inspector Sharma"), &actor)
            .await
            .unwrap();
        let duplicate = services
            .officers
            .create(NewOfficer::new("B001", "Someone Else"), &actor)
            .await;

        assert!(matches!(duplicate, Err(DomainError::Conflict(_))));
        assert_eq!(services.officers.list().await.len(), 1);
    }

    #[tokio::test]
    async fn create_requires_badge_and_name() {
        let services = Services::in_memory();

        let result = services
            .officers
            .create(NewOfficer::new("", "Nameless"), &Actor::system())
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn update_keeps_counters() {
        let services = Services::in_memory();
        let stores = services.stores();
        let actor = Actor::system();
        let officer = services
            .officers
            .create(NewOfficer::new("B001", "Sharma"), &actor)
            .await
            .unwrap();

        let mut stored = stores.officers.find_by_id(officer.id).await.unwrap();
        stored.active_cases = 3;
        stores.officers.update(officer.id, stored).await.unwrap();

        let mut changes = OfficerChanges::from(&officer);
        changes.department = "CID".into();
        let updated = services
            .officers
            .update(officer.id, changes, &actor)
            .await
            .unwrap();

        assert_eq!(updated.department, "CID");
        assert_eq!(updated.active_cases, 3);
    }

    #[tokio::test]
    async fn department_lookup_ignores_case() {
        let services = Services::in_memory();
        let actor = Actor::system();
        services
            .officers
            .create(NewOfficer::new("B001", "Sharma").department("CID"), &actor)
            .await
            .unwrap();
        services
            .officers
            .create(
                NewOfficer::new("B002", "Verma").department("Crime Branch"),
                &actor,
            )
            .await
            .unwrap();

        let cid = services.officers.by_department("cid").await;

        assert_eq!(cid.len(), 1);
        assert_eq!(cid[0].badge_number, "B001");
    }

    #[tokio::test]
    async fn get_missing_officer_is_not_found() {
        let services = Services::in_memory();

        let err = services.officers.get(RecordId::new(42)).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(services.officers.get_by_badge("nope").await.is_err());
    }

    #[tokio::test]
    async fn recount_repairs_drifted_counters() {
        let services = Services::in_memory();
        let stores = services.stores();
        let actor = Actor::system();
        let officer = services
            .officers
            .create(NewOfficer::new("B001", "Sharma"), &actor)
            .await
            .unwrap();

        let mut drifted = officer.clone();
        drifted.active_firs = 7;
        stores.officers.update(officer.id, drifted).await.unwrap();

        let corrected = services.officers.recount_workloads(&actor).await.unwrap();

        assert_eq!(corrected.len(), 1);
        assert_eq!(corrected[0].active_firs, 0);
        assert!(
            services
                .officers
                .workload(officer.id)
                .await
                .unwrap()
                .is_consistent()
        );
        assert!(services.officers.recount_workloads(&actor).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn recount_audits_each_corrected_officer_only() {
        let services = Services::in_memory();
        let stores = services.stores();
        let actor = Actor::system();
        let mut ids = Vec::new();
        for badge in ["B001", "B002", "B003"] {
            let officer = services
                .officers
                .create(NewOfficer::new(badge, "Officer"), &actor)
                .await
                .unwrap();
            ids.push(officer.id);
        }
        for id in &ids[..2] {
            let mut drifted = stores.officers.find_by_id(*id).await.unwrap();
            drifted.active_cases = 3;
            stores.officers.update(*id, drifted).await.unwrap();
        }

        services.officers.recount_workloads(&actor).await.unwrap();
        services.officers.recount_workloads(&actor).await.unwrap();
        services.audit().flush().await;

        let updates: Vec<_> = services
            .audit()
            .get_logs_by_entity_type(EntityKind::Officer)
            .await
            .into_iter()
            .filter(|entry| entry.action() == AuditAction::Update)
            .map(|entry| entry.entity_id())
            .collect();
        assert_eq!(updates, ids[..2].to_vec());
    }
}

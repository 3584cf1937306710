//! Cross-domain officer assignment.
//!
//! Cases and FIRs carry an optional assignee while officers carry one stored
//! counter per kind. Both sides change together under the ordered-lock
//! protocol: the record's own domain first, then `Officer`.

use chrono::{DateTime, Utc};
use common::{Actor, EntityKind, RecordId};
use entity_store::{EntityStore, Record};

use crate::error::{DomainError, Result};
use crate::locks::{LockDomain, LockManager};
use crate::officer::{Officer, Workload};

/// A record that can be assigned to one officer at a time.
pub trait Assignable: Record {
    const KIND: EntityKind;
    const DOMAIN: LockDomain;
    const WORKLOAD: Workload;

    /// Returns the currently assigned officer, if any.
    fn assignee(&self) -> Option<RecordId>;

    /// Points the record at `officer_id` and applies any status side effect.
    fn assign(&mut self, officer_id: RecordId, actor: &Actor, now: DateTime<Utc>);
}

/// Outcome of a successful assignment.
#[derive(Debug, Clone)]
pub struct Assignment<T> {
    pub record: T,
    pub officer: Officer,
    pub previous: Option<RecordId>,
}

impl<T> Assignment<T> {
    /// True when the record was already assigned to the same officer.
    pub fn is_noop_reassign(&self) -> bool {
        self.previous == Some(self.officer.id)
    }
}

/// Assigns record `id` to `officer_id`, moving one unit of workload from the
/// previous officer to the new one.
///
/// Re-assigning to the current officer leaves every counter untouched. A
/// previous officer that no longer exists is skipped. The caller emits the
/// audit event after this returns, once the locks are gone.
pub(crate) async fn assign_to_officer<T: Assignable>(
    records: &EntityStore<T>,
    officers: &EntityStore<Officer>,
    locks: &LockManager,
    id: RecordId,
    officer_id: RecordId,
    actor: &Actor,
) -> Result<Assignment<T>> {
    let _held = locks.acquire(&[T::DOMAIN, LockDomain::Officer]).await;

    let mut record = records
        .find_by_id(id)
        .await
        .ok_or_else(|| DomainError::not_found(T::KIND, id))?;
    let mut officer = officers
        .find_by_id(officer_id)
        .await
        .ok_or_else(|| DomainError::not_found(EntityKind::Officer, officer_id))?;

    let now = Utc::now();
    let previous = record.assignee();

    if previous != Some(officer_id) {
        officer.take_on(T::WORKLOAD);
        officer.updated_at = now;
        officer = officers.update(officer_id, officer).await?;

        if let Some(previous_id) = previous
            && let Some(mut previous_officer) = officers.find_by_id(previous_id).await
        {
            previous_officer.release(T::WORKLOAD);
            previous_officer.updated_at = now;
            officers.update(previous_id, previous_officer).await?;
        }
    }

    record.assign(officer_id, actor, now);
    let record = records.update(id, record).await?;

    tracing::debug!(
        kind = %T::KIND,
        %id,
        %officer_id,
        previous = ?previous,
        "record assigned"
    );

    Ok(Assignment {
        record,
        officer,
        previous,
    })
}

/// Deletes record `id` and releases its officer's counter.
///
/// Returns the deleted record. Fails with `NotFound` if it does not exist.
pub(crate) async fn delete_assigned<T: Assignable>(
    records: &EntityStore<T>,
    officers: &EntityStore<Officer>,
    locks: &LockManager,
    id: RecordId,
) -> Result<T> {
    let _held = locks.acquire(&[T::DOMAIN, LockDomain::Officer]).await;

    let record = records
        .find_by_id(id)
        .await
        .ok_or_else(|| DomainError::not_found(T::KIND, id))?;

    if let Some(officer_id) = record.assignee()
        && let Some(mut officer) = officers.find_by_id(officer_id).await
    {
        officer.release(T::WORKLOAD);
        officer.updated_at = Utc::now();
        officers.update(officer_id, officer).await?;
    }

    records.delete(id).await;
    Ok(record)
}

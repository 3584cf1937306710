//! Read-only case queries.

use common::RecordId;
use entity_store::EntityStore;

use super::{Case, CaseStatus};

pub async fn find_by_case_number(cases: &EntityStore<Case>, case_number: &str) -> Option<Case> {
    cases.find_first(|case| case.case_number == case_number).await
}

pub async fn find_by_officer_id(cases: &EntityStore<Case>, officer_id: RecordId) -> Vec<Case> {
    cases
        .find_by(|case| case.investigating_officer_id == Some(officer_id))
        .await
}

pub async fn find_by_status(cases: &EntityStore<Case>, status: CaseStatus) -> Vec<Case> {
    cases.find_by(|case| case.status == status).await
}

/// Cases naming `criminal_id` among their accused.
pub async fn find_by_criminal_id(cases: &EntityStore<Case>, criminal_id: RecordId) -> Vec<Case> {
    cases
        .find_by(|case| case.criminal_ids.contains(&criminal_id))
        .await
}

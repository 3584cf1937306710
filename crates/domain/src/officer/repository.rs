//! Read-only officer queries.

use entity_store::EntityStore;

use super::{Officer, OfficerStatus};

pub async fn find_by_badge_number(
    officers: &EntityStore<Officer>,
    badge_number: &str,
) -> Option<Officer> {
    officers
        .find_first(|officer| officer.badge_number == badge_number)
        .await
}

pub async fn find_by_status(officers: &EntityStore<Officer>, status: OfficerStatus) -> Vec<Officer> {
    officers.find_by(|officer| officer.status == status).await
}

/// Department names match ignoring case.
pub async fn find_by_department(officers: &EntityStore<Officer>, department: &str) -> Vec<Officer> {
    officers
        .find_by(|officer| officer.department.eq_ignore_ascii_case(department))
        .await
}

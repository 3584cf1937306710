use entity_store::EntityStore;

use super::{Criminal, CriminalStatus};

pub async fn find_by_status(
    criminals: &EntityStore<Criminal>,
    status: CriminalStatus,
) -> Vec<Criminal> {
    criminals.find_by(|criminal| criminal.status == status).await
}

/// Case-insensitive substring match on the name.
pub async fn search_by_name(criminals: &EntityStore<Criminal>, name: &str) -> Vec<Criminal> {
    let needle = name.to_lowercase();
    criminals
        .find_by(move |criminal| criminal.name.to_lowercase().contains(&needle))
        .await
}

use common::RecordId;
use entity_store::EntityStore;

use super::{Fir, FirStatus};

pub async fn find_by_fir_number(firs: &EntityStore<Fir>, fir_number: &str) -> Option<Fir> {
    firs.find_first(|fir| fir.fir_number == fir_number).await
}

pub async fn find_by_criminal_id(firs: &EntityStore<Fir>, criminal_id: RecordId) -> Vec<Fir> {
    firs.find_by(|fir| fir.criminal_id == Some(criminal_id)).await
}

pub async fn find_by_officer_id(firs: &EntityStore<Fir>, officer_id: RecordId) -> Vec<Fir> {
    firs.find_by(|fir| fir.assigned_officer_id == Some(officer_id))
        .await
}

pub async fn find_by_status(firs: &EntityStore<Fir>, status: FirStatus) -> Vec<Fir> {
    firs.find_by(|fir| fir.status == status).await
}

use crate::RecordId;

/// A value that can live in an [`EntityStore`](crate::EntityStore).
///
/// The store owns id assignment: it calls [`Record::set_id`] exactly once when
/// a record is first saved, and again on update to keep the stored value's id
/// equal to its key.
pub trait Record: Clone + Send + Sync + 'static {
    /// Returns the id carried by this record.
    fn id(&self) -> RecordId;

    /// Stamps the id assigned by the store.
    fn set_id(&mut self, id: RecordId);
}

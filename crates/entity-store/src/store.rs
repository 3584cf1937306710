use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::RwLock;

use crate::{Record, RecordId, Result, StoreError};

/// Generic in-memory keyed collection shared between tasks.
///
/// Cloning the store yields another handle to the same collection.
///
/// Reads (`find_*`, `count`, `exists`) share the lock; `save`, `update`,
/// `delete` and `clear` take it exclusively. The lock is Tokio's
/// [`RwLock`], which queues waiters first-in first-out, so a stream of
/// readers cannot starve a pending writer.
///
/// Every query returns an owned snapshot: later mutations are not reflected in
/// it, and no lock is held while the caller iterates.
pub struct EntityStore<T> {
    records: Arc<RwLock<BTreeMap<RecordId, T>>>,
    next_id: Arc<AtomicI64>,
}

impl<T> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T: Record> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> EntityStore<T> {
    /// Creates an empty store whose first assigned id is 1.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Stores a record and returns the stored value.
    ///
    /// Without `explicit_id` the next counter value is consumed. With an
    /// explicit id the record is stored (or replaced) under that id and the
    /// counter moves past it, so automatically assigned ids never land on a
    /// seeded one.
    ///
    /// Once the counter reaches `i64::MAX` automatic saves fail with
    /// [`StoreError::IdSpaceExhausted`]; explicit ids are still accepted.
    pub async fn save(&self, mut record: T, explicit_id: Option<RecordId>) -> Result<T> {
        let mut records = self.records.write().await;

        let id = match explicit_id {
            Some(id) => {
                self.next_id
                    .fetch_max(id.as_i64().saturating_add(1), Ordering::SeqCst);
                id
            }
            None => self
                .next_id
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                    next.checked_add(1)
                })
                .map(RecordId::new)
                .map_err(|_| StoreError::IdSpaceExhausted)?,
        };

        record.set_id(id);
        records.insert(id, record.clone());
        tracing::trace!(%id, "record saved");
        Ok(record)
    }

    /// Returns the current record stored under `id`.
    pub async fn find_by_id(&self, id: RecordId) -> Option<T> {
        self.records.read().await.get(&id).cloned()
    }

    /// Returns a snapshot of every record, ordered by id.
    pub async fn find_all(&self) -> Vec<T> {
        self.records.read().await.values().cloned().collect()
    }

    /// Returns a snapshot of the records matching `predicate`, ordered by id.
    ///
    /// The predicate runs while the read lock is held.
    pub async fn find_by<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Returns the lowest-id record matching `predicate`.
    pub async fn find_first<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .values()
            .find(|record| predicate(record))
            .cloned()
    }

    /// Replaces the record stored under `id`.
    ///
    /// Fails with [`StoreError::NotFound`] if nothing is stored under `id`.
    /// The stored value always carries `id`, whatever id `value` held.
    pub async fn update(&self, id: RecordId, mut value: T) -> Result<T> {
        let mut records = self.records.write().await;
        let slot = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        value.set_id(id);
        *slot = value.clone();
        tracing::trace!(%id, "record updated");
        Ok(value)
    }

    /// Removes the record stored under `id`. Returns false if it was absent.
    pub async fn delete(&self, id: RecordId) -> bool {
        let removed = self.records.write().await.remove(&id).is_some();
        if removed {
            tracing::trace!(%id, "record deleted");
        }
        removed
    }

    /// Returns the number of stored records.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if a record is stored under `id`.
    pub async fn exists(&self, id: RecordId) -> bool {
        self.records.read().await.contains_key(&id)
    }

    /// Returns the id the next automatic `save` would assign, without
    /// consuming it.
    ///
    /// This is not a reservation. A caller that pairs it with
    /// `save(record, Some(id))` must be the only creator for this store,
    /// e.g. by holding the owning domain lock.
    pub fn peek_next_id(&self) -> RecordId {
        RecordId::new(self.next_id.load(Ordering::SeqCst))
    }

    /// Removes every record. The id counter is left untouched.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: RecordId,
        text: String,
    }

    impl Note {
        fn new(text: &str) -> Self {
            Self {
                id: RecordId::UNASSIGNED,
                text: text.to_string(),
            }
        }
    }

    impl Record for Note {
        fn id(&self) -> RecordId {
            self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let store = EntityStore::new();

        let first = store.save(Note::new("a"), None).await.unwrap();
        let second = store.save(Note::new("b"), None).await.unwrap();

        assert_eq!(first.id, RecordId::new(1));
        assert_eq!(second.id, RecordId::new(2));
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn explicit_id_advances_counter() {
        let store = EntityStore::new();

        let seeded = store
            .save(Note::new("seed"), Some(RecordId::new(5)))
            .await
            .unwrap();
        assert_eq!(seeded.id, RecordId::new(5));
        assert_eq!(store.peek_next_id(), RecordId::new(6));

        let next = store.save(Note::new("next"), None).await.unwrap();
        assert_eq!(next.id, RecordId::new(6));
    }

    #[tokio::test]
    async fn explicit_lower_id_keeps_counter() {
        let store = EntityStore::new();
        store.save(Note::new("a"), None).await.unwrap();
        store.save(Note::new("b"), None).await.unwrap();

        store
            .save(Note::new("again"), Some(RecordId::new(1)))
            .await
            .unwrap();

        assert_eq!(store.peek_next_id(), RecordId::new(3));
        assert_eq!(
            store.find_by_id(RecordId::new(1)).await.unwrap().text,
            "again"
        );
    }

    #[tokio::test]
    async fn max_explicit_id_exhausts_automatic_ids() {
        let store = EntityStore::new();
        store.save(Note::new("a"), None).await.unwrap();

        let last = store
            .save(Note::new("last"), Some(RecordId::new(i64::MAX)))
            .await
            .unwrap();
        assert_eq!(last.id, RecordId::new(i64::MAX));

        let result = store.save(Note::new("next"), None).await;
        assert_eq!(result, Err(StoreError::IdSpaceExhausted));
        assert_eq!(
            store.find_by_id(RecordId::new(i64::MAX)).await.unwrap().text,
            "last"
        );
        assert_eq!(store.count().await, 2);

        store
            .save(Note::new("seeded"), Some(RecordId::new(7)))
            .await
            .unwrap();
        assert_eq!(store.count().await, 3);
    }

    #[tokio::test]
    async fn peek_does_not_consume() {
        let store = EntityStore::new();

        assert_eq!(store.peek_next_id(), RecordId::new(1));
        assert_eq!(store.peek_next_id(), RecordId::new(1));

        let saved = store.save(Note::new("a"), None).await.unwrap();
        assert_eq!(saved.id, RecordId::new(1));
        assert_eq!(store.peek_next_id(), RecordId::new(2));
    }

    #[tokio::test]
    async fn find_all_is_a_snapshot() {
        let store = EntityStore::new();
        let saved = store.save(Note::new("before"), None).await.unwrap();

        let snapshot = store.find_all().await;

        store
            .update(saved.id, Note::new("after"))
            .await
            .unwrap();
        store.save(Note::new("extra"), None).await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].text, "before");
    }

    #[tokio::test]
    async fn find_by_filters_under_predicate() {
        let store = EntityStore::new();
        store.save(Note::new("apple"), None).await.unwrap();
        store.save(Note::new("banana"), None).await.unwrap();
        store.save(Note::new("avocado"), None).await.unwrap();

        let a_notes = store.find_by(|n| n.text.starts_with('a')).await;
        assert_eq!(a_notes.len(), 2);
        assert_eq!(a_notes[0].text, "apple");
        assert_eq!(a_notes[1].text, "avocado");

        let first_b = store.find_first(|n| n.text.starts_with('b')).await;
        assert_eq!(first_b.unwrap().id, RecordId::new(2));
        assert!(store.find_first(|n| n.text.is_empty()).await.is_none());
    }

    #[tokio::test]
    async fn update_missing_record_fails() {
        let store: EntityStore<Note> = EntityStore::new();

        let result = store.update(RecordId::new(9), Note::new("ghost")).await;

        assert_eq!(result, Err(StoreError::NotFound(RecordId::new(9))));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn update_keeps_key_as_id() {
        let store = EntityStore::new();
        let saved = store.save(Note::new("a"), None).await.unwrap();

        let mut replacement = Note::new("b");
        replacement.id = RecordId::new(99);
        let updated = store.update(saved.id, replacement).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(store.find_by_id(saved.id).await.unwrap().text, "b");
        assert!(!store.exists(RecordId::new(99)).await);
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = EntityStore::new();
        let saved = store.save(Note::new("a"), None).await.unwrap();

        assert!(store.delete(saved.id).await);
        assert!(!store.delete(saved.id).await);
        assert!(!store.exists(saved.id).await);
        assert!(store.find_by_id(saved.id).await.is_none());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete_or_clear() {
        let store = EntityStore::new();
        let first = store.save(Note::new("a"), None).await.unwrap();
        store.delete(first.id).await;

        let second = store.save(Note::new("b"), None).await.unwrap();
        assert_eq!(second.id, RecordId::new(2));

        store.clear().await;
        assert_eq!(store.count().await, 0);

        let third = store.save(Note::new("c"), None).await.unwrap();
        assert_eq!(third.id, RecordId::new(3));
    }

    #[tokio::test]
    async fn clones_share_the_collection() {
        let store = EntityStore::new();
        let handle = store.clone();

        handle.save(Note::new("shared"), None).await.unwrap();

        assert_eq!(store.count().await, 1);
        assert_eq!(store.peek_next_id(), RecordId::new(2));
    }
}

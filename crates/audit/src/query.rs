use chrono::{DateTime, Utc};
use common::{EntityKind, RecordId};

use crate::{AuditAction, AuditLogEntry};

/// Builder for filtering audit entries.
///
/// All set filters must match. Timestamp bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// Filter by the kind of record the entry is about.
    pub entity_type: Option<EntityKind>,

    /// Filter by the id of the record the entry is about.
    pub entity_id: Option<RecordId>,

    /// Filter by the acting user's id.
    pub user_id: Option<RecordId>,

    /// Filter by action.
    pub action: Option<AuditAction>,

    /// Entries at or after this timestamp.
    pub from_timestamp: Option<DateTime<Utc>>,

    /// Entries at or before this timestamp.
    pub to_timestamp: Option<DateTime<Utc>>,

    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for every entry about one record.
    pub fn for_entity(entity_type: EntityKind, entity_id: RecordId) -> Self {
        Self {
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
            ..Default::default()
        }
    }

    pub fn entity_type(mut self, entity_type: EntityKind) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    pub fn entity_id(mut self, entity_id: RecordId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn user_id(mut self, user_id: RecordId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn from_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.from_timestamp = Some(timestamp);
        self
    }

    pub fn to_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.to_timestamp = Some(timestamp);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if `entry` passes every filter set on this query.
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(kind) = self.entity_type
            && entry.entity_type() != kind
        {
            return false;
        }
        if let Some(id) = self.entity_id
            && entry.entity_id() != id
        {
            return false;
        }
        if let Some(user_id) = self.user_id
            && entry.actor_id() != user_id
        {
            return false;
        }
        if let Some(action) = self.action
            && entry.action() != action
        {
            return false;
        }
        if let Some(from) = self.from_timestamp
            && entry.timestamp() < from
        {
            return false;
        }
        if let Some(to) = self.to_timestamp
            && entry.timestamp() > to
        {
            return false;
        }
        true
    }
}

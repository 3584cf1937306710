//! Immutable audit log entries.

use chrono::{DateTime, Utc};
use common::{Actor, EntityKind, RecordId};
use entity_store::Record;
use serde::{Deserialize, Serialize};

/// The kind of mutation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    StatusUpdate,
    Assign,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::StatusUpdate => "STATUS_UPDATE",
            AuditAction::Assign => "ASSIGN",
            AuditAction::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single audit record.
///
/// Entries have no setters. The only field ever written after construction is
/// the id, stamped once by the trail's store when the entry is saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogEntry {
    id: RecordId,
    entity_type: EntityKind,
    entity_id: RecordId,
    action: AuditAction,
    actor_username: String,
    actor_id: RecordId,
    details: String,
    source_address: String,
    timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Builds an entry stamped with the current time.
    pub fn create(
        entity_type: EntityKind,
        entity_id: RecordId,
        action: AuditAction,
        actor: &Actor,
        details: impl Into<String>,
    ) -> Self {
        Self::at(entity_type, entity_id, action, actor, details, Utc::now())
    }

    /// Builds an entry with an explicit timestamp.
    pub fn at(
        entity_type: EntityKind,
        entity_id: RecordId,
        action: AuditAction,
        actor: &Actor,
        details: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::UNASSIGNED,
            entity_type,
            entity_id,
            action,
            actor_username: actor.username.clone(),
            actor_id: actor.user_id,
            details: details.into(),
            source_address: actor.source_address.clone(),
            timestamp,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn entity_type(&self) -> EntityKind {
        self.entity_type
    }

    pub fn entity_id(&self) -> RecordId {
        self.entity_id
    }

    pub fn action(&self) -> AuditAction {
        self.action
    }

    pub fn actor_username(&self) -> &str {
        &self.actor_username
    }

    pub fn actor_id(&self) -> RecordId {
        self.actor_id
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn source_address(&self) -> &str {
        &self.source_address
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Record for AuditLogEntry {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_copies_actor_context() {
        let actor = Actor::new("admin", RecordId::new(1), "10.0.0.8");
        let entry = AuditLogEntry::create(
            EntityKind::Case,
            RecordId::new(12),
            AuditAction::Assign,
            &actor,
            "Assigned to officer: Inspector Sharma",
        );

        assert_eq!(entry.id(), RecordId::UNASSIGNED);
        assert_eq!(entry.entity_type(), EntityKind::Case);
        assert_eq!(entry.entity_id(), RecordId::new(12));
        assert_eq!(entry.action(), AuditAction::Assign);
        assert_eq!(entry.actor_username(), "admin");
        assert_eq!(entry.actor_id(), RecordId::new(1));
        assert_eq!(entry.source_address(), "10.0.0.8");
    }

    #[test]
    fn serializes_action_in_screaming_case() {
        let actor = Actor::system();
        let entry = AuditLogEntry::create(
            EntityKind::Fir,
            RecordId::new(3),
            AuditAction::StatusUpdate,
            &actor,
            "Changed status to: CLOSED",
        );

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"], "STATUS_UPDATE");
        assert_eq!(json["entity_type"], "FIR");
        assert_eq!(json["entity_id"], 3);
    }
}

//! Domain error types.

use common::EntityKind;
use entity_store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A lookup by id or unique key found nothing.
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    /// A unique key is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Required input is missing or blank.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An error reported by an entity store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn not_found(kind: EntityKind, key: impl std::fmt::Display) -> Self {
        DomainError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Returns true for both service-level and store-level misses.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::NotFound { .. } | DomainError::Store(StoreError::NotFound(_))
        )
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Fails with [`DomainError::Validation`] if `value` is blank.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(())
}

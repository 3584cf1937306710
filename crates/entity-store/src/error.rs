use thiserror::Error;

use crate::RecordId;

/// Errors that can occur when interacting with an entity store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No record is stored under the given id.
    #[error("Entity not found with id: {0}")]
    NotFound(RecordId),

    /// The id counter cannot advance past `i64::MAX`.
    #[error("No record ids left to assign")]
    IdSpaceExhausted,
}

/// Result type for entity store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

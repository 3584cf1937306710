//! Shared types for the records store.

mod types;

pub use types::{Actor, EntityKind, RecordId};

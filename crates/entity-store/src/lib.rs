//! Generic concurrent in-memory entity store.
//!
//! This crate provides:
//! - [`Record`] trait for values identified by a [`RecordId`]
//! - [`EntityStore`] keyed collection with fair reader/writer locking and
//!   monotonic id assignment
//! - [`StoreError`] for lookups that miss

pub mod error;
pub mod record;
pub mod store;

pub use common::RecordId;
pub use error::{Result, StoreError};
pub use record::Record;
pub use store::EntityStore;

//! Asynchronous audit trail for record mutations.
//!
//! This crate provides:
//! - [`AuditLogEntry`], the immutable record of one mutation
//! - [`AuditTrail`], a fire-and-forget logger backed by its own entity store
//! - [`AuditQuery`] for filtering the stored entries

pub mod entry;
pub mod query;
pub mod trail;

pub use entry::{AuditAction, AuditLogEntry};
pub use query::AuditQuery;
pub use trail::AuditTrail;

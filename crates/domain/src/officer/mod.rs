//! Officers and their workload counters.

mod model;
pub mod repository;
mod service;

pub use model::{NewOfficer, Officer, OfficerChanges, OfficerStatus, Workload};
pub use service::{OfficerService, OfficerWorkload};

//! Court cases.

mod model;
pub mod repository;
mod service;

pub use model::{Case, CaseChanges, CaseStatus, NewCase};
pub use service::CaseService;

//! First Information Reports.

mod model;
pub mod repository;
mod service;

pub use model::{Fir, FirChanges, FirStatus, NewFir};
pub use service::FirService;

mod model;
pub mod repository;
mod service;

pub use model::{Criminal, CriminalChanges, CriminalStatus, NewCriminal};
pub use service::CriminalService;

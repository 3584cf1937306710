//! System users.

mod model;
pub mod repository;
mod service;

pub use model::{NewUser, Role, User, UserChanges};
pub use service::UserService;

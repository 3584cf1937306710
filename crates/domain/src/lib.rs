//! Records domain for the police records system.
//!
//! This crate provides:
//! - Record types, repositories and services for users, officers, criminals,
//!   FIRs and cases
//! - [`LockManager`], the ordered domain locks every cross-domain write goes
//!   through
//! - Officer assignment that keeps the stored workload counters exact
//! - Sample data seeding

pub mod assignment;
pub mod case;
pub mod criminal;
pub mod error;
pub mod fir;
pub mod locks;
pub mod officer;
pub mod seed;
pub mod services;
pub mod user;

pub use assignment::{Assignable, Assignment};
pub use case::{Case, CaseChanges, CaseService, CaseStatus, NewCase};
pub use criminal::{Criminal, CriminalChanges, CriminalService, CriminalStatus, NewCriminal};
pub use error::{DomainError, Result};
pub use fir::{Fir, FirChanges, FirService, FirStatus, NewFir};
pub use locks::{LockDomain, LockManager, LockSet};
pub use officer::{
    NewOfficer, Officer, OfficerChanges, OfficerService, OfficerStatus, OfficerWorkload, Workload,
};
pub use seed::seed_sample_data;
pub use services::{Services, Stores};
pub use user::{NewUser, Role, User, UserChanges, UserService};

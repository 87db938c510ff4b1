//! Test Utilities Crate
//!
//! Shared fixtures and helpers for the workspace test suites.
//!
//! # Modules
//!
//! - `fixtures`: fixed instants and authenticated callers
//! - `builders`: builders for jeunes, conseillers, actions and rendez-vous
//! - `database`: PostgreSQL testcontainer with the schema loaded
//! - `assertions`: assertions on `DomainError` outcomes
//! - `generators`: proptest strategies

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;

//! Application layer
//!
//! Command, query and job handlers. Each command and query handler checks
//! the caller's rights through an authorizer, runs the use case against the
//! domain ports, then records an engagement event. Job handlers are driven
//! by the worker's polling loop through the [`jobs::JobDispatcher`].
//!
//! Handlers are built from a [`Contexte`] holding every adapter, so the same
//! code runs against PostgreSQL in production and in-memory mocks in tests.

pub mod authorizers;
pub mod commands;
pub mod context;
pub mod handler;
pub mod jobs;
pub mod queries;
#[cfg(any(test, feature = "mock"))]
pub mod testing;

pub use context::Contexte;
pub use handler::{CommandHandler, QueryHandler};
pub use jobs::{ConfigurationJobs, JobDispatcher, JobHandler};

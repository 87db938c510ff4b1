//! Infrastructure Database Layer
//!
//! PostgreSQL adapters for the ports declared by the domain crates, built on
//! a shared SQLx connection pool.
//!
//! # Architecture
//!
//! Each adapter owns a clone of the pool and implements one or more domain
//! ports plus `HealthCheckable`. Rows are read with runtime queries into
//! `FromRow` structs and converted to domain types in the adapter; enum
//! columns are stored with the same wire codes the domain serializes.
//!
//! Writes that span several tables (a rendez-vous and its jeunes, a liste de
//! diffusion and its membership, a transfer of jeunes and its audit rows)
//! run inside a single transaction.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresJeuneAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/pass_emploi")).await?;
//! let jeunes = PostgresJeuneAdapter::new(pool.clone());
//! ```

pub mod adapters;
pub mod error;
pub mod pool;

mod colonnes;

pub use adapters::{
    PostgresActionAdapter, PostgresAgenceAdapter, PostgresCommentaireAdapter,
    PostgresConseillerAdapter,
    PostgresEvenementAdapter, PostgresHistoriqueRendezVousAdapter, PostgresJeuneAdapter,
    PostgresListeDeDiffusionAdapter, PostgresNotificationAdapter, PostgresPlanificateurAdapter,
    PostgresRendezVousAdapter, PostgresSuggestionAdapter, PostgresSuiviJobAdapter,
};
pub use error::DatabaseError;
pub use pool::{create_pool, DatabaseConfig, DatabasePool};

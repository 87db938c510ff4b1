//! PostgreSQL adapters
//!
//! One adapter per aggregate, each implementing the matching domain port
//! together with `HealthCheckable`.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_beneficiaire::JeuneRepository;
//! use infra_db::adapters::PostgresJeuneAdapter;
//!
//! let jeunes: Arc<dyn JeuneRepository> = Arc::new(PostgresJeuneAdapter::new(pool));
//! ```

pub mod action;
pub mod conseiller;
pub mod jeune;
pub mod liste_de_diffusion;
pub mod notification;
pub mod planificateur;
pub mod rendez_vous;
pub mod suggestion;

pub use action::{PostgresActionAdapter, PostgresCommentaireAdapter};
pub use conseiller::{PostgresAgenceAdapter, PostgresConseillerAdapter};
pub use jeune::PostgresJeuneAdapter;
pub use liste_de_diffusion::PostgresListeDeDiffusionAdapter;
pub use notification::{PostgresEvenementAdapter, PostgresNotificationAdapter};
pub use planificateur::{PostgresPlanificateurAdapter, PostgresSuiviJobAdapter};
pub use rendez_vous::{PostgresHistoriqueRendezVousAdapter, PostgresRendezVousAdapter};
pub use suggestion::PostgresSuggestionAdapter;

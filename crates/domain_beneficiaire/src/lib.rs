//! Beneficiaire Domain
//!
//! Jeunes (beneficiaries), the conseillers who follow them, the agences
//! conseillers belong to, the broadcast lists a conseiller curates and the
//! job-search suggestions pushed to jeunes.
//!
//! # Portfolio model
//!
//! A jeune has exactly one current conseiller. During a temporary transfer
//! it also remembers the conseiller it was lent from
//! (`id_conseiller_initial`), who keeps read and broadcast rights on it.
//!
//! ```rust
//! use chrono::Utc;
//! use core_kernel::{ConseillerId, JeuneId, Structure};
//! use domain_beneficiaire::{Conseiller, Jeune, NouveauJeune};
//!
//! let conseiller = Conseiller {
//!     id: ConseillerId::new(),
//!     prenom: "Nils".to_string(),
//!     nom: "Tavernier".to_string(),
//!     email: None,
//!     structure: Structure::Milo,
//!     agence: None,
//!     date_derniere_connexion: None,
//! };
//! let jeune = Jeune::creer(
//!     NouveauJeune {
//!         id: JeuneId::new(),
//!         prenom: "Kenji".to_string(),
//!         nom: "Girac".to_string(),
//!         email: None,
//!         structure: Structure::Milo,
//!         id_partenaire: None,
//!     },
//!     &conseiller,
//!     Utc::now(),
//! );
//! assert!(jeune.est_suivi_par(conseiller.id));
//! ```

pub mod conseiller;
pub mod jeune;
pub mod liste_de_diffusion;
pub mod ports;
pub mod suggestion;

pub use conseiller::{Agence, AgenceDuConseiller, Conseiller};
pub use jeune::{
    transferer_les_jeunes, ConfigurationApplication, ConseillerDuJeune, Jeune,
    MiseAJourPreferences, NouveauJeune, Preferences, TransfertConseiller, TypeTransfert,
};
pub use liste_de_diffusion::{BeneficiaireDeLaListe, ListeDeDiffusion};
pub use ports::{
    AgenceRepository, ConseillerRepository, JeuneRepository, ListeDeDiffusionRepository,
    SuggestionRepository,
};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{
    MockAgenceRepository, MockConseillerRepository, MockJeuneRepository, MockListeDeDiffusionRepository,
    MockSuggestionRepository,
};
pub use suggestion::{InformationsSuggestion, SourceSuggestion, Suggestion, TypeRecherche};

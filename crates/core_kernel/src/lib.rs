//! Core Kernel - Foundational types shared by every bounded context
//!
//! - Strongly typed identifiers for jeunes, conseillers, actions, rendez-vous...
//! - The closed set of domain errors returned by handlers
//! - Port plumbing shared by repository traits and their adapters
//! - Europe/Paris calendar arithmetic (start of day, business hours)
//! - The authenticated `Utilisateur` and partner `Structure`

pub mod error;
pub mod identifiers;
pub mod ports;
pub mod structure;
pub mod temporal;
pub mod utilisateur;

pub use error::{DomainError, DomainResult};
pub use identifiers::{
    ActionId, AgenceId, CommentaireId, ConseillerId, JeuneId, ListeDeDiffusionId,
    RendezVousId, SuggestionId, SuiviJobId,
};
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
pub use structure::Structure;
pub use temporal::{Clock, FixedClock, SystemClock};
pub use utilisateur::{Role, TypeUtilisateur, Utilisateur};

//! Ownership-based authorization
//!
//! Every check either succeeds or returns `DroitsInsuffisants`. An entity
//! that cannot be found yields `DroitsInsuffisants` too, so a caller cannot
//! probe for the existence of ids it has no right on.

mod action;
mod conseiller;
mod inter_agence;
mod jeune;
mod liste_de_diffusion;
mod rendez_vous;
mod support;

pub use action::ActionAuthorizer;
pub use conseiller::ConseillerAuthorizer;
pub use inter_agence::ConseillerInterAgenceAuthorizer;
pub use jeune::JeuneAuthorizer;
pub use liste_de_diffusion::ListeDeDiffusionAuthorizer;
pub use rendez_vous::RendezVousAuthorizer;
pub use support::SupportAuthorizer;

use core_kernel::{DomainError, DomainResult};

pub(crate) fn autoriser_si(condition: bool) -> DomainResult<()> {
    if condition {
        Ok(())
    } else {
        Err(DomainError::DroitsInsuffisants)
    }
}

//! Action Domain
//!
//! Actions are the tasks a jeune works on with its conseiller. This crate
//! holds the aggregate, its statut lifecycle, the SNP qualification of
//! completed actions, comments, reminder rules and the listing rules
//! (filters, sort orders, pages of 10).

pub mod action;
pub mod commentaire;
pub mod ports;
pub mod qualification;
pub mod recherche;

pub use action::{
    Action, Createur, MiseAJourAction, NouvelleAction, StatutAction, TypeCreateur,
    JOURS_AVANT_RAPPEL,
};
pub use commentaire::Commentaire;
pub use ports::{ActionRepository, CommentaireRepository};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockActionRepository, MockCommentaireRepository};
pub use qualification::{CodeQualification, EtatQualification, Qualification};
pub use recherche::{
    FiltreActions, PageActions, Pagination, TriActions, NOMBRE_ACTIONS_PAR_PAGE,
};

//! RendezVous Domain
//!
//! Appointments between a conseiller and its jeunes, group sessions
//! (animations collectives) run by an agence, and the audit trail of every
//! change made to them.

pub mod historique;
pub mod periode;
pub mod ports;
pub mod rendez_vous;
pub mod type_rendez_vous;

pub use historique::{AuteurHistorique, HistoriqueRendezVous, OperationRendezVous};
pub use periode::{filtrer_par_periode, PeriodeRendezVous, LIMITE_RENDEZ_VOUS_PASSES};
pub use ports::{HistoriqueRendezVousRepository, RendezVousRepository};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockHistoriqueRendezVousRepository, MockRendezVousRepository};
pub use rendez_vous::{
    CreateurRendezVous, InfosRendezVousACreer, InfosRendezVousAMettreAJour, JeuneDuRendezVous,
    ModificationsRendezVous, ReaffectationAnimationCollective, RendezVous, SourceRendezVous,
    TITRE_PAR_DEFAUT,
};
pub use type_rendez_vous::CodeTypeRendezVous;

//! Query handlers and the read models they return

pub mod action;
pub mod jeune;
pub mod liste_de_diffusion;
pub mod query_models;
pub mod rendez_vous;
pub mod suggestion;

pub use action::{
    GetActionsJeuneQuery, GetActionsJeuneQueryHandler, GetDetailActionQuery,
    GetDetailActionQueryHandler,
};
pub use jeune::{
    GetDetailJeuneQuery, GetDetailJeuneQueryHandler, GetJeunesDuConseillerQuery,
    GetJeunesDuConseillerQueryHandler,
};
pub use liste_de_diffusion::{
    GetDetailListeDeDiffusionQuery, GetDetailListeDeDiffusionQueryHandler,
    GetListesDeDiffusionDuConseillerQuery, GetListesDeDiffusionDuConseillerQueryHandler,
};
pub use query_models::*;
pub use rendez_vous::{
    GetDetailRendezVousQuery, GetDetailRendezVousQueryHandler, GetRendezVousConseillerQuery,
    GetRendezVousConseillerQueryHandler, GetRendezVousJeuneQuery, GetRendezVousJeuneQueryHandler,
};
pub use suggestion::{GetSuggestionsJeuneQuery, GetSuggestionsJeuneQueryHandler};

//! Command handlers, one module per aggregate

pub mod action;
pub mod agence_conseiller;
pub mod jeune;
pub mod liste_de_diffusion;
pub mod message_groupe;
pub mod notifier_beneficiaires;
pub mod rendez_vous;
pub mod suggestion;
pub mod transfert;

pub use action::{
    AddCommentaireActionCommand, AddCommentaireActionCommandHandler, CreateActionCommand,
    CreateActionCommandHandler, DeleteActionCommand, DeleteActionCommandHandler,
    QualifierActionCommand, QualifierActionCommandHandler, UpdateActionCommand,
    UpdateActionCommandHandler,
};
pub use agence_conseiller::{UpdateAgenceConseillerCommand, UpdateAgenceConseillerCommandHandler};
pub use jeune::{
    CreerJeuneCommand, CreerJeuneCommandHandler, ModifierJeuneDuConseillerCommand,
    ModifierJeuneDuConseillerCommandHandler, SupprimerJeuneCommand, SupprimerJeuneCommandHandler,
    SupprimerJeuneInactifCommand, SupprimerJeuneInactifCommandHandler,
    UpdateJeunePreferencesCommand, UpdateJeunePreferencesCommandHandler,
    UpdateNotificationTokenCommand, UpdateNotificationTokenCommandHandler,
};
pub use liste_de_diffusion::{
    CreateListeDeDiffusionCommand, CreateListeDeDiffusionCommandHandler,
    DeleteListeDeDiffusionCommand, DeleteListeDeDiffusionCommandHandler,
    UpdateListeDeDiffusionCommand, UpdateListeDeDiffusionCommandHandler,
};
pub use message_groupe::{
    EnvoyerMessageGroupeCommand, EnvoyerMessageGroupeCommandHandler, PieceJointe,
};
pub use notifier_beneficiaires::{
    CreerJobNotifierBeneficiairesCommand, CreerJobNotifierBeneficiairesCommandHandler,
};
pub use rendez_vous::{
    CloturerAnimationCollectiveCommand, CloturerAnimationCollectiveCommandHandler,
    CreerRendezVousCommand, CreerRendezVousCommandHandler, DeleteRendezVousCommand,
    DeleteRendezVousCommandHandler, UpdateRendezVousCommand, UpdateRendezVousCommandHandler,
};
pub use suggestion::{
    CreateSuggestionConseillerCommand, CreateSuggestionConseillerCommandHandler,
    RefuserSuggestionCommand, RefuserSuggestionCommandHandler,
};
pub use transfert::{TransfererJeunesCommand, TransfererJeunesCommandHandler};

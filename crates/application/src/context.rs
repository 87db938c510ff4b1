//! Wiring of ports, services and clock shared by every handler

use std::sync::Arc;

use core_kernel::Clock;
use domain_action::{ActionRepository, CommentaireRepository};
use domain_beneficiaire::{
    AgenceRepository, ConseillerRepository, JeuneRepository, ListeDeDiffusionRepository,
    SuggestionRepository,
};
use domain_notification::{
    EvenementRepository, NotificationPort, NotificationService, PlanificateurRepository,
    PlanificateurService, SuiviJobRepository,
};
use domain_rendez_vous::{HistoriqueRendezVousRepository, RendezVousRepository};

use crate::authorizers::{
    ActionAuthorizer, ConseillerAuthorizer, ConseillerInterAgenceAuthorizer, JeuneAuthorizer,
    ListeDeDiffusionAuthorizer, RendezVousAuthorizer, SupportAuthorizer,
};

/// Every adapter the handlers depend on
///
/// Built once at startup from the PostgreSQL adapters, or from the in-memory
/// mocks in tests. Handlers take the pieces they need in their constructor.
#[derive(Clone)]
pub struct Contexte {
    pub jeunes: Arc<dyn JeuneRepository>,
    pub conseillers: Arc<dyn ConseillerRepository>,
    pub agences: Arc<dyn AgenceRepository>,
    pub listes_de_diffusion: Arc<dyn ListeDeDiffusionRepository>,
    pub suggestions: Arc<dyn SuggestionRepository>,
    pub actions: Arc<dyn ActionRepository>,
    pub commentaires: Arc<dyn CommentaireRepository>,
    pub rendez_vous: Arc<dyn RendezVousRepository>,
    pub historique_rendez_vous: Arc<dyn HistoriqueRendezVousRepository>,
    pub planificateur: Arc<dyn PlanificateurRepository>,
    pub suivi_jobs: Arc<dyn SuiviJobRepository>,
    pub evenements: Arc<dyn EvenementRepository>,
    pub notifications: Arc<dyn NotificationPort>,
    pub clock: Arc<dyn Clock>,
}

impl Contexte {
    pub fn notification_service(&self) -> NotificationService {
        NotificationService::new(self.notifications.clone())
    }

    pub fn planificateur_service(&self) -> PlanificateurService {
        PlanificateurService::new(self.planificateur.clone())
    }

    pub fn conseiller_authorizer(&self) -> ConseillerAuthorizer {
        ConseillerAuthorizer::new(self.jeunes.clone())
    }

    pub fn inter_agence_authorizer(&self) -> ConseillerInterAgenceAuthorizer {
        ConseillerInterAgenceAuthorizer::new(
            self.jeunes.clone(),
            self.conseillers.clone(),
            self.actions.clone(),
            self.rendez_vous.clone(),
        )
    }

    pub fn jeune_authorizer(&self) -> JeuneAuthorizer {
        JeuneAuthorizer
    }

    pub fn action_authorizer(&self) -> ActionAuthorizer {
        ActionAuthorizer::new(self.actions.clone(), self.jeunes.clone())
    }

    pub fn rendez_vous_authorizer(&self) -> RendezVousAuthorizer {
        RendezVousAuthorizer::new(self.rendez_vous.clone(), self.conseillers.clone())
    }

    pub fn liste_de_diffusion_authorizer(&self) -> ListeDeDiffusionAuthorizer {
        ListeDeDiffusionAuthorizer::new(self.listes_de_diffusion.clone())
    }

    pub fn support_authorizer(&self) -> SupportAuthorizer {
        SupportAuthorizer
    }
}

//! In-memory wiring of every port, for handler tests

use chrono::{DateTime, Utc};
use std::sync::Arc;

use core_kernel::FixedClock;
use domain_action::{MockActionRepository, MockCommentaireRepository};
use domain_beneficiaire::{
    MockAgenceRepository, MockConseillerRepository, MockJeuneRepository,
    MockListeDeDiffusionRepository, MockSuggestionRepository,
};
use domain_notification::{
    MockEvenementRepository, MockNotificationPort, MockPlanificateurRepository,
    MockSuiviJobRepository,
};
use domain_rendez_vous::{MockHistoriqueRendezVousRepository, MockRendezVousRepository};

use crate::context::Contexte;

/// Keeps typed handles on the mocks so tests can seed and inspect them
pub struct ContexteEnMemoire {
    pub jeunes: Arc<MockJeuneRepository>,
    pub conseillers: Arc<MockConseillerRepository>,
    pub agences: Arc<MockAgenceRepository>,
    pub listes_de_diffusion: Arc<MockListeDeDiffusionRepository>,
    pub suggestions: Arc<MockSuggestionRepository>,
    pub actions: Arc<MockActionRepository>,
    pub commentaires: Arc<MockCommentaireRepository>,
    pub rendez_vous: Arc<MockRendezVousRepository>,
    pub historique_rendez_vous: Arc<MockHistoriqueRendezVousRepository>,
    pub planificateur: Arc<MockPlanificateurRepository>,
    pub suivi_jobs: Arc<MockSuiviJobRepository>,
    pub evenements: Arc<MockEvenementRepository>,
    pub notifications: Arc<MockNotificationPort>,
    pub clock: Arc<FixedClock>,
}

impl ContexteEnMemoire {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            jeunes: Arc::new(MockJeuneRepository::new()),
            conseillers: Arc::new(MockConseillerRepository::new()),
            agences: Arc::new(MockAgenceRepository::new()),
            listes_de_diffusion: Arc::new(MockListeDeDiffusionRepository::new()),
            suggestions: Arc::new(MockSuggestionRepository::new()),
            actions: Arc::new(MockActionRepository::new()),
            commentaires: Arc::new(MockCommentaireRepository::new()),
            rendez_vous: Arc::new(MockRendezVousRepository::new()),
            historique_rendez_vous: Arc::new(MockHistoriqueRendezVousRepository::new()),
            planificateur: Arc::new(MockPlanificateurRepository::new()),
            suivi_jobs: Arc::new(MockSuiviJobRepository::new()),
            evenements: Arc::new(MockEvenementRepository::new()),
            notifications: Arc::new(MockNotificationPort::new()),
            clock: Arc::new(FixedClock::new(now)),
        }
    }

    pub fn contexte(&self) -> Contexte {
        Contexte {
            jeunes: self.jeunes.clone(),
            conseillers: self.conseillers.clone(),
            agences: self.agences.clone(),
            listes_de_diffusion: self.listes_de_diffusion.clone(),
            suggestions: self.suggestions.clone(),
            actions: self.actions.clone(),
            commentaires: self.commentaires.clone(),
            rendez_vous: self.rendez_vous.clone(),
            historique_rendez_vous: self.historique_rendez_vous.clone(),
            planificateur: self.planificateur.clone(),
            suivi_jobs: self.suivi_jobs.clone(),
            evenements: self.evenements.clone(),
            notifications: self.notifications.clone(),
            clock: self.clock.clone(),
        }
    }
}

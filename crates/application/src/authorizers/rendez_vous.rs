use std::sync::Arc;

use core_kernel::{DomainError, DomainResult, RendezVousId, Utilisateur};
use domain_beneficiaire::ConseillerRepository;
use domain_rendez_vous::{RendezVous, RendezVousRepository};

use super::autoriser_si;

#[derive(Clone)]
pub struct RendezVousAuthorizer {
    rendez_vous: Arc<dyn RendezVousRepository>,
    conseillers: Arc<dyn ConseillerRepository>,
}

impl RendezVousAuthorizer {
    pub fn new(
        rendez_vous: Arc<dyn RendezVousRepository>,
        conseillers: Arc<dyn ConseillerRepository>,
    ) -> Self {
        Self {
            rendez_vous,
            conseillers,
        }
    }

    /// A jeune sees the rendez-vous it is invited to; a conseiller those it
    /// shares a jeune with, plus the animations collectives of its agence
    pub async fn autoriser_pour_un_rendez_vous(
        &self,
        id_rendez_vous: RendezVousId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let rendez_vous = self.charger(id_rendez_vous).await?;

        match utilisateur.id_jeune() {
            Some(id_jeune) => autoriser_si(rendez_vous.concerne_le_jeune(id_jeune)),
            None => self.verifier_conseiller(&rendez_vous, utilisateur).await,
        }
    }

    /// Conseiller-only variant used by write commands
    pub async fn autoriser_conseiller_pour_un_rendez_vous(
        &self,
        id_rendez_vous: RendezVousId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let rendez_vous = self.charger(id_rendez_vous).await?;
        self.verifier_conseiller(&rendez_vous, utilisateur).await
    }

    async fn charger(&self, id_rendez_vous: RendezVousId) -> DomainResult<RendezVous> {
        self.rendez_vous
            .get(id_rendez_vous)
            .await?
            .ok_or(DomainError::DroitsInsuffisants)
    }

    async fn verifier_conseiller(
        &self,
        rendez_vous: &RendezVous,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let id_conseiller = utilisateur.id_conseiller().ok_or(DomainError::DroitsInsuffisants)?;

        let partage_un_jeune = rendez_vous.createur.id == id_conseiller
            || rendez_vous
                .jeunes
                .iter()
                .any(|j| j.id_conseiller() == Some(id_conseiller));
        if partage_un_jeune {
            return Ok(());
        }

        if utilisateur.structure.est_milo() && rendez_vous.est_animation_collective() {
            let conseiller = self.conseillers.get(id_conseiller).await?;
            return autoriser_si(
                conseiller.is_some_and(|c| c.partage_l_agence_de(rendez_vous.id_agence)),
            );
        }

        Err(DomainError::DroitsInsuffisants)
    }
}

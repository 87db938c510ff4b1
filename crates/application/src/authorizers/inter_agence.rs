use std::sync::Arc;

use core_kernel::{
    ActionId, AgenceId, DomainError, DomainResult, JeuneId, RendezVousId, Utilisateur,
};
use domain_action::ActionRepository;
use domain_beneficiaire::{ConseillerRepository, Jeune, JeuneRepository};
use domain_rendez_vous::RendezVousRepository;

use super::autoriser_si;

/// Extends ownership checks to the colleagues of a MILO agence
#[derive(Clone)]
pub struct ConseillerInterAgenceAuthorizer {
    jeunes: Arc<dyn JeuneRepository>,
    conseillers: Arc<dyn ConseillerRepository>,
    actions: Arc<dyn ActionRepository>,
    rendez_vous: Arc<dyn RendezVousRepository>,
}

impl ConseillerInterAgenceAuthorizer {
    pub fn new(
        jeunes: Arc<dyn JeuneRepository>,
        conseillers: Arc<dyn ConseillerRepository>,
        actions: Arc<dyn ActionRepository>,
        rendez_vous: Arc<dyn RendezVousRepository>,
    ) -> Self {
        Self {
            jeunes,
            conseillers,
            actions,
            rendez_vous,
        }
    }

    pub async fn autoriser_conseiller_pour_une_agence(
        &self,
        id_agence: AgenceId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let id_conseiller = utilisateur.id_conseiller().ok_or(DomainError::DroitsInsuffisants)?;
        let conseiller = self.conseillers.get(id_conseiller).await?;
        autoriser_si(conseiller.is_some_and(|c| c.id_agence() == Some(id_agence)))
    }

    pub async fn autoriser_conseiller_pour_son_jeune_ou_un_jeune_de_son_agence_milo(
        &self,
        id_jeune: JeuneId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let jeune = self.charger_jeune(id_jeune).await?;
        self.verifier_jeune(&jeune, utilisateur).await
    }

    /// Colleagues of the agence also need the jeune to share its favourites
    pub async fn autoriser_conseiller_pour_son_jeune_ou_un_jeune_de_son_agence_milo_avec_partage_favoris(
        &self,
        id_jeune: JeuneId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let jeune = self.charger_jeune(id_jeune).await?;
        if !jeune.preferences.partage_favoris {
            return Err(DomainError::DroitsInsuffisants);
        }
        self.verifier_jeune(&jeune, utilisateur).await
    }

    pub async fn autoriser_conseiller_pour_une_action_de_son_jeune_ou_d_un_jeune_de_son_agence_milo(
        &self,
        id_action: ActionId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let action = self
            .actions
            .get(id_action)
            .await?
            .ok_or(DomainError::DroitsInsuffisants)?;
        let jeune = self.charger_jeune(action.id_jeune).await?;
        self.verifier_jeune(&jeune, utilisateur).await
    }

    /// MILO only: the rendez-vous belongs to the caller's agence, or one of
    /// its jeunes is followed by the caller or by a colleague of its agence
    pub async fn autoriser_conseiller_pour_un_rendez_vous_de_son_agence_milo(
        &self,
        id_rendez_vous: RendezVousId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let id_conseiller = utilisateur.id_conseiller().ok_or(DomainError::DroitsInsuffisants)?;
        if !utilisateur.structure.est_milo() {
            return Err(DomainError::DroitsInsuffisants);
        }

        let rendez_vous = self
            .rendez_vous
            .get(id_rendez_vous)
            .await?
            .ok_or(DomainError::DroitsInsuffisants)?;
        let conseiller = self
            .conseillers
            .get(id_conseiller)
            .await?
            .ok_or(DomainError::DroitsInsuffisants)?;

        let meme_agence = conseiller.partage_l_agence_de(rendez_vous.id_agence);
        let un_de_ses_jeunes = rendez_vous
            .jeunes
            .iter()
            .any(|j| j.id_conseiller() == Some(id_conseiller));
        let un_jeune_de_l_agence = rendez_vous
            .jeunes
            .iter()
            .any(|j| conseiller.partage_l_agence_de(j.id_agence_du_conseiller()));

        autoriser_si(meme_agence || un_de_ses_jeunes || un_jeune_de_l_agence)
    }

    async fn charger_jeune(&self, id_jeune: JeuneId) -> DomainResult<Jeune> {
        self.jeunes
            .get(id_jeune)
            .await?
            .ok_or(DomainError::DroitsInsuffisants)
    }

    async fn verifier_jeune(&self, jeune: &Jeune, utilisateur: &Utilisateur) -> DomainResult<()> {
        let id_conseiller = utilisateur.id_conseiller().ok_or(DomainError::DroitsInsuffisants)?;
        if jeune.est_suivi_par(id_conseiller) {
            return Ok(());
        }
        if !utilisateur.structure.est_milo() {
            return Err(DomainError::DroitsInsuffisants);
        }

        let conseiller = self.conseillers.get(id_conseiller).await?;
        autoriser_si(
            conseiller.is_some_and(|c| c.partage_l_agence_de(jeune.id_agence_du_conseiller())),
        )
    }
}

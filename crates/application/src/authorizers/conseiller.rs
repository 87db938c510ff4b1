use std::sync::Arc;

use core_kernel::{ConseillerId, DomainError, DomainResult, JeuneId, Utilisateur};
use domain_beneficiaire::{Jeune, JeuneRepository};

use super::autoriser_si;

#[derive(Clone)]
pub struct ConseillerAuthorizer {
    jeunes: Arc<dyn JeuneRepository>,
}

impl ConseillerAuthorizer {
    pub fn new(jeunes: Arc<dyn JeuneRepository>) -> Self {
        Self { jeunes }
    }

    pub fn autoriser_le_conseiller(
        &self,
        id_conseiller: ConseillerId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        autoriser_si(utilisateur.est_le_conseiller(id_conseiller))
    }

    pub fn autoriser_tout_conseiller(&self, utilisateur: &Utilisateur) -> DomainResult<()> {
        autoriser_si(utilisateur.est_conseiller())
    }

    pub fn autoriser_conseiller_superviseur(&self, utilisateur: &Utilisateur) -> DomainResult<()> {
        autoriser_si(utilisateur.est_superviseur())
    }

    pub async fn autoriser_conseiller_pour_son_jeune(
        &self,
        id_jeune: JeuneId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let id_conseiller = utilisateur.id_conseiller().ok_or(DomainError::DroitsInsuffisants)?;
        let jeune = self.jeunes.get(id_jeune).await?;
        autoriser_si(jeune.is_some_and(|j| j.est_suivi_par(id_conseiller)))
    }

    /// Every id must resolve to a jeune currently followed by the caller
    pub async fn autoriser_conseiller_pour_ses_jeunes(
        &self,
        ids_jeunes: &[JeuneId],
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.verifier_jeunes(ids_jeunes, utilisateur, |jeune, id| jeune.est_suivi_par(id))
            .await
    }

    /// Same as `autoriser_conseiller_pour_ses_jeunes`, also accepting jeunes
    /// the caller lent to a colleague
    pub async fn autoriser_conseiller_pour_ses_jeunes_transferes(
        &self,
        ids_jeunes: &[JeuneId],
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.verifier_jeunes(ids_jeunes, utilisateur, |jeune, id| {
            jeune.est_suivi_ou_prete_par(id)
        })
        .await
    }

    async fn verifier_jeunes(
        &self,
        ids_jeunes: &[JeuneId],
        utilisateur: &Utilisateur,
        appartient: impl Fn(&Jeune, ConseillerId) -> bool + Send,
    ) -> DomainResult<()> {
        let id_conseiller = utilisateur.id_conseiller().ok_or(DomainError::DroitsInsuffisants)?;
        let jeunes = self.jeunes.find_all(ids_jeunes).await?;
        autoriser_si(
            jeunes.len() == ids_jeunes.len()
                && jeunes.iter().all(|jeune| appartient(jeune, id_conseiller)),
        )
    }
}

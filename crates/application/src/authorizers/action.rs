use std::sync::Arc;

use core_kernel::{ActionId, DomainError, DomainResult, Utilisateur};
use domain_action::ActionRepository;
use domain_beneficiaire::JeuneRepository;

use super::autoriser_si;

/// Grants access to the owning jeune and to its conseiller
#[derive(Clone)]
pub struct ActionAuthorizer {
    actions: Arc<dyn ActionRepository>,
    jeunes: Arc<dyn JeuneRepository>,
}

impl ActionAuthorizer {
    pub fn new(actions: Arc<dyn ActionRepository>, jeunes: Arc<dyn JeuneRepository>) -> Self {
        Self { actions, jeunes }
    }

    pub async fn autoriser_pour_une_action(
        &self,
        id_action: ActionId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let action = self
            .actions
            .get(id_action)
            .await?
            .ok_or(DomainError::DroitsInsuffisants)?;

        if utilisateur.est_le_jeune(action.id_jeune) {
            return Ok(());
        }

        match utilisateur.id_conseiller() {
            Some(id_conseiller) => {
                let jeune = self.jeunes.get(action.id_jeune).await?;
                autoriser_si(jeune.is_some_and(|j| j.est_suivi_par(id_conseiller)))
            }
            None => Err(DomainError::DroitsInsuffisants),
        }
    }
}

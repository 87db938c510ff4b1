use std::sync::Arc;

use core_kernel::{DomainError, DomainResult, ListeDeDiffusionId, Utilisateur};
use domain_beneficiaire::ListeDeDiffusionRepository;

use super::autoriser_si;

#[derive(Clone)]
pub struct ListeDeDiffusionAuthorizer {
    listes: Arc<dyn ListeDeDiffusionRepository>,
}

impl ListeDeDiffusionAuthorizer {
    pub fn new(listes: Arc<dyn ListeDeDiffusionRepository>) -> Self {
        Self { listes }
    }

    pub async fn autoriser_conseiller_pour_sa_liste(
        &self,
        id_liste: ListeDeDiffusionId,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let id_conseiller = utilisateur.id_conseiller().ok_or(DomainError::DroitsInsuffisants)?;
        let liste = self.listes.get(id_liste).await?;
        autoriser_si(liste.is_some_and(|l| l.appartient_a(id_conseiller)))
    }
}

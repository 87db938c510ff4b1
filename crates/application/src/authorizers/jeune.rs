use core_kernel::{DomainResult, JeuneId, Utilisateur};

use super::autoriser_si;

#[derive(Debug, Clone, Copy, Default)]
pub struct JeuneAuthorizer;

impl JeuneAuthorizer {
    pub fn autoriser_le_jeune(&self, id_jeune: JeuneId, utilisateur: &Utilisateur) -> DomainResult<()> {
        autoriser_si(utilisateur.est_le_jeune(id_jeune))
    }
}

use core_kernel::{DomainResult, Utilisateur};

use super::autoriser_si;

#[derive(Debug, Clone, Copy, Default)]
pub struct SupportAuthorizer;

impl SupportAuthorizer {
    pub fn autoriser_support(&self, utilisateur: &Utilisateur) -> DomainResult<()> {
        autoriser_si(utilisateur.est_support())
    }
}

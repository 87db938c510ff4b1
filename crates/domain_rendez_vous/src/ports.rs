//! RendezVous Domain Ports

use async_trait::async_trait;

use core_kernel::{AgenceId, ConseillerId, DomainPort, JeuneId, PortError, RendezVousId};

use crate::historique::HistoriqueRendezVous;
use crate::rendez_vous::RendezVous;

#[async_trait]
pub trait RendezVousRepository: DomainPort {
    async fn get(&self, id: RendezVousId) -> Result<Option<RendezVous>, PortError>;

    /// Upserts the rendez-vous and replaces its participants atomically
    async fn save(&self, rendez_vous: &RendezVous) -> Result<(), PortError>;

    async fn delete(&self, id: RendezVousId) -> Result<(), PortError>;

    async fn find_all_by_jeune(&self, id_jeune: JeuneId) -> Result<Vec<RendezVous>, PortError>;

    /// Rendez-vous created by the conseiller or involving one of its jeunes,
    /// ordered by date
    async fn find_all_by_conseiller(
        &self,
        id_conseiller: ConseillerId,
        presence_conseiller: Option<bool>,
    ) -> Result<Vec<RendezVous>, PortError>;

    /// Animations collectives attached to the agence
    async fn find_animations_collectives_by_agence(
        &self,
        id_agence: AgenceId,
    ) -> Result<Vec<RendezVous>, PortError>;
}

#[async_trait]
pub trait HistoriqueRendezVousRepository: DomainPort {
    async fn save(&self, historique: &HistoriqueRendezVous) -> Result<(), PortError>;

    async fn find_all_by_rendez_vous(
        &self,
        id_rendez_vous: RendezVousId,
    ) -> Result<Vec<HistoriqueRendezVous>, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default, Clone)]
    pub struct MockRendezVousRepository {
        rendez_vous: Arc<RwLock<HashMap<RendezVousId, RendezVous>>>,
    }

    impl MockRendezVousRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_rendez_vous(rendez_vous: Vec<RendezVous>) -> Self {
            let repo = Self::new();
            for rdv in rendez_vous {
                repo.rendez_vous.write().await.insert(rdv.id, rdv);
            }
            repo
        }
    }

    impl DomainPort for MockRendezVousRepository {}

    #[async_trait]
    impl RendezVousRepository for MockRendezVousRepository {
        async fn get(&self, id: RendezVousId) -> Result<Option<RendezVous>, PortError> {
            Ok(self.rendez_vous.read().await.get(&id).cloned())
        }

        async fn save(&self, rendez_vous: &RendezVous) -> Result<(), PortError> {
            self.rendez_vous
                .write()
                .await
                .insert(rendez_vous.id, rendez_vous.clone());
            Ok(())
        }

        async fn delete(&self, id: RendezVousId) -> Result<(), PortError> {
            self.rendez_vous.write().await.remove(&id);
            Ok(())
        }

        async fn find_all_by_jeune(&self, id_jeune: JeuneId) -> Result<Vec<RendezVous>, PortError> {
            Ok(self
                .rendez_vous
                .read()
                .await
                .values()
                .filter(|rdv| rdv.concerne_le_jeune(id_jeune))
                .cloned()
                .collect())
        }

        async fn find_all_by_conseiller(
            &self,
            id_conseiller: ConseillerId,
            presence_conseiller: Option<bool>,
        ) -> Result<Vec<RendezVous>, PortError> {
            let mut rendez_vous: Vec<RendezVous> = self
                .rendez_vous
                .read()
                .await
                .values()
                .filter(|rdv| {
                    rdv.createur.id == id_conseiller
                        || rdv
                            .jeunes
                            .iter()
                            .any(|j| j.id_conseiller() == Some(id_conseiller))
                })
                .filter(|rdv| {
                    presence_conseiller.map_or(true, |presence| rdv.presence_conseiller == presence)
                })
                .cloned()
                .collect();
            rendez_vous.sort_by(|a, b| a.date.cmp(&b.date));
            Ok(rendez_vous)
        }

        async fn find_animations_collectives_by_agence(
            &self,
            id_agence: AgenceId,
        ) -> Result<Vec<RendezVous>, PortError> {
            let mut animations: Vec<RendezVous> = self
                .rendez_vous
                .read()
                .await
                .values()
                .filter(|rdv| rdv.est_animation_collective() && rdv.id_agence == Some(id_agence))
                .cloned()
                .collect();
            animations.sort_by(|a, b| a.date.cmp(&b.date));
            Ok(animations)
        }
    }

    #[derive(Debug, Default, Clone)]
    pub struct MockHistoriqueRendezVousRepository {
        historique: Arc<RwLock<Vec<HistoriqueRendezVous>>>,
    }

    impl MockHistoriqueRendezVousRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn all(&self) -> Vec<HistoriqueRendezVous> {
            self.historique.read().await.clone()
        }
    }

    impl DomainPort for MockHistoriqueRendezVousRepository {}

    #[async_trait]
    impl HistoriqueRendezVousRepository for MockHistoriqueRendezVousRepository {
        async fn save(&self, historique: &HistoriqueRendezVous) -> Result<(), PortError> {
            self.historique.write().await.push(historique.clone());
            Ok(())
        }

        async fn find_all_by_rendez_vous(
            &self,
            id_rendez_vous: RendezVousId,
        ) -> Result<Vec<HistoriqueRendezVous>, PortError> {
            Ok(self
                .historique
                .read()
                .await
                .iter()
                .filter(|h| h.id_rendez_vous == id_rendez_vous)
                .cloned()
                .collect())
        }
    }
}

//! Beneficiaire Domain Ports
//!
//! Repository traits for jeunes, conseillers, listes de diffusion and
//! suggestions. `infra_db` implements them on PostgreSQL; the `mock` module
//! provides in-memory versions used by handler tests.
//!
//! Lookups by id return `Ok(None)` when the row does not exist so that
//! handlers can choose between `NonTrouve` and `DroitsInsuffisants`.

use async_trait::async_trait;

use core_kernel::{
    AgenceId, ConseillerId, DomainPort, JeuneId, ListeDeDiffusionId, PortError, Structure,
    SuggestionId,
};

use crate::conseiller::{Agence, Conseiller};
use crate::jeune::{Jeune, TransfertConseiller};
use crate::liste_de_diffusion::ListeDeDiffusion;
use crate::suggestion::Suggestion;

#[async_trait]
pub trait JeuneRepository: DomainPort {
    async fn get(&self, id: JeuneId) -> Result<Option<Jeune>, PortError>;

    /// Jeunes matching `ids`; unknown ids are silently skipped
    async fn find_all(&self, ids: &[JeuneId]) -> Result<Vec<Jeune>, PortError>;

    async fn find_all_by_conseiller(
        &self,
        id_conseiller: ConseillerId,
    ) -> Result<Vec<Jeune>, PortError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, PortError>;

    async fn exists_by_id_partenaire(
        &self,
        id_partenaire: &str,
        structure: Structure,
    ) -> Result<bool, PortError>;

    async fn save(&self, jeune: &Jeune) -> Result<(), PortError>;

    /// Persists the transferred jeunes and their transfer history atomically
    async fn transferer(
        &self,
        jeunes: &[Jeune],
        transferts: &[TransfertConseiller],
    ) -> Result<(), PortError>;

    async fn supprimer(&self, id: JeuneId) -> Result<(), PortError>;

    /// Number of jeunes of `structures` that registered a push token
    async fn count_avec_token(&self, structures: &[Structure]) -> Result<u64, PortError>;

    /// Page of jeunes with a push token, ordered by id
    async fn find_ids_avec_token(
        &self,
        structures: &[Structure],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<JeuneId>, PortError>;
}

#[async_trait]
pub trait ConseillerRepository: DomainPort {
    async fn get(&self, id: ConseillerId) -> Result<Option<Conseiller>, PortError>;

    async fn save(&self, conseiller: &Conseiller) -> Result<(), PortError>;
}

#[async_trait]
pub trait AgenceRepository: DomainPort {
    /// Agence of `structure` with this id
    async fn get(&self, id: AgenceId, structure: Structure) -> Result<Option<Agence>, PortError>;
}

#[async_trait]
pub trait ListeDeDiffusionRepository: DomainPort {
    async fn get(&self, id: ListeDeDiffusionId) -> Result<Option<ListeDeDiffusion>, PortError>;

    async fn find_all_by_conseiller(
        &self,
        id_conseiller: ConseillerId,
    ) -> Result<Vec<ListeDeDiffusion>, PortError>;

    /// Upserts the list and replaces its membership in one transaction
    async fn save(&self, liste: &ListeDeDiffusion) -> Result<(), PortError>;

    async fn delete(&self, id: ListeDeDiffusionId) -> Result<(), PortError>;
}

#[async_trait]
pub trait SuggestionRepository: DomainPort {
    async fn get(&self, id: SuggestionId) -> Result<Option<Suggestion>, PortError>;

    async fn find_all_by_jeune(&self, id_jeune: JeuneId) -> Result<Vec<Suggestion>, PortError>;

    async fn save(&self, suggestion: &Suggestion) -> Result<(), PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory jeune store
    #[derive(Debug, Default, Clone)]
    pub struct MockJeuneRepository {
        jeunes: Arc<RwLock<HashMap<JeuneId, Jeune>>>,
        transferts: Arc<RwLock<Vec<TransfertConseiller>>>,
    }

    impl MockJeuneRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_jeunes(jeunes: Vec<Jeune>) -> Self {
            let repo = Self::new();
            for jeune in jeunes {
                repo.jeunes.write().await.insert(jeune.id, jeune);
            }
            repo
        }

        pub async fn transferts(&self) -> Vec<TransfertConseiller> {
            self.transferts.read().await.clone()
        }

        async fn avec_token(&self, structures: &[Structure]) -> Vec<JeuneId> {
            let mut ids: Vec<JeuneId> = self
                .jeunes
                .read()
                .await
                .values()
                .filter(|j| structures.contains(&j.structure) && j.push_notification_token().is_some())
                .map(|j| j.id)
                .collect();
            ids.sort_by_key(|id| id.into_uuid());
            ids
        }
    }

    impl DomainPort for MockJeuneRepository {}

    #[async_trait]
    impl JeuneRepository for MockJeuneRepository {
        async fn get(&self, id: JeuneId) -> Result<Option<Jeune>, PortError> {
            Ok(self.jeunes.read().await.get(&id).cloned())
        }

        async fn find_all(&self, ids: &[JeuneId]) -> Result<Vec<Jeune>, PortError> {
            let jeunes = self.jeunes.read().await;
            Ok(ids.iter().filter_map(|id| jeunes.get(id).cloned()).collect())
        }

        async fn find_all_by_conseiller(
            &self,
            id_conseiller: ConseillerId,
        ) -> Result<Vec<Jeune>, PortError> {
            Ok(self
                .jeunes
                .read()
                .await
                .values()
                .filter(|j| j.est_suivi_par(id_conseiller))
                .cloned()
                .collect())
        }

        async fn exists_by_email(&self, email: &str) -> Result<bool, PortError> {
            let email = email.trim().to_lowercase();
            Ok(self
                .jeunes
                .read()
                .await
                .values()
                .any(|j| j.email.as_deref() == Some(email.as_str())))
        }

        async fn exists_by_id_partenaire(
            &self,
            id_partenaire: &str,
            structure: Structure,
        ) -> Result<bool, PortError> {
            Ok(self.jeunes.read().await.values().any(|j| {
                j.structure == structure && j.id_partenaire.as_deref() == Some(id_partenaire)
            }))
        }

        async fn save(&self, jeune: &Jeune) -> Result<(), PortError> {
            self.jeunes.write().await.insert(jeune.id, jeune.clone());
            Ok(())
        }

        async fn transferer(
            &self,
            jeunes: &[Jeune],
            transferts: &[TransfertConseiller],
        ) -> Result<(), PortError> {
            let mut store = self.jeunes.write().await;
            for jeune in jeunes {
                store.insert(jeune.id, jeune.clone());
            }
            self.transferts.write().await.extend_from_slice(transferts);
            Ok(())
        }

        async fn supprimer(&self, id: JeuneId) -> Result<(), PortError> {
            self.jeunes
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Jeune", id))
        }

        async fn count_avec_token(&self, structures: &[Structure]) -> Result<u64, PortError> {
            Ok(self.avec_token(structures).await.len() as u64)
        }

        async fn find_ids_avec_token(
            &self,
            structures: &[Structure],
            offset: u64,
            limit: u64,
        ) -> Result<Vec<JeuneId>, PortError> {
            Ok(self
                .avec_token(structures)
                .await
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }
    }

    #[derive(Debug, Default, Clone)]
    pub struct MockConseillerRepository {
        conseillers: Arc<RwLock<HashMap<ConseillerId, Conseiller>>>,
    }

    impl MockConseillerRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_conseillers(conseillers: Vec<Conseiller>) -> Self {
            let repo = Self::new();
            for conseiller in conseillers {
                repo.conseillers.write().await.insert(conseiller.id, conseiller);
            }
            repo
        }
    }

    impl DomainPort for MockConseillerRepository {}

    #[async_trait]
    impl ConseillerRepository for MockConseillerRepository {
        async fn get(&self, id: ConseillerId) -> Result<Option<Conseiller>, PortError> {
            Ok(self.conseillers.read().await.get(&id).cloned())
        }

        async fn save(&self, conseiller: &Conseiller) -> Result<(), PortError> {
            self.conseillers
                .write()
                .await
                .insert(conseiller.id, conseiller.clone());
            Ok(())
        }
    }

    #[derive(Debug, Default, Clone)]
    pub struct MockAgenceRepository {
        agences: Arc<RwLock<HashMap<AgenceId, Agence>>>,
    }

    impl MockAgenceRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn ajouter(&self, agence: Agence) {
            self.agences.write().await.insert(agence.id, agence);
        }
    }

    impl DomainPort for MockAgenceRepository {}

    #[async_trait]
    impl AgenceRepository for MockAgenceRepository {
        async fn get(&self, id: AgenceId, structure: Structure) -> Result<Option<Agence>, PortError> {
            Ok(self
                .agences
                .read()
                .await
                .get(&id)
                .filter(|agence| agence.structure == structure)
                .cloned())
        }
    }

    #[derive(Debug, Default, Clone)]
    pub struct MockListeDeDiffusionRepository {
        listes: Arc<RwLock<HashMap<ListeDeDiffusionId, ListeDeDiffusion>>>,
    }

    impl MockListeDeDiffusionRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_listes(listes: Vec<ListeDeDiffusion>) -> Self {
            let repo = Self::new();
            for liste in listes {
                repo.listes.write().await.insert(liste.id, liste);
            }
            repo
        }
    }

    impl DomainPort for MockListeDeDiffusionRepository {}

    #[async_trait]
    impl ListeDeDiffusionRepository for MockListeDeDiffusionRepository {
        async fn get(
            &self,
            id: ListeDeDiffusionId,
        ) -> Result<Option<ListeDeDiffusion>, PortError> {
            Ok(self.listes.read().await.get(&id).cloned())
        }

        async fn find_all_by_conseiller(
            &self,
            id_conseiller: ConseillerId,
        ) -> Result<Vec<ListeDeDiffusion>, PortError> {
            let mut listes: Vec<ListeDeDiffusion> = self
                .listes
                .read()
                .await
                .values()
                .filter(|l| l.appartient_a(id_conseiller))
                .cloned()
                .collect();
            listes.sort_by(|a, b| b.date_de_creation.cmp(&a.date_de_creation));
            Ok(listes)
        }

        async fn save(&self, liste: &ListeDeDiffusion) -> Result<(), PortError> {
            self.listes.write().await.insert(liste.id, liste.clone());
            Ok(())
        }

        async fn delete(&self, id: ListeDeDiffusionId) -> Result<(), PortError> {
            self.listes.write().await.remove(&id);
            Ok(())
        }
    }

    #[derive(Debug, Default, Clone)]
    pub struct MockSuggestionRepository {
        suggestions: Arc<RwLock<HashMap<SuggestionId, Suggestion>>>,
    }

    impl MockSuggestionRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_suggestions(suggestions: Vec<Suggestion>) -> Self {
            let repo = Self::new();
            for suggestion in suggestions {
                repo.suggestions.write().await.insert(suggestion.id, suggestion);
            }
            repo
        }
    }

    impl DomainPort for MockSuggestionRepository {}

    #[async_trait]
    impl SuggestionRepository for MockSuggestionRepository {
        async fn get(&self, id: SuggestionId) -> Result<Option<Suggestion>, PortError> {
            Ok(self.suggestions.read().await.get(&id).cloned())
        }

        async fn find_all_by_jeune(
            &self,
            id_jeune: JeuneId,
        ) -> Result<Vec<Suggestion>, PortError> {
            let mut suggestions: Vec<Suggestion> = self
                .suggestions
                .read()
                .await
                .values()
                .filter(|s| s.id_jeune == id_jeune)
                .cloned()
                .collect();
            suggestions.sort_by(|a, b| b.date_creation.cmp(&a.date_creation));
            Ok(suggestions)
        }

        async fn save(&self, suggestion: &Suggestion) -> Result<(), PortError> {
            self.suggestions
                .write()
                .await
                .insert(suggestion.id, suggestion.clone());
            Ok(())
        }
    }
}

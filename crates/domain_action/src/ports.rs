//! Action Domain Ports
//!
//! Repository traits for actions and their comments, with in-memory
//! adapters behind the `mock` feature.

use async_trait::async_trait;

use core_kernel::{ActionId, DomainPort, JeuneId, PortError};

use crate::action::Action;
use crate::commentaire::Commentaire;
use crate::recherche::{FiltreActions, PageActions, Pagination, TriActions};

#[async_trait]
pub trait ActionRepository: DomainPort {
    async fn get(&self, id: ActionId) -> Result<Option<Action>, PortError>;

    async fn save(&self, action: &Action) -> Result<(), PortError>;

    async fn delete(&self, id: ActionId) -> Result<(), PortError>;

    /// Actions of a jeune matching `filtre`, sorted by `tri`, sliced by
    /// `pagination`; counts cover every action and every filtered action
    async fn find_page(
        &self,
        id_jeune: JeuneId,
        filtre: &FiltreActions,
        tri: TriActions,
        pagination: Pagination,
    ) -> Result<PageActions, PortError>;
}

#[async_trait]
pub trait CommentaireRepository: DomainPort {
    async fn save(&self, commentaire: &Commentaire) -> Result<(), PortError>;

    async fn find_all_by_action(&self, id_action: ActionId) -> Result<Vec<Commentaire>, PortError>;

    async fn exists_for_action(&self, id_action: ActionId) -> Result<bool, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default, Clone)]
    pub struct MockActionRepository {
        actions: Arc<RwLock<HashMap<ActionId, Action>>>,
    }

    impl MockActionRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_actions(actions: Vec<Action>) -> Self {
            let repo = Self::new();
            for action in actions {
                repo.actions.write().await.insert(action.id, action);
            }
            repo
        }
    }

    impl DomainPort for MockActionRepository {}

    #[async_trait]
    impl ActionRepository for MockActionRepository {
        async fn get(&self, id: ActionId) -> Result<Option<Action>, PortError> {
            Ok(self.actions.read().await.get(&id).cloned())
        }

        async fn save(&self, action: &Action) -> Result<(), PortError> {
            self.actions.write().await.insert(action.id, action.clone());
            Ok(())
        }

        async fn delete(&self, id: ActionId) -> Result<(), PortError> {
            self.actions.write().await.remove(&id);
            Ok(())
        }

        async fn find_page(
            &self,
            id_jeune: JeuneId,
            filtre: &FiltreActions,
            tri: TriActions,
            pagination: Pagination,
        ) -> Result<PageActions, PortError> {
            let actions = self.actions.read().await;
            let du_jeune: Vec<&Action> = actions.values().filter(|a| a.id_jeune == id_jeune).collect();
            let mut filtrees: Vec<Action> = du_jeune
                .iter()
                .filter(|a| filtre.accepte(a))
                .map(|a| (*a).clone())
                .collect();
            filtrees.sort_by(|a, b| tri.comparer(a, b));

            let nombre_filtrees = filtrees.len() as u64;
            let page = filtrees
                .into_iter()
                .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
                .take(pagination.limit().map_or(usize::MAX, |l| l as usize))
                .collect();

            Ok(PageActions {
                actions: page,
                nombre_total: du_jeune.len() as u64,
                nombre_filtrees,
            })
        }
    }

    #[derive(Debug, Default, Clone)]
    pub struct MockCommentaireRepository {
        commentaires: Arc<RwLock<Vec<Commentaire>>>,
    }

    impl MockCommentaireRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_commentaires(commentaires: Vec<Commentaire>) -> Self {
            let repo = Self::new();
            repo.commentaires.write().await.extend(commentaires);
            repo
        }
    }

    impl DomainPort for MockCommentaireRepository {}

    #[async_trait]
    impl CommentaireRepository for MockCommentaireRepository {
        async fn save(&self, commentaire: &Commentaire) -> Result<(), PortError> {
            self.commentaires.write().await.push(commentaire.clone());
            Ok(())
        }

        async fn find_all_by_action(
            &self,
            id_action: ActionId,
        ) -> Result<Vec<Commentaire>, PortError> {
            Ok(self
                .commentaires
                .read()
                .await
                .iter()
                .filter(|c| c.id_action == id_action)
                .cloned()
                .collect())
        }

        async fn exists_for_action(&self, id_action: ActionId) -> Result<bool, PortError> {
            Ok(self
                .commentaires
                .read()
                .await
                .iter()
                .any(|c| c.id_action == id_action))
        }
    }
}

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{DomainResult, JeuneId, Utilisateur};
use domain_beneficiaire::SuggestionRepository;

use crate::authorizers::JeuneAuthorizer;
use crate::context::Contexte;
use crate::handler::QueryHandler;
use crate::queries::query_models::SuggestionQueryModel;

#[derive(Debug, Clone)]
pub struct GetSuggestionsJeuneQuery {
    pub id_jeune: JeuneId,
}

pub struct GetSuggestionsJeuneQueryHandler {
    suggestions: Arc<dyn SuggestionRepository>,
    jeune_authorizer: JeuneAuthorizer,
}

impl GetSuggestionsJeuneQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            suggestions: ctx.suggestions.clone(),
            jeune_authorizer: ctx.jeune_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetSuggestionsJeuneQueryHandler {
    type Query = GetSuggestionsJeuneQuery;
    type Output = Vec<SuggestionQueryModel>;
    const NOM: &'static str = "GetSuggestionsJeuneQueryHandler";

    async fn authorize(&self, query: &GetSuggestionsJeuneQuery, utilisateur: &Utilisateur) -> DomainResult<()> {
        self.jeune_authorizer.autoriser_le_jeune(query.id_jeune, utilisateur)
    }

    /// Suggestions still awaiting a decision, newest first
    async fn handle(&self, query: &GetSuggestionsJeuneQuery) -> DomainResult<Vec<SuggestionQueryModel>> {
        let mut suggestions = self.suggestions.find_all_by_jeune(query.id_jeune).await?;
        suggestions.retain(|s| s.date_refus.is_none());
        suggestions.sort_by(|a, b| b.date_creation.cmp(&a.date_creation));
        Ok(suggestions.iter().map(Into::into).collect())
    }
}

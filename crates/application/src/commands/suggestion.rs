//! Suggestion commands

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use core_kernel::{Clock, DomainError, DomainResult, JeuneId, SuggestionId, Utilisateur};
use domain_beneficiaire::{InformationsSuggestion, Suggestion, SuggestionRepository, TypeRecherche};
use domain_notification::{CodeEvenement, EvenementRepository};

use crate::authorizers::{ConseillerAuthorizer, JeuneAuthorizer};
use crate::context::Contexte;
use crate::handler::{enregistrer_evenement, CommandHandler};

#[derive(Debug, Clone)]
pub struct CreateSuggestionConseillerCommand {
    pub ids_jeunes: Vec<JeuneId>,
    pub type_recherche: TypeRecherche,
    pub criteres: Value,
    pub informations: InformationsSuggestion,
}

pub struct CreateSuggestionConseillerCommandHandler {
    suggestions: Arc<dyn SuggestionRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl CreateSuggestionConseillerCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            suggestions: ctx.suggestions.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for CreateSuggestionConseillerCommandHandler {
    type Command = CreateSuggestionConseillerCommand;
    type Output = Vec<SuggestionId>;
    const NOM: &'static str = "CreateSuggestionConseillerCommandHandler";

    async fn authorize(
        &self,
        command: &CreateSuggestionConseillerCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.conseiller_authorizer
            .autoriser_conseiller_pour_ses_jeunes(&command.ids_jeunes, utilisateur)
            .await
    }

    async fn handle(&self, command: &CreateSuggestionConseillerCommand) -> DomainResult<Vec<SuggestionId>> {
        if command.ids_jeunes.is_empty() {
            return Err(DomainError::mauvaise_commande("Au moins un bénéficiaire est requis"));
        }
        let now = self.clock.now();
        let mut ids = Vec::with_capacity(command.ids_jeunes.len());
        for id_jeune in &command.ids_jeunes {
            let suggestion = Suggestion::creer_par_conseiller(
                *id_jeune,
                command.type_recherche,
                command.criteres.clone(),
                command.informations.clone(),
                now,
            );
            self.suggestions.save(&suggestion).await?;
            ids.push(suggestion.id);
        }
        Ok(ids)
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &CreateSuggestionConseillerCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::SuggestionCreee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone)]
pub struct RefuserSuggestionCommand {
    pub id_jeune: JeuneId,
    pub id_suggestion: SuggestionId,
}

pub struct RefuserSuggestionCommandHandler {
    suggestions: Arc<dyn SuggestionRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    jeune_authorizer: JeuneAuthorizer,
}

impl RefuserSuggestionCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            suggestions: ctx.suggestions.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            jeune_authorizer: ctx.jeune_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for RefuserSuggestionCommandHandler {
    type Command = RefuserSuggestionCommand;
    type Output = ();
    const NOM: &'static str = "RefuserSuggestionCommandHandler";

    async fn authorize(&self, command: &RefuserSuggestionCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        self.jeune_authorizer
            .autoriser_le_jeune(command.id_jeune, utilisateur)
    }

    async fn handle(&self, command: &RefuserSuggestionCommand) -> DomainResult<()> {
        let mut suggestion = self
            .suggestions
            .get(command.id_suggestion)
            .await?
            .filter(|s| s.id_jeune == command.id_jeune)
            .ok_or_else(|| DomainError::non_trouve("Suggestion", command.id_suggestion))?;

        suggestion.refuser(self.clock.now())?;
        self.suggestions.save(&suggestion).await?;
        Ok(())
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &RefuserSuggestionCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::SuggestionRefusee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

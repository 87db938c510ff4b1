//! Actions read side: a jeune's paginated listing and a single action

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{ActionId, DomainError, DomainResult, JeuneId, Utilisateur};
use domain_action::{
    ActionRepository, CodeQualification, EtatQualification, FiltreActions, Pagination,
    StatutAction, TriActions, NOMBRE_ACTIONS_PAR_PAGE,
};

use crate::authorizers::{ActionAuthorizer, ConseillerInterAgenceAuthorizer, JeuneAuthorizer};
use crate::context::Contexte;
use crate::handler::QueryHandler;
use crate::queries::query_models::{ActionQueryModel, ActionsJeuneQueryModel, MetadonneesActions};

#[derive(Debug, Clone, Default)]
pub struct GetActionsJeuneQuery {
    pub id_jeune: JeuneId,
    pub page: Option<u64>,
    pub tri: Option<TriActions>,
    pub statuts: Vec<StatutAction>,
    pub etats: Vec<EtatQualification>,
    pub codes_categories: Vec<CodeQualification>,
}

pub struct GetActionsJeuneQueryHandler {
    actions: Arc<dyn ActionRepository>,
    jeune_authorizer: JeuneAuthorizer,
    inter_agence_authorizer: ConseillerInterAgenceAuthorizer,
}

impl GetActionsJeuneQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            actions: ctx.actions.clone(),
            jeune_authorizer: ctx.jeune_authorizer(),
            inter_agence_authorizer: ctx.inter_agence_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetActionsJeuneQueryHandler {
    type Query = GetActionsJeuneQuery;
    type Output = ActionsJeuneQueryModel;
    const NOM: &'static str = "GetActionsJeuneQueryHandler";

    async fn authorize(&self, query: &GetActionsJeuneQuery, utilisateur: &Utilisateur) -> DomainResult<()> {
        if utilisateur.est_jeune() {
            return self.jeune_authorizer.autoriser_le_jeune(query.id_jeune, utilisateur);
        }
        self.inter_agence_authorizer
            .autoriser_conseiller_pour_son_jeune_ou_un_jeune_de_son_agence_milo(query.id_jeune, utilisateur)
            .await
    }

    async fn handle(&self, query: &GetActionsJeuneQuery) -> DomainResult<ActionsJeuneQueryModel> {
        let filtre = FiltreActions {
            statuts: query.statuts.clone(),
            etats: query.etats.clone(),
            codes_categories: query.codes_categories.clone(),
        };
        let pagination = Pagination { page: query.page };

        let page = self
            .actions
            .find_page(query.id_jeune, &filtre, query.tri.unwrap_or_default(), pagination)
            .await?;
        if !pagination.existe(page.nombre_filtrees) {
            return Err(DomainError::non_trouve(
                "Page",
                query.page.unwrap_or_default(),
            ));
        }

        Ok(ActionsJeuneQueryModel {
            actions: page.actions.iter().map(Into::into).collect(),
            metadonnees: MetadonneesActions {
                nombre_total: page.nombre_total,
                nombre_filtrees: page.nombre_filtrees,
                nombre_actions_par_page: NOMBRE_ACTIONS_PAR_PAGE,
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct GetDetailActionQuery {
    pub id_action: ActionId,
}

pub struct GetDetailActionQueryHandler {
    actions: Arc<dyn ActionRepository>,
    action_authorizer: ActionAuthorizer,
    inter_agence_authorizer: ConseillerInterAgenceAuthorizer,
}

impl GetDetailActionQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            actions: ctx.actions.clone(),
            action_authorizer: ctx.action_authorizer(),
            inter_agence_authorizer: ctx.inter_agence_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetDetailActionQueryHandler {
    type Query = GetDetailActionQuery;
    type Output = ActionQueryModel;
    const NOM: &'static str = "GetDetailActionQueryHandler";

    async fn authorize(&self, query: &GetDetailActionQuery, utilisateur: &Utilisateur) -> DomainResult<()> {
        if utilisateur.est_jeune() {
            return self
                .action_authorizer
                .autoriser_pour_une_action(query.id_action, utilisateur)
                .await;
        }
        self.inter_agence_authorizer
            .autoriser_conseiller_pour_une_action_de_son_jeune_ou_d_un_jeune_de_son_agence_milo(
                query.id_action,
                utilisateur,
            )
            .await
    }

    async fn handle(&self, query: &GetDetailActionQuery) -> DomainResult<ActionQueryModel> {
        let action = self
            .actions
            .get(query.id_action)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Action", query.id_action))?;
        Ok((&action).into())
    }
}

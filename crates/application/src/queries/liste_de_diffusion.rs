use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{ConseillerId, DomainError, DomainResult, ListeDeDiffusionId, Utilisateur};
use domain_beneficiaire::ListeDeDiffusionRepository;

use crate::authorizers::{ConseillerAuthorizer, ListeDeDiffusionAuthorizer};
use crate::context::Contexte;
use crate::handler::QueryHandler;
use crate::queries::query_models::ListeDeDiffusionQueryModel;

#[derive(Debug, Clone)]
pub struct GetListesDeDiffusionDuConseillerQuery {
    pub id_conseiller: ConseillerId,
}

pub struct GetListesDeDiffusionDuConseillerQueryHandler {
    listes: Arc<dyn ListeDeDiffusionRepository>,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl GetListesDeDiffusionDuConseillerQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            listes: ctx.listes_de_diffusion.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetListesDeDiffusionDuConseillerQueryHandler {
    type Query = GetListesDeDiffusionDuConseillerQuery;
    type Output = Vec<ListeDeDiffusionQueryModel>;
    const NOM: &'static str = "GetListesDeDiffusionDuConseillerQueryHandler";

    async fn authorize(
        &self,
        query: &GetListesDeDiffusionDuConseillerQuery,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.conseiller_authorizer
            .autoriser_le_conseiller(query.id_conseiller, utilisateur)
    }

    async fn handle(
        &self,
        query: &GetListesDeDiffusionDuConseillerQuery,
    ) -> DomainResult<Vec<ListeDeDiffusionQueryModel>> {
        let listes = self.listes.find_all_by_conseiller(query.id_conseiller).await?;
        Ok(listes.iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct GetDetailListeDeDiffusionQuery {
    pub id_liste: ListeDeDiffusionId,
}

pub struct GetDetailListeDeDiffusionQueryHandler {
    listes: Arc<dyn ListeDeDiffusionRepository>,
    liste_authorizer: ListeDeDiffusionAuthorizer,
}

impl GetDetailListeDeDiffusionQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            listes: ctx.listes_de_diffusion.clone(),
            liste_authorizer: ctx.liste_de_diffusion_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetDetailListeDeDiffusionQueryHandler {
    type Query = GetDetailListeDeDiffusionQuery;
    type Output = ListeDeDiffusionQueryModel;
    const NOM: &'static str = "GetDetailListeDeDiffusionQueryHandler";

    async fn authorize(
        &self,
        query: &GetDetailListeDeDiffusionQuery,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.liste_authorizer
            .autoriser_conseiller_pour_sa_liste(query.id_liste, utilisateur)
            .await
    }

    async fn handle(&self, query: &GetDetailListeDeDiffusionQuery) -> DomainResult<ListeDeDiffusionQueryModel> {
        let liste = self
            .listes
            .get(query.id_liste)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Liste de diffusion", query.id_liste))?;
        Ok((&liste).into())
    }
}

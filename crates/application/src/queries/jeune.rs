//! Jeune read side: a conseiller's portfolio and a jeune's detail

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{ConseillerId, DomainError, DomainResult, JeuneId, Utilisateur};
use domain_beneficiaire::JeuneRepository;

use crate::authorizers::{ConseillerAuthorizer, ConseillerInterAgenceAuthorizer, JeuneAuthorizer};
use crate::context::Contexte;
use crate::handler::QueryHandler;
use crate::queries::query_models::{DetailJeuneQueryModel, JeuneDuConseillerQueryModel};

#[derive(Debug, Clone)]
pub struct GetJeunesDuConseillerQuery {
    pub id_conseiller: ConseillerId,
}

pub struct GetJeunesDuConseillerQueryHandler {
    jeunes: Arc<dyn JeuneRepository>,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl GetJeunesDuConseillerQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetJeunesDuConseillerQueryHandler {
    type Query = GetJeunesDuConseillerQuery;
    type Output = Vec<JeuneDuConseillerQueryModel>;
    const NOM: &'static str = "GetJeunesDuConseillerQueryHandler";

    async fn authorize(
        &self,
        query: &GetJeunesDuConseillerQuery,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.conseiller_authorizer
            .autoriser_le_conseiller(query.id_conseiller, utilisateur)
            .or_else(|_| self.conseiller_authorizer.autoriser_conseiller_superviseur(utilisateur))
    }

    async fn handle(
        &self,
        query: &GetJeunesDuConseillerQuery,
    ) -> DomainResult<Vec<JeuneDuConseillerQueryModel>> {
        let mut jeunes = self.jeunes.find_all_by_conseiller(query.id_conseiller).await?;
        jeunes.sort_by(|a, b| a.nom.cmp(&b.nom).then_with(|| a.prenom.cmp(&b.prenom)));
        Ok(jeunes.iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct GetDetailJeuneQuery {
    pub id_jeune: JeuneId,
}

pub struct GetDetailJeuneQueryHandler {
    jeunes: Arc<dyn JeuneRepository>,
    jeune_authorizer: JeuneAuthorizer,
    inter_agence_authorizer: ConseillerInterAgenceAuthorizer,
}

impl GetDetailJeuneQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            jeune_authorizer: ctx.jeune_authorizer(),
            inter_agence_authorizer: ctx.inter_agence_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetDetailJeuneQueryHandler {
    type Query = GetDetailJeuneQuery;
    type Output = DetailJeuneQueryModel;
    const NOM: &'static str = "GetDetailJeuneQueryHandler";

    async fn authorize(&self, query: &GetDetailJeuneQuery, utilisateur: &Utilisateur) -> DomainResult<()> {
        if utilisateur.est_jeune() {
            return self.jeune_authorizer.autoriser_le_jeune(query.id_jeune, utilisateur);
        }
        self.inter_agence_authorizer
            .autoriser_conseiller_pour_son_jeune_ou_un_jeune_de_son_agence_milo(query.id_jeune, utilisateur)
            .await
    }

    async fn handle(&self, query: &GetDetailJeuneQuery) -> DomainResult<DetailJeuneQueryModel> {
        let jeune = self
            .jeunes
            .get(query.id_jeune)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Jeune", query.id_jeune))?;
        Ok((&jeune).into())
    }
}

//! Rendez-vous read side

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{Clock, ConseillerId, DomainError, DomainResult, JeuneId, RendezVousId, Utilisateur};
use domain_rendez_vous::{filtrer_par_periode, PeriodeRendezVous, RendezVousRepository};

use crate::authorizers::{
    ConseillerAuthorizer, ConseillerInterAgenceAuthorizer, JeuneAuthorizer, RendezVousAuthorizer,
};
use crate::context::Contexte;
use crate::handler::QueryHandler;
use crate::queries::query_models::RendezVousJeuneQueryModel;

#[derive(Debug, Clone)]
pub struct GetRendezVousJeuneQuery {
    pub id_jeune: JeuneId,
    pub periode: Option<PeriodeRendezVous>,
}

pub struct GetRendezVousJeuneQueryHandler {
    rendez_vous: Arc<dyn RendezVousRepository>,
    clock: Arc<dyn Clock>,
    jeune_authorizer: JeuneAuthorizer,
    inter_agence_authorizer: ConseillerInterAgenceAuthorizer,
}

impl GetRendezVousJeuneQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            rendez_vous: ctx.rendez_vous.clone(),
            clock: ctx.clock.clone(),
            jeune_authorizer: ctx.jeune_authorizer(),
            inter_agence_authorizer: ctx.inter_agence_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetRendezVousJeuneQueryHandler {
    type Query = GetRendezVousJeuneQuery;
    type Output = Vec<RendezVousJeuneQueryModel>;
    const NOM: &'static str = "GetRendezVousJeuneQueryHandler";

    async fn authorize(&self, query: &GetRendezVousJeuneQuery, utilisateur: &Utilisateur) -> DomainResult<()> {
        if utilisateur.est_jeune() {
            return self.jeune_authorizer.autoriser_le_jeune(query.id_jeune, utilisateur);
        }
        self.inter_agence_authorizer
            .autoriser_conseiller_pour_son_jeune_ou_un_jeune_de_son_agence_milo(query.id_jeune, utilisateur)
            .await
    }

    async fn handle(&self, query: &GetRendezVousJeuneQuery) -> DomainResult<Vec<RendezVousJeuneQueryModel>> {
        let rendez_vous = self.rendez_vous.find_all_by_jeune(query.id_jeune).await?;
        Ok(filtrer_par_periode(rendez_vous, query.periode, self.clock.now())
            .iter()
            .map(Into::into)
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct GetRendezVousConseillerQuery {
    pub id_conseiller: ConseillerId,
    pub presence_conseiller: Option<bool>,
}

pub struct GetRendezVousConseillerQueryHandler {
    rendez_vous: Arc<dyn RendezVousRepository>,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl GetRendezVousConseillerQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            rendez_vous: ctx.rendez_vous.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetRendezVousConseillerQueryHandler {
    type Query = GetRendezVousConseillerQuery;
    type Output = Vec<RendezVousJeuneQueryModel>;
    const NOM: &'static str = "GetRendezVousConseillerQueryHandler";

    async fn authorize(
        &self,
        query: &GetRendezVousConseillerQuery,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.conseiller_authorizer
            .autoriser_le_conseiller(query.id_conseiller, utilisateur)
    }

    async fn handle(
        &self,
        query: &GetRendezVousConseillerQuery,
    ) -> DomainResult<Vec<RendezVousJeuneQueryModel>> {
        let mut rendez_vous = self
            .rendez_vous
            .find_all_by_conseiller(query.id_conseiller, query.presence_conseiller)
            .await?;
        rendez_vous.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(rendez_vous.iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct GetDetailRendezVousQuery {
    pub id_rendez_vous: RendezVousId,
}

pub struct GetDetailRendezVousQueryHandler {
    rendez_vous: Arc<dyn RendezVousRepository>,
    rendez_vous_authorizer: RendezVousAuthorizer,
    inter_agence_authorizer: ConseillerInterAgenceAuthorizer,
}

impl GetDetailRendezVousQueryHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            rendez_vous: ctx.rendez_vous.clone(),
            rendez_vous_authorizer: ctx.rendez_vous_authorizer(),
            inter_agence_authorizer: ctx.inter_agence_authorizer(),
        }
    }
}

#[async_trait]
impl QueryHandler for GetDetailRendezVousQueryHandler {
    type Query = GetDetailRendezVousQuery;
    type Output = RendezVousJeuneQueryModel;
    const NOM: &'static str = "GetDetailRendezVousQueryHandler";

    /// MILO conseillers also see the rendez-vous of their agence colleagues
    async fn authorize(
        &self,
        query: &GetDetailRendezVousQuery,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let autorisation = self
            .rendez_vous_authorizer
            .autoriser_pour_un_rendez_vous(query.id_rendez_vous, utilisateur)
            .await;
        if autorisation.is_ok() || !utilisateur.est_conseiller() {
            return autorisation;
        }
        self.inter_agence_authorizer
            .autoriser_conseiller_pour_un_rendez_vous_de_son_agence_milo(
                query.id_rendez_vous,
                utilisateur,
            )
            .await
    }

    async fn handle(&self, query: &GetDetailRendezVousQuery) -> DomainResult<RendezVousJeuneQueryModel> {
        let rendez_vous = self
            .rendez_vous
            .get(query.id_rendez_vous)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Rendez-Vous", query.id_rendez_vous))?;
        Ok((&rendez_vous).into())
    }
}

//! Move of a conseiller to another agence, done by the support

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use core_kernel::{AgenceId, ConseillerId, DomainError, DomainResult, Utilisateur};
use domain_beneficiaire::{AgenceRepository, ConseillerRepository};
use domain_rendez_vous::RendezVousRepository;

use crate::authorizers::SupportAuthorizer;
use crate::context::Contexte;
use crate::handler::CommandHandler;
use crate::queries::{ChangementAgenceQueryModel, InfoTransfertAnimationCollectiveQueryModel};

#[derive(Debug, Clone)]
pub struct UpdateAgenceConseillerCommand {
    pub id_conseiller: ConseillerId,
    pub id_nouvelle_agence: AgenceId,
}

pub struct UpdateAgenceConseillerCommandHandler {
    conseillers: Arc<dyn ConseillerRepository>,
    agences: Arc<dyn AgenceRepository>,
    rendez_vous: Arc<dyn RendezVousRepository>,
    support_authorizer: SupportAuthorizer,
}

impl UpdateAgenceConseillerCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            conseillers: ctx.conseillers.clone(),
            agences: ctx.agences.clone(),
            rendez_vous: ctx.rendez_vous.clone(),
            support_authorizer: ctx.support_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for UpdateAgenceConseillerCommandHandler {
    type Command = UpdateAgenceConseillerCommand;
    type Output = ChangementAgenceQueryModel;
    const NOM: &'static str = "UpdateAgenceConseillerCommandHandler";

    async fn authorize(
        &self,
        _command: &UpdateAgenceConseillerCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.support_authorizer.autoriser_support(utilisateur)
    }

    /// Animations collectives of the former agence follow their createur;
    /// the jeunes left behind on either side are unsubscribed
    async fn handle(
        &self,
        command: &UpdateAgenceConseillerCommand,
    ) -> DomainResult<ChangementAgenceQueryModel> {
        let mut conseiller = self
            .conseillers
            .get(command.id_conseiller)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Conseiller", command.id_conseiller))?;
        let ancienne_agence = conseiller
            .id_agence()
            .ok_or_else(|| DomainError::ConseillerSansAgence(conseiller.id.to_string()))?;
        let agence = self
            .agences
            .get(command.id_nouvelle_agence, conseiller.structure)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Agence", command.id_nouvelle_agence))?;
        if agence.id == ancienne_agence {
            return Err(DomainError::mauvaise_commande(
                "Le conseiller est déjà dans cette agence",
            ));
        }

        let mut infos = Vec::new();
        for mut animation in self
            .rendez_vous
            .find_animations_collectives_by_agence(ancienne_agence)
            .await?
        {
            let reaffectation = animation.suivre_le_changement_d_agence(conseiller.id, agence.id);
            if !reaffectation.agence_transferee && reaffectation.jeunes_desinscrits.is_empty() {
                continue;
            }
            self.rendez_vous.save(&animation).await?;
            infos.push(InfoTransfertAnimationCollectiveQueryModel::new(
                &animation,
                reaffectation,
            ));
        }

        conseiller.changer_d_agence(&agence);
        self.conseillers.save(&conseiller).await?;

        info!(
            id_conseiller = %conseiller.id,
            %ancienne_agence,
            nouvelle_agence = %agence.id,
            nb_animations = infos.len(),
            "Conseiller changé d'agence"
        );
        Ok(ChangementAgenceQueryModel {
            id_ancienne_agence: ancienne_agence.as_uuid(),
            id_nouvelle_agence: agence.id.as_uuid(),
            infos_transfert_animations_collectives: infos,
        })
    }
}

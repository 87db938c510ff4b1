//! Transfer of jeunes between conseillers

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use core_kernel::{Clock, ConseillerId, DomainError, DomainResult, JeuneId, Utilisateur};
use domain_beneficiaire::{
    transferer_les_jeunes, ConseillerRepository, JeuneRepository, TransfertConseiller,
    TypeTransfert,
};
use domain_notification::{CodeEvenement, EvenementRepository};

use crate::authorizers::ConseillerAuthorizer;
use crate::context::Contexte;
use crate::handler::{enregistrer_evenement, CommandHandler};

#[derive(Debug, Clone)]
pub struct TransfererJeunesCommand {
    pub id_conseiller_source: ConseillerId,
    pub id_conseiller_cible: ConseillerId,
    pub ids_jeunes: Vec<JeuneId>,
    pub type_transfert: TypeTransfert,
    /// Conseiller performing the transfer, recorded in the history
    pub id_conseiller_qui_transfert: Option<ConseillerId>,
}

pub struct TransfererJeunesCommandHandler {
    jeunes: Arc<dyn JeuneRepository>,
    conseillers: Arc<dyn ConseillerRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl TransfererJeunesCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            conseillers: ctx.conseillers.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for TransfererJeunesCommandHandler {
    type Command = TransfererJeunesCommand;
    type Output = ();
    const NOM: &'static str = "TransfererJeunesCommandHandler";

    /// Superviseurs transfer anything; a conseiller may only lend its own
    /// jeunes temporarily
    async fn authorize(&self, command: &TransfererJeunesCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        if utilisateur.est_superviseur() {
            return Ok(());
        }
        if command.type_transfert == TypeTransfert::Temporaire {
            return self
                .conseiller_authorizer
                .autoriser_le_conseiller(command.id_conseiller_source, utilisateur);
        }
        Err(DomainError::DroitsInsuffisants)
    }

    async fn handle(&self, command: &TransfererJeunesCommand) -> DomainResult<()> {
        let cible = self
            .conseillers
            .get(command.id_conseiller_cible)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Conseiller", command.id_conseiller_cible))?;

        let jeunes = self.jeunes.find_all(&command.ids_jeunes).await?;
        if jeunes.len() != command.ids_jeunes.len() {
            return Err(DomainError::non_trouve("Jeune", "transféré"));
        }
        if let Some(jeune) = jeunes
            .iter()
            .find(|j| !j.est_suivi_par(command.id_conseiller_source))
        {
            return Err(DomainError::jeune_non_lie_au_conseiller(
                command.id_conseiller_source,
                jeune.id,
            ));
        }

        let now = self.clock.now();
        let transferts: Vec<TransfertConseiller> = jeunes
            .iter()
            .map(|jeune| TransfertConseiller {
                id_jeune: jeune.id,
                id_conseiller_source: command.id_conseiller_source,
                id_conseiller_cible: cible.id,
                id_conseiller_qui_transfert: command.id_conseiller_qui_transfert,
                type_transfert: command.type_transfert,
                date_transfert: now,
            })
            .collect();
        let transferes = transferer_les_jeunes(jeunes, &cible, command.type_transfert);

        self.jeunes.transferer(&transferes, &transferts).await?;
        info!(
            nombre = transferes.len(),
            source = %command.id_conseiller_source,
            cible = %cible.id,
            type_transfert = ?command.type_transfert,
            "Jeunes transférés"
        );
        Ok(())
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &TransfererJeunesCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::JeunesTransferes,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

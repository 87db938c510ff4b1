//! Group message from a conseiller
//!
//! The message itself lives in the chat store; this handler checks the
//! recipients and pushes a "nouveau message" notification to each of them.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use core_kernel::{
    Clock, ConseillerId, DomainError, DomainResult, JeuneId, ListeDeDiffusionId, Utilisateur,
};
use domain_beneficiaire::{JeuneRepository, ListeDeDiffusionRepository};
use domain_notification::{CodeEvenement, EvenementRepository, NotificationService};

use crate::authorizers::{ConseillerAuthorizer, ListeDeDiffusionAuthorizer};
use crate::context::Contexte;
use crate::handler::{enregistrer_evenement, valider, CommandHandler};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceJointe {
    pub id: String,
    pub nom: String,
}

#[derive(Debug, Clone, Validate)]
pub struct EnvoyerMessageGroupeCommand {
    pub id_conseiller: ConseillerId,
    pub ids_beneficiaires: Vec<JeuneId>,
    pub ids_listes_de_diffusion: Vec<ListeDeDiffusionId>,
    /// Encrypted content
    #[validate(length(min = 1, message = "le message est obligatoire"))]
    pub message: String,
    pub iv: String,
    pub info_piece_jointe: Option<PieceJointe>,
}

impl EnvoyerMessageGroupeCommand {
    fn est_multiple(&self) -> bool {
        self.ids_beneficiaires.len() > 1 || !self.ids_listes_de_diffusion.is_empty()
    }

    fn code_evenement(&self) -> CodeEvenement {
        match (self.est_multiple(), self.info_piece_jointe.is_some()) {
            (false, false) => CodeEvenement::MessageEnvoye,
            (true, false) => CodeEvenement::MessageEnvoyeMultiple,
            (false, true) => CodeEvenement::MessageEnvoyePj,
            (true, true) => CodeEvenement::MessageEnvoyeMultiplePj,
        }
    }
}

pub struct EnvoyerMessageGroupeCommandHandler {
    jeunes: Arc<dyn JeuneRepository>,
    listes: Arc<dyn ListeDeDiffusionRepository>,
    evenements: Arc<dyn EvenementRepository>,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
    conseiller_authorizer: ConseillerAuthorizer,
    liste_authorizer: ListeDeDiffusionAuthorizer,
}

impl EnvoyerMessageGroupeCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            listes: ctx.listes_de_diffusion.clone(),
            evenements: ctx.evenements.clone(),
            notifications: ctx.notification_service(),
            clock: ctx.clock.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
            liste_authorizer: ctx.liste_de_diffusion_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for EnvoyerMessageGroupeCommandHandler {
    type Command = EnvoyerMessageGroupeCommand;
    type Output = ();
    const NOM: &'static str = "EnvoyerMessageGroupeCommandHandler";

    async fn authorize(
        &self,
        command: &EnvoyerMessageGroupeCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        if command.ids_beneficiaires.is_empty() && command.ids_listes_de_diffusion.is_empty() {
            return Err(DomainError::mauvaise_commande("Aucun destinataire"));
        }
        self.conseiller_authorizer
            .autoriser_le_conseiller(command.id_conseiller, utilisateur)?;
        if !command.ids_beneficiaires.is_empty() {
            self.conseiller_authorizer
                .autoriser_conseiller_pour_ses_jeunes(&command.ids_beneficiaires, utilisateur)
                .await?;
        }
        for id_liste in &command.ids_listes_de_diffusion {
            self.liste_authorizer
                .autoriser_conseiller_pour_sa_liste(*id_liste, utilisateur)
                .await?;
        }
        Ok(())
    }

    async fn handle(&self, command: &EnvoyerMessageGroupeCommand) -> DomainResult<()> {
        valider(command)?;

        let mut destinataires = command.ids_beneficiaires.clone();
        for id_liste in &command.ids_listes_de_diffusion {
            match self.listes.get(*id_liste).await? {
                Some(liste) => {
                    info!(%id_liste, pj = command.info_piece_jointe.is_some(), "Message déposé sur la liste");
                    destinataires.extend(liste.ids_beneficiaires());
                }
                None => warn!(%id_liste, "Liste de diffusion introuvable, ignorée"),
            }
        }
        let mut vus = Vec::with_capacity(destinataires.len());
        destinataires.retain(|id| {
            if vus.contains(id) {
                false
            } else {
                vus.push(*id);
                true
            }
        });

        let jeunes = self.jeunes.find_all(&destinataires).await?;
        let envoyees = self
            .notifications
            .notifier_nouveau_message(&jeunes, self.clock.now())
            .await;
        info!(
            id_conseiller = %command.id_conseiller,
            nb_destinataires = destinataires.len(),
            envoyees,
            "Message groupé envoyé"
        );
        Ok(())
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        command: &EnvoyerMessageGroupeCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            command.code_evenement(),
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

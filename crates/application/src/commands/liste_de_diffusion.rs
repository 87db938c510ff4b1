//! Liste de diffusion commands

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use core_kernel::{
    Clock, ConseillerId, DomainError, DomainResult, JeuneId, ListeDeDiffusionId, Utilisateur,
};
use domain_beneficiaire::{ListeDeDiffusion, ListeDeDiffusionRepository};
use domain_notification::{CodeEvenement, EvenementRepository};

use crate::authorizers::{ConseillerAuthorizer, ListeDeDiffusionAuthorizer};
use crate::context::Contexte;
use crate::handler::{enregistrer_evenement, valider, CommandHandler};

#[derive(Debug, Clone, Validate)]
pub struct CreateListeDeDiffusionCommand {
    pub id_conseiller: ConseillerId,
    #[validate(length(min = 1, message = "le titre est obligatoire"))]
    pub titre: String,
    pub ids_beneficiaires: Vec<JeuneId>,
}

pub struct CreateListeDeDiffusionCommandHandler {
    listes: Arc<dyn ListeDeDiffusionRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl CreateListeDeDiffusionCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            listes: ctx.listes_de_diffusion.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for CreateListeDeDiffusionCommandHandler {
    type Command = CreateListeDeDiffusionCommand;
    type Output = ListeDeDiffusionId;
    const NOM: &'static str = "CreateListeDeDiffusionCommandHandler";

    async fn authorize(
        &self,
        command: &CreateListeDeDiffusionCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.conseiller_authorizer
            .autoriser_le_conseiller(command.id_conseiller, utilisateur)?;
        self.conseiller_authorizer
            .autoriser_conseiller_pour_ses_jeunes_transferes(&command.ids_beneficiaires, utilisateur)
            .await
    }

    async fn handle(&self, command: &CreateListeDeDiffusionCommand) -> DomainResult<ListeDeDiffusionId> {
        valider(command)?;
        let liste = ListeDeDiffusion::creer(
            ListeDeDiffusionId::new(),
            command.id_conseiller,
            command.titre.clone(),
            &command.ids_beneficiaires,
            self.clock.now(),
        );
        self.listes.save(&liste).await?;
        Ok(liste.id)
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &CreateListeDeDiffusionCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::ListeDeDiffusionCreee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone, Validate)]
pub struct UpdateListeDeDiffusionCommand {
    pub id_liste: ListeDeDiffusionId,
    #[validate(length(min = 1, message = "le titre est obligatoire"))]
    pub titre: String,
    pub ids_beneficiaires: Vec<JeuneId>,
}

pub struct UpdateListeDeDiffusionCommandHandler {
    listes: Arc<dyn ListeDeDiffusionRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    conseiller_authorizer: ConseillerAuthorizer,
    liste_authorizer: ListeDeDiffusionAuthorizer,
}

impl UpdateListeDeDiffusionCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            listes: ctx.listes_de_diffusion.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
            liste_authorizer: ctx.liste_de_diffusion_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for UpdateListeDeDiffusionCommandHandler {
    type Command = UpdateListeDeDiffusionCommand;
    type Output = ();
    const NOM: &'static str = "UpdateListeDeDiffusionCommandHandler";

    async fn authorize(
        &self,
        command: &UpdateListeDeDiffusionCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.liste_authorizer
            .autoriser_conseiller_pour_sa_liste(command.id_liste, utilisateur)
            .await?;
        self.conseiller_authorizer
            .autoriser_conseiller_pour_ses_jeunes_transferes(&command.ids_beneficiaires, utilisateur)
            .await
    }

    async fn handle(&self, command: &UpdateListeDeDiffusionCommand) -> DomainResult<()> {
        valider(command)?;
        let mut liste = self
            .listes
            .get(command.id_liste)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Liste de diffusion", command.id_liste))?;

        liste.mettre_a_jour(
            command.titre.clone(),
            &command.ids_beneficiaires,
            self.clock.now(),
        );
        self.listes.save(&liste).await?;
        Ok(())
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &UpdateListeDeDiffusionCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::ListeDeDiffusionModifiee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone)]
pub struct DeleteListeDeDiffusionCommand {
    pub id_liste: ListeDeDiffusionId,
}

pub struct DeleteListeDeDiffusionCommandHandler {
    listes: Arc<dyn ListeDeDiffusionRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    liste_authorizer: ListeDeDiffusionAuthorizer,
}

impl DeleteListeDeDiffusionCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            listes: ctx.listes_de_diffusion.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            liste_authorizer: ctx.liste_de_diffusion_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for DeleteListeDeDiffusionCommandHandler {
    type Command = DeleteListeDeDiffusionCommand;
    type Output = ();
    const NOM: &'static str = "DeleteListeDeDiffusionCommandHandler";

    async fn authorize(
        &self,
        command: &DeleteListeDeDiffusionCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.liste_authorizer
            .autoriser_conseiller_pour_sa_liste(command.id_liste, utilisateur)
            .await
    }

    async fn handle(&self, command: &DeleteListeDeDiffusionCommand) -> DomainResult<()> {
        if self.listes.get(command.id_liste).await?.is_none() {
            return Err(DomainError::non_trouve("Liste de diffusion", command.id_liste));
        }
        self.listes.delete(command.id_liste).await?;
        Ok(())
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &DeleteListeDeDiffusionCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::ListeDeDiffusionSupprimee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

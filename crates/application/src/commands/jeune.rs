//! Jeune account commands

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use core_kernel::{
    Clock, ConseillerId, DomainError, DomainResult, JeuneId, Structure, Utilisateur,
};
use domain_beneficiaire::{
    ConseillerRepository, Jeune, JeuneRepository, MiseAJourPreferences, NouveauJeune,
};
use domain_notification::{CodeEvenement, EvenementRepository};

use crate::authorizers::{ConseillerAuthorizer, JeuneAuthorizer, SupportAuthorizer};
use crate::context::Contexte;
use crate::handler::{enregistrer_evenement, valider, CommandHandler};

#[derive(Debug, Clone, Validate)]
pub struct CreerJeuneCommand {
    pub id_conseiller: ConseillerId,
    #[validate(length(min = 1, message = "le prénom est obligatoire"))]
    pub prenom: String,
    #[validate(length(min = 1, message = "le nom est obligatoire"))]
    pub nom: String,
    #[validate(email(message = "l'email est invalide"))]
    pub email: Option<String>,
    pub structure: Structure,
    pub id_partenaire: Option<String>,
}

pub struct CreerJeuneCommandHandler {
    jeunes: Arc<dyn JeuneRepository>,
    conseillers: Arc<dyn ConseillerRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl CreerJeuneCommandHandler {
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
impl CommandHandler for CreerJeuneCommandHandler {
    type Command = CreerJeuneCommand;
    type Output = Jeune;
    const NOM: &'static str = "CreerJeuneCommandHandler";

    async fn authorize(&self, command: &CreerJeuneCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        self.conseiller_authorizer
            .autoriser_le_conseiller(command.id_conseiller, utilisateur)
    }

    async fn handle(&self, command: &CreerJeuneCommand) -> DomainResult<Jeune> {
        valider(command)?;

        let conseiller = self
            .conseillers
            .get(command.id_conseiller)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Conseiller", command.id_conseiller))?;

        if let Some(email) = &command.email {
            if self.jeunes.exists_by_email(email).await? {
                return Err(DomainError::EmailExisteDeja(email.clone()));
            }
        }
        if let Some(id_partenaire) = &command.id_partenaire {
            if self
                .jeunes
                .exists_by_id_partenaire(id_partenaire, command.structure)
                .await?
            {
                return Err(DomainError::DossierExisteDeja(id_partenaire.clone()));
            }
        }

        let jeune = Jeune::creer(
            NouveauJeune {
                id: JeuneId::new(),
                prenom: command.prenom.clone(),
                nom: command.nom.clone(),
                email: command.email.clone(),
                structure: command.structure,
                id_partenaire: command.id_partenaire.clone(),
            },
            &conseiller,
            self.clock.now(),
        );
        self.jeunes.save(&jeune).await?;
        Ok(jeune)
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &CreerJeuneCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::CompteJeuneCree,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone)]
pub struct ModifierJeuneDuConseillerCommand {
    pub id_jeune: JeuneId,
    pub id_partenaire: Option<String>,
}

pub struct ModifierJeuneDuConseillerCommandHandler {
    jeunes: Arc<dyn JeuneRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl ModifierJeuneDuConseillerCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for ModifierJeuneDuConseillerCommandHandler {
    type Command = ModifierJeuneDuConseillerCommand;
    type Output = ();
    const NOM: &'static str = "ModifierJeuneDuConseillerCommandHandler";

    async fn authorize(
        &self,
        command: &ModifierJeuneDuConseillerCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.conseiller_authorizer
            .autoriser_conseiller_pour_son_jeune(command.id_jeune, utilisateur)
            .await
    }

    async fn handle(&self, command: &ModifierJeuneDuConseillerCommand) -> DomainResult<()> {
        let mut jeune = self
            .jeunes
            .get(command.id_jeune)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Jeune", command.id_jeune))?;
        jeune.id_partenaire = command.id_partenaire.clone();
        self.jeunes.save(&jeune).await?;
        Ok(())
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &ModifierJeuneDuConseillerCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::CompteJeuneModifie,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateJeunePreferencesCommand {
    pub id_jeune: JeuneId,
    pub preferences: MiseAJourPreferences,
}

pub struct UpdateJeunePreferencesCommandHandler {
    jeunes: Arc<dyn JeuneRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    jeune_authorizer: JeuneAuthorizer,
}

impl UpdateJeunePreferencesCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            jeune_authorizer: ctx.jeune_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for UpdateJeunePreferencesCommandHandler {
    type Command = UpdateJeunePreferencesCommand;
    type Output = ();
    const NOM: &'static str = "UpdateJeunePreferencesCommandHandler";

    async fn authorize(
        &self,
        command: &UpdateJeunePreferencesCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.jeune_authorizer
            .autoriser_le_jeune(command.id_jeune, utilisateur)
    }

    async fn handle(&self, command: &UpdateJeunePreferencesCommand) -> DomainResult<()> {
        let mut jeune = self
            .jeunes
            .get(command.id_jeune)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Jeune", command.id_jeune))?;
        jeune.mettre_a_jour_preferences(command.preferences);
        self.jeunes.save(&jeune).await?;
        Ok(())
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &UpdateJeunePreferencesCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::PreferencesModifiees,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateNotificationTokenCommand {
    pub id_jeune: JeuneId,
    pub token: String,
    pub app_version: Option<String>,
}

pub struct UpdateNotificationTokenCommandHandler {
    jeunes: Arc<dyn JeuneRepository>,
    clock: Arc<dyn Clock>,
    jeune_authorizer: JeuneAuthorizer,
}

impl UpdateNotificationTokenCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            clock: ctx.clock.clone(),
            jeune_authorizer: ctx.jeune_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for UpdateNotificationTokenCommandHandler {
    type Command = UpdateNotificationTokenCommand;
    type Output = ();
    const NOM: &'static str = "UpdateNotificationTokenCommandHandler";

    async fn authorize(
        &self,
        command: &UpdateNotificationTokenCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.jeune_authorizer
            .autoriser_le_jeune(command.id_jeune, utilisateur)
    }

    async fn handle(&self, command: &UpdateNotificationTokenCommand) -> DomainResult<()> {
        let mut jeune = self
            .jeunes
            .get(command.id_jeune)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Jeune", command.id_jeune))?;
        jeune.mettre_a_jour_token(command.token.clone(), self.clock.now());
        if command.app_version.is_some() {
            jeune.configuration.app_version = command.app_version.clone();
        }
        self.jeunes.save(&jeune).await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SupprimerJeuneCommand {
    pub id_jeune: JeuneId,
}

pub struct SupprimerJeuneCommandHandler {
    jeunes: Arc<dyn JeuneRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    jeune_authorizer: JeuneAuthorizer,
    support_authorizer: SupportAuthorizer,
}

impl SupprimerJeuneCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            jeune_authorizer: ctx.jeune_authorizer(),
            support_authorizer: ctx.support_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for SupprimerJeuneCommandHandler {
    type Command = SupprimerJeuneCommand;
    type Output = ();
    const NOM: &'static str = "SupprimerJeuneCommandHandler";

    async fn authorize(&self, command: &SupprimerJeuneCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        if utilisateur.est_support() {
            return self.support_authorizer.autoriser_support(utilisateur);
        }
        self.jeune_authorizer
            .autoriser_le_jeune(command.id_jeune, utilisateur)
    }

    async fn handle(&self, command: &SupprimerJeuneCommand) -> DomainResult<()> {
        let jeune = self
            .jeunes
            .get(command.id_jeune)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Jeune", command.id_jeune))?;

        self.jeunes.supprimer(jeune.id).await?;

        if let Some(email) = jeune.conseiller.as_ref().and_then(|c| c.email.as_deref()) {
            info!(
                id_jeune = %jeune.id,
                email_conseiller = email,
                "Compte du bénéficiaire supprimé, le conseiller doit en être informé"
            );
        }
        Ok(())
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &SupprimerJeuneCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::CompteJeuneSupprime,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

/// Lets a conseiller delete a jeune that never connected to the application
#[derive(Debug, Clone)]
pub struct SupprimerJeuneInactifCommand {
    pub id_jeune: JeuneId,
}

pub struct SupprimerJeuneInactifCommandHandler {
    jeunes: Arc<dyn JeuneRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl SupprimerJeuneInactifCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for SupprimerJeuneInactifCommandHandler {
    type Command = SupprimerJeuneInactifCommand;
    type Output = ();
    const NOM: &'static str = "SupprimerJeuneInactifCommandHandler";

    async fn authorize(
        &self,
        command: &SupprimerJeuneInactifCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.conseiller_authorizer
            .autoriser_conseiller_pour_son_jeune(command.id_jeune, utilisateur)
            .await
    }

    async fn handle(&self, command: &SupprimerJeuneInactifCommand) -> DomainResult<()> {
        let jeune = self
            .jeunes
            .get(command.id_jeune)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Jeune", command.id_jeune))?;
        if jeune.is_activated {
            return Err(DomainError::JeunePasInactif(jeune.id.to_string()));
        }
        self.jeunes.supprimer(jeune.id).await?;
        Ok(())
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &SupprimerJeuneInactifCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::CompteJeuneSupprime,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

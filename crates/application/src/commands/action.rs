//! Action commands

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;
use validator::Validate;

use core_kernel::{ActionId, Clock, DomainError, DomainResult, JeuneId, Utilisateur};
use domain_action::{
    Action, ActionRepository, CodeQualification, Commentaire, CommentaireRepository,
    MiseAJourAction, NouvelleAction, StatutAction, TypeCreateur,
};
use domain_beneficiaire::{Jeune, JeuneRepository};
use domain_notification::{
    CodeEvenement, EvenementRepository, NotificationService, PlanificateurService,
};

use crate::authorizers::{ActionAuthorizer, ConseillerAuthorizer, JeuneAuthorizer};
use crate::context::Contexte;
use crate::handler::{enregistrer_evenement, valider, CommandHandler};

async fn charger_jeune(jeunes: &dyn JeuneRepository, id_jeune: JeuneId) -> DomainResult<Jeune> {
    jeunes
        .get(id_jeune)
        .await?
        .ok_or_else(|| DomainError::non_trouve("Jeune", id_jeune))
}

async fn charger_action(actions: &dyn ActionRepository, id_action: ActionId) -> DomainResult<Action> {
    actions
        .get(id_action)
        .await?
        .ok_or_else(|| DomainError::non_trouve("Action", id_action))
}

#[derive(Debug, Clone, Validate)]
pub struct CreateActionCommand {
    pub id_action: ActionId,
    pub id_jeune: JeuneId,
    #[validate(length(min = 1, message = "le contenu est obligatoire"))]
    pub contenu: String,
    pub description: Option<String>,
    pub statut: Option<StatutAction>,
    pub type_createur: TypeCreateur,
    pub date_echeance: DateTime<Utc>,
    pub rappel: Option<bool>,
}

pub struct CreateActionCommandHandler {
    actions: Arc<dyn ActionRepository>,
    jeunes: Arc<dyn JeuneRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    notifications: NotificationService,
    planificateur: PlanificateurService,
    jeune_authorizer: JeuneAuthorizer,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl CreateActionCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            actions: ctx.actions.clone(),
            jeunes: ctx.jeunes.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            notifications: ctx.notification_service(),
            planificateur: ctx.planificateur_service(),
            jeune_authorizer: ctx.jeune_authorizer(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for CreateActionCommandHandler {
    type Command = CreateActionCommand;
    type Output = ActionId;
    const NOM: &'static str = "CreateActionCommandHandler";

    async fn authorize(&self, command: &CreateActionCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        if utilisateur.est_jeune() {
            return self
                .jeune_authorizer
                .autoriser_le_jeune(command.id_jeune, utilisateur);
        }
        self.conseiller_authorizer
            .autoriser_conseiller_pour_son_jeune(command.id_jeune, utilisateur)
            .await
    }

    async fn handle(&self, command: &CreateActionCommand) -> DomainResult<ActionId> {
        valider(command)?;
        let now = self.clock.now();
        let jeune = charger_jeune(self.jeunes.as_ref(), command.id_jeune).await?;

        let action = Action::creer(
            NouvelleAction {
                id: command.id_action,
                contenu: command.contenu.clone(),
                description: command.description.clone(),
                statut: command.statut,
                type_createur: command.type_createur,
                date_echeance: command.date_echeance,
                rappel: command.rappel,
            },
            &jeune,
            now,
        )?;
        self.actions.save(&action).await?;

        if action.createur.type_createur == TypeCreateur::Conseiller {
            self.notifications
                .notifier_nouvelle_action(&jeune, &action, now)
                .await;
        }
        if let Err(e) = self.planificateur.planifier_rappel_action(&action, now).await {
            warn!(id_action = %action.id, error = %e, "Echec de la planification du rappel");
        }
        Ok(action.id)
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &CreateActionCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::ActionCreee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateActionCommand {
    pub id_action: ActionId,
    pub statut: Option<StatutAction>,
    pub contenu: Option<String>,
    pub description: Option<String>,
    pub date_echeance: Option<DateTime<Utc>>,
}

pub struct UpdateActionCommandHandler {
    actions: Arc<dyn ActionRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    planificateur: PlanificateurService,
    action_authorizer: ActionAuthorizer,
}

impl UpdateActionCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            actions: ctx.actions.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            planificateur: ctx.planificateur_service(),
            action_authorizer: ctx.action_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for UpdateActionCommandHandler {
    type Command = UpdateActionCommand;
    type Output = ();
    const NOM: &'static str = "UpdateActionCommandHandler";

    async fn authorize(&self, command: &UpdateActionCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        self.action_authorizer
            .autoriser_pour_une_action(command.id_action, utilisateur)
            .await
    }

    async fn handle(&self, command: &UpdateActionCommand) -> DomainResult<()> {
        if matches!(&command.contenu, Some(contenu) if contenu.trim().is_empty()) {
            return Err(DomainError::mauvaise_commande("contenu: le contenu est obligatoire"));
        }
        let now = self.clock.now();
        let mut action = charger_action(self.actions.as_ref(), command.id_action).await?;

        let echeance_modifiee = action.mettre_a_jour(
            MiseAJourAction {
                statut: command.statut,
                contenu: command.contenu.clone(),
                description: command.description.clone(),
                date_echeance: command.date_echeance,
            },
            now,
        )?;
        self.actions.save(&action).await?;

        if echeance_modifiee || action.statut.est_cloture() {
            self.replanifier_rappel(&action, now).await;
        }
        Ok(())
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &UpdateActionCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::ActionModifiee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

impl UpdateActionCommandHandler {
    async fn replanifier_rappel(&self, action: &Action, now: DateTime<Utc>) {
        let resultat = async {
            self.planificateur
                .supprimer_rappels_par_id(action.id.into_uuid())
                .await?;
            self.planificateur.planifier_rappel_action(action, now).await
        }
        .await;
        if let Err(e) = resultat {
            warn!(id_action = %action.id, error = %e, "Echec de la replanification du rappel");
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeleteActionCommand {
    pub id_action: ActionId,
}

pub struct DeleteActionCommandHandler {
    actions: Arc<dyn ActionRepository>,
    commentaires: Arc<dyn CommentaireRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    planificateur: PlanificateurService,
    action_authorizer: ActionAuthorizer,
}

impl DeleteActionCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            actions: ctx.actions.clone(),
            commentaires: ctx.commentaires.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            planificateur: ctx.planificateur_service(),
            action_authorizer: ctx.action_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for DeleteActionCommandHandler {
    type Command = DeleteActionCommand;
    type Output = ();
    const NOM: &'static str = "DeleteActionCommandHandler";

    async fn authorize(&self, command: &DeleteActionCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        self.action_authorizer
            .autoriser_pour_une_action(command.id_action, utilisateur)
            .await
    }

    async fn handle(&self, command: &DeleteActionCommand) -> DomainResult<()> {
        let action = charger_action(self.actions.as_ref(), command.id_action).await?;
        let a_des_commentaires = self.commentaires.exists_for_action(action.id).await?;
        action.verifier_suppression(a_des_commentaires)?;

        self.actions.delete(action.id).await?;
        if let Err(e) = self
            .planificateur
            .supprimer_rappels_par_id(action.id.into_uuid())
            .await
        {
            warn!(id_action = %action.id, error = %e, "Echec de la suppression des rappels");
        }
        Ok(())
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &DeleteActionCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::ActionSupprimee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone, Validate)]
pub struct AddCommentaireActionCommand {
    pub id_action: ActionId,
    #[validate(length(min = 1, message = "le commentaire est vide"))]
    pub message: String,
    pub auteur: Utilisateur,
}

pub struct AddCommentaireActionCommandHandler {
    actions: Arc<dyn ActionRepository>,
    commentaires: Arc<dyn CommentaireRepository>,
    jeunes: Arc<dyn JeuneRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    notifications: NotificationService,
    action_authorizer: ActionAuthorizer,
}

impl AddCommentaireActionCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            actions: ctx.actions.clone(),
            commentaires: ctx.commentaires.clone(),
            jeunes: ctx.jeunes.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            notifications: ctx.notification_service(),
            action_authorizer: ctx.action_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for AddCommentaireActionCommandHandler {
    type Command = AddCommentaireActionCommand;
    type Output = Commentaire;
    const NOM: &'static str = "AddCommentaireActionCommandHandler";

    async fn authorize(
        &self,
        command: &AddCommentaireActionCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.action_authorizer
            .autoriser_pour_une_action(command.id_action, utilisateur)
            .await
    }

    async fn handle(&self, command: &AddCommentaireActionCommand) -> DomainResult<Commentaire> {
        valider(command)?;
        let now = self.clock.now();
        let action = charger_action(self.actions.as_ref(), command.id_action).await?;

        let commentaire = Commentaire::creer(action.id, command.message.clone(), &command.auteur, now);
        self.commentaires.save(&commentaire).await?;

        if commentaire.est_du_conseiller() {
            let jeune = charger_jeune(self.jeunes.as_ref(), action.id_jeune).await?;
            self.notifications
                .notifier_commentaire_action(&jeune, &action, now)
                .await;
        }
        Ok(commentaire)
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &AddCommentaireActionCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::ActionCommentee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone)]
pub struct QualifierActionCommand {
    pub id_action: ActionId,
    pub code_qualification: CodeQualification,
    pub heures: Option<u32>,
    pub commentaire: Option<String>,
    pub date_debut: Option<DateTime<Utc>>,
    pub date_fin_reelle: Option<DateTime<Utc>>,
}

pub struct QualifierActionCommandHandler {
    actions: Arc<dyn ActionRepository>,
    jeunes: Arc<dyn JeuneRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
}

impl QualifierActionCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            actions: ctx.actions.clone(),
            jeunes: ctx.jeunes.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
        }
    }
}

#[async_trait]
impl CommandHandler for QualifierActionCommandHandler {
    type Command = QualifierActionCommand;
    type Output = ();
    const NOM: &'static str = "QualifierActionCommandHandler";

    /// Only the conseiller of the jeune owning the action
    async fn authorize(&self, command: &QualifierActionCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        let id_conseiller = utilisateur.id_conseiller().ok_or(DomainError::DroitsInsuffisants)?;
        let action = self
            .actions
            .get(command.id_action)
            .await?
            .ok_or(DomainError::DroitsInsuffisants)?;
        let jeune = self.jeunes.get(action.id_jeune).await?;
        if jeune.is_some_and(|j| j.est_suivi_par(id_conseiller)) {
            Ok(())
        } else {
            Err(DomainError::DroitsInsuffisants)
        }
    }

    async fn handle(&self, command: &QualifierActionCommand) -> DomainResult<()> {
        let mut action = charger_action(self.actions.as_ref(), command.id_action).await?;
        action.qualifier(
            command.code_qualification,
            command.heures,
            command.commentaire.clone(),
            command.date_debut,
            command.date_fin_reelle,
            self.clock.now(),
        )?;
        self.actions.save(&action).await?;
        Ok(())
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &QualifierActionCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::ActionQualifiee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

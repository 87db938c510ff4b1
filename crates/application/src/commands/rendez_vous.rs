//! Rendez-vous commands

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

use core_kernel::{
    Clock, ConseillerId, DomainError, DomainResult, JeuneId, RendezVousId, Utilisateur,
};
use domain_beneficiaire::{ConseillerRepository, Jeune, JeuneRepository};
use domain_notification::{
    CodeEvenement, EvenementRepository, NotificationMessage, NotificationService,
    PlanificateurService,
};
use domain_rendez_vous::{
    CodeTypeRendezVous, HistoriqueRendezVous, HistoriqueRendezVousRepository,
    InfosRendezVousACreer, InfosRendezVousAMettreAJour, OperationRendezVous, RendezVous,
    RendezVousRepository,
};

use crate::authorizers::{
    ConseillerAuthorizer, ConseillerInterAgenceAuthorizer, RendezVousAuthorizer,
};
use crate::context::Contexte;
use crate::handler::{enregistrer_evenement, CommandHandler};

async fn charger_les_jeunes(
    jeunes: &dyn JeuneRepository,
    ids_jeunes: &[JeuneId],
) -> DomainResult<Vec<Jeune>> {
    let trouves = jeunes.find_all(ids_jeunes).await?;
    if trouves.len() != ids_jeunes.len() {
        let manquant = ids_jeunes
            .iter()
            .find(|id| !trouves.iter().any(|j| j.id == **id))
            .map(|id| id.to_string())
            .unwrap_or_default();
        return Err(DomainError::non_trouve("Jeune", manquant));
    }
    Ok(trouves)
}

async fn charger_le_rendez_vous(
    rendez_vous: &dyn RendezVousRepository,
    id: RendezVousId,
) -> DomainResult<RendezVous> {
    rendez_vous
        .get(id)
        .await?
        .ok_or_else(|| DomainError::non_trouve("Rendez-Vous", id))
}

/// Writes the audit row; a failure is logged and does not fail the command
async fn historiser(
    historique: &dyn HistoriqueRendezVousRepository,
    entree: HistoriqueRendezVous,
) {
    if let Err(e) = historique.save(&entree).await {
        warn!(id_rendez_vous = %entree.id_rendez_vous, error = %e, "Echec de l'historisation du rendez-vous");
    }
}

#[derive(Debug, Clone)]
pub struct CreerRendezVousCommand {
    pub id_conseiller: ConseillerId,
    pub ids_jeunes: Vec<JeuneId>,
    pub titre: Option<String>,
    pub commentaire: Option<String>,
    pub modalite: Option<String>,
    pub date: DateTime<Utc>,
    pub duree: u32,
    pub type_rendez_vous: Option<CodeTypeRendezVous>,
    pub precision: Option<String>,
    pub adresse: Option<String>,
    pub organisme: Option<String>,
    pub presence_conseiller: Option<bool>,
    pub invitation: Option<bool>,
}

pub struct CreerRendezVousCommandHandler {
    rendez_vous: Arc<dyn RendezVousRepository>,
    historique: Arc<dyn HistoriqueRendezVousRepository>,
    jeunes: Arc<dyn JeuneRepository>,
    conseillers: Arc<dyn ConseillerRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    notifications: NotificationService,
    planificateur: PlanificateurService,
    conseiller_authorizer: ConseillerAuthorizer,
}

impl CreerRendezVousCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            rendez_vous: ctx.rendez_vous.clone(),
            historique: ctx.historique_rendez_vous.clone(),
            jeunes: ctx.jeunes.clone(),
            conseillers: ctx.conseillers.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            notifications: ctx.notification_service(),
            planificateur: ctx.planificateur_service(),
            conseiller_authorizer: ctx.conseiller_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for CreerRendezVousCommandHandler {
    type Command = CreerRendezVousCommand;
    type Output = RendezVousId;
    const NOM: &'static str = "CreerRendezVousCommandHandler";

    async fn authorize(&self, command: &CreerRendezVousCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        self.conseiller_authorizer
            .autoriser_le_conseiller(command.id_conseiller, utilisateur)
    }

    async fn handle(&self, command: &CreerRendezVousCommand) -> DomainResult<RendezVousId> {
        let now = self.clock.now();
        let jeunes = charger_les_jeunes(self.jeunes.as_ref(), &command.ids_jeunes).await?;
        let conseiller = self
            .conseillers
            .get(command.id_conseiller)
            .await?
            .ok_or_else(|| DomainError::non_trouve("Conseiller", command.id_conseiller))?;

        let rendez_vous = RendezVous::creer(
            InfosRendezVousACreer {
                titre: command.titre.clone(),
                commentaire: command.commentaire.clone(),
                modalite: command.modalite.clone(),
                date: command.date,
                duree: command.duree,
                type_rendez_vous: command.type_rendez_vous,
                precision: command.precision.clone(),
                adresse: command.adresse.clone(),
                organisme: command.organisme.clone(),
                presence_conseiller: command.presence_conseiller,
                invitation: command.invitation,
            },
            &jeunes,
            &conseiller,
        )?;
        self.rendez_vous.save(&rendez_vous).await?;

        historiser(
            self.historique.as_ref(),
            HistoriqueRendezVous::creer(
                rendez_vous.id,
                OperationRendezVous::Creation,
                (&conseiller).into(),
                now,
            ),
        )
        .await;

        self.notifications
            .notifier_les_jeunes(
                &rendez_vous.jeunes,
                &NotificationMessage::nouveau_rendez_vous(rendez_vous.id.as_uuid()),
                now,
            )
            .await;
        if let Err(e) = self
            .planificateur
            .planifier_rappels_rendez_vous(&rendez_vous, now)
            .await
        {
            warn!(id_rendez_vous = %rendez_vous.id, error = %e, "Echec de la planification des rappels");
        }

        Ok(rendez_vous.id)
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &CreerRendezVousCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::RendezVousCree,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateRendezVousCommand {
    pub id_rendez_vous: RendezVousId,
    pub ids_jeunes: Vec<JeuneId>,
    pub titre: Option<String>,
    pub commentaire: Option<String>,
    pub modalite: Option<String>,
    pub date: DateTime<Utc>,
    pub duree: u32,
    pub adresse: Option<String>,
    pub organisme: Option<String>,
    pub presence_conseiller: bool,
    pub auteur: Utilisateur,
}

pub struct UpdateRendezVousCommandHandler {
    rendez_vous: Arc<dyn RendezVousRepository>,
    historique: Arc<dyn HistoriqueRendezVousRepository>,
    jeunes: Arc<dyn JeuneRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    notifications: NotificationService,
    planificateur: PlanificateurService,
    rendez_vous_authorizer: RendezVousAuthorizer,
}

impl UpdateRendezVousCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            rendez_vous: ctx.rendez_vous.clone(),
            historique: ctx.historique_rendez_vous.clone(),
            jeunes: ctx.jeunes.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            notifications: ctx.notification_service(),
            planificateur: ctx.planificateur_service(),
            rendez_vous_authorizer: ctx.rendez_vous_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for UpdateRendezVousCommandHandler {
    type Command = UpdateRendezVousCommand;
    type Output = ();
    const NOM: &'static str = "UpdateRendezVousCommandHandler";

    async fn authorize(&self, command: &UpdateRendezVousCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        self.rendez_vous_authorizer
            .autoriser_conseiller_pour_un_rendez_vous(command.id_rendez_vous, utilisateur)
            .await
    }

    async fn handle(&self, command: &UpdateRendezVousCommand) -> DomainResult<()> {
        let now = self.clock.now();
        let mut rendez_vous =
            charger_le_rendez_vous(self.rendez_vous.as_ref(), command.id_rendez_vous).await?;
        let jeunes = charger_les_jeunes(self.jeunes.as_ref(), &command.ids_jeunes).await?;
        let ancienne_date = rendez_vous.date;

        let modifications = rendez_vous.mettre_a_jour(InfosRendezVousAMettreAJour {
            titre: command.titre.clone(),
            commentaire: command.commentaire.clone(),
            modalite: command.modalite.clone(),
            date: command.date,
            duree: command.duree,
            adresse: command.adresse.clone(),
            organisme: command.organisme.clone(),
            presence_conseiller: command.presence_conseiller,
            jeunes,
        })?;
        self.rendez_vous.save(&rendez_vous).await?;

        historiser(
            self.historique.as_ref(),
            HistoriqueRendezVous::creer(
                rendez_vous.id,
                OperationRendezVous::Modification,
                (&command.auteur).into(),
                now,
            ),
        )
        .await;

        if modifications.date_modifiee {
            let replanification = async {
                self.planificateur
                    .supprimer_rappels_par_id(rendez_vous.id.into_uuid())
                    .await?;
                self.planificateur
                    .planifier_rappels_rendez_vous(&rendez_vous, now)
                    .await
            }
            .await;
            if let Err(e) = replanification {
                warn!(id_rendez_vous = %rendez_vous.id, error = %e, "Echec de la replanification des rappels");
            }
        }

        let id = rendez_vous.id.as_uuid();
        self.notifications
            .notifier_les_jeunes(
                &modifications.jeunes_retires,
                &NotificationMessage::rendez_vous_supprime(ancienne_date),
                now,
            )
            .await;
        self.notifications
            .notifier_les_jeunes(
                &modifications.jeunes_ajoutes,
                &NotificationMessage::nouveau_rendez_vous(id),
                now,
            )
            .await;
        if modifications.infos_modifiees {
            self.notifications
                .notifier_les_jeunes(
                    &modifications.jeunes_conserves,
                    &NotificationMessage::rendez_vous_modifie(id),
                    now,
                )
                .await;
        }
        Ok(())
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &UpdateRendezVousCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::RendezVousModifie,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone)]
pub struct DeleteRendezVousCommand {
    pub id_rendez_vous: RendezVousId,
    pub auteur: Utilisateur,
}

pub struct DeleteRendezVousCommandHandler {
    rendez_vous: Arc<dyn RendezVousRepository>,
    historique: Arc<dyn HistoriqueRendezVousRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    notifications: NotificationService,
    planificateur: PlanificateurService,
    rendez_vous_authorizer: RendezVousAuthorizer,
}

impl DeleteRendezVousCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            rendez_vous: ctx.rendez_vous.clone(),
            historique: ctx.historique_rendez_vous.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            notifications: ctx.notification_service(),
            planificateur: ctx.planificateur_service(),
            rendez_vous_authorizer: ctx.rendez_vous_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for DeleteRendezVousCommandHandler {
    type Command = DeleteRendezVousCommand;
    type Output = ();
    const NOM: &'static str = "DeleteRendezVousCommandHandler";

    async fn authorize(&self, command: &DeleteRendezVousCommand, utilisateur: &Utilisateur) -> DomainResult<()> {
        self.rendez_vous_authorizer
            .autoriser_conseiller_pour_un_rendez_vous(command.id_rendez_vous, utilisateur)
            .await
    }

    async fn handle(&self, command: &DeleteRendezVousCommand) -> DomainResult<()> {
        let now = self.clock.now();
        let rendez_vous =
            charger_le_rendez_vous(self.rendez_vous.as_ref(), command.id_rendez_vous).await?;

        self.rendez_vous.delete(rendez_vous.id).await?;
        historiser(
            self.historique.as_ref(),
            HistoriqueRendezVous::creer(
                rendez_vous.id,
                OperationRendezVous::Suppression,
                (&command.auteur).into(),
                now,
            ),
        )
        .await;

        self.notifications
            .notifier_les_jeunes(
                &rendez_vous.jeunes,
                &NotificationMessage::rendez_vous_supprime(rendez_vous.date),
                now,
            )
            .await;
        if let Err(e) = self
            .planificateur
            .supprimer_rappels_par_id(rendez_vous.id.into_uuid())
            .await
        {
            warn!(id_rendez_vous = %rendez_vous.id, error = %e, "Echec de la suppression des rappels");
        }
        Ok(())
    }

    async fn monitor(&self, utilisateur: &Utilisateur, _command: &DeleteRendezVousCommand) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::RendezVousSupprime,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

#[derive(Debug, Clone)]
pub struct CloturerAnimationCollectiveCommand {
    pub id_rendez_vous: RendezVousId,
    pub ids_jeunes_presents: Vec<JeuneId>,
}

pub struct CloturerAnimationCollectiveCommandHandler {
    rendez_vous: Arc<dyn RendezVousRepository>,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    inter_agence_authorizer: ConseillerInterAgenceAuthorizer,
}

impl CloturerAnimationCollectiveCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            rendez_vous: ctx.rendez_vous.clone(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            inter_agence_authorizer: ctx.inter_agence_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for CloturerAnimationCollectiveCommandHandler {
    type Command = CloturerAnimationCollectiveCommand;
    type Output = ();
    const NOM: &'static str = "CloturerAnimationCollectiveCommandHandler";

    /// Reserved to the conseillers of the agence owning the session
    async fn authorize(
        &self,
        command: &CloturerAnimationCollectiveCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        let id_agence = self
            .rendez_vous
            .get(command.id_rendez_vous)
            .await?
            .and_then(|rdv| rdv.id_agence)
            .ok_or(DomainError::DroitsInsuffisants)?;
        self.inter_agence_authorizer
            .autoriser_conseiller_pour_une_agence(id_agence, utilisateur)
            .await
    }

    async fn handle(&self, command: &CloturerAnimationCollectiveCommand) -> DomainResult<()> {
        let mut rendez_vous =
            charger_le_rendez_vous(self.rendez_vous.as_ref(), command.id_rendez_vous).await?;
        rendez_vous.cloturer(&command.ids_jeunes_presents, self.clock.now())?;
        self.rendez_vous.save(&rendez_vous).await?;
        Ok(())
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &CloturerAnimationCollectiveCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::AnimationCollectiveCloturee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

//! Support command enqueuing a broadcast to every connected jeune of some structures

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use core_kernel::{Clock, DomainResult, PortError, Structure, Utilisateur};
use domain_notification::{
    CodeEvenement, ContenuNotifierBeneficiaires, EvenementRepository, Job, JobType,
    PlanificateurService, TypeNotification,
};

use crate::authorizers::SupportAuthorizer;
use crate::context::Contexte;
use crate::handler::{enregistrer_evenement, valider, CommandHandler};

#[derive(Debug, Clone, Validate)]
pub struct CreerJobNotifierBeneficiairesCommand {
    pub type_notification: TypeNotification,
    #[validate(length(min = 1, message = "le titre est obligatoire"))]
    pub titre: String,
    #[validate(length(min = 1, message = "la description est obligatoire"))]
    pub description: String,
    #[validate(length(min = 1, message = "au moins une structure est requise"))]
    pub structures: Vec<Structure>,
    pub push: bool,
    #[validate(range(min = 1))]
    pub batch_size: Option<u64>,
    #[validate(range(min = 0))]
    pub minutes_entre_les_batchs: Option<i64>,
}

pub struct CreerJobNotifierBeneficiairesCommandHandler {
    planificateur: PlanificateurService,
    evenements: Arc<dyn EvenementRepository>,
    clock: Arc<dyn Clock>,
    support_authorizer: SupportAuthorizer,
}

impl CreerJobNotifierBeneficiairesCommandHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            planificateur: ctx.planificateur_service(),
            evenements: ctx.evenements.clone(),
            clock: ctx.clock.clone(),
            support_authorizer: ctx.support_authorizer(),
        }
    }
}

#[async_trait]
impl CommandHandler for CreerJobNotifierBeneficiairesCommandHandler {
    type Command = CreerJobNotifierBeneficiairesCommand;
    /// Id of the enqueued job
    type Output = String;
    const NOM: &'static str = "CreerJobNotifierBeneficiairesCommandHandler";

    async fn authorize(
        &self,
        _command: &CreerJobNotifierBeneficiairesCommand,
        utilisateur: &Utilisateur,
    ) -> DomainResult<()> {
        self.support_authorizer.autoriser_support(utilisateur)
    }

    async fn handle(&self, command: &CreerJobNotifierBeneficiairesCommand) -> DomainResult<String> {
        valider(command)?;
        let contenu = ContenuNotifierBeneficiaires {
            type_notification: command.type_notification,
            titre: command.titre.clone(),
            description: command.description.clone(),
            structures: command.structures.clone(),
            push: command.push,
            batch_size: command.batch_size,
            minutes_entre_les_batchs: command.minutes_entre_les_batchs,
            offset: None,
            nb_beneficiaires_notifies: None,
        };
        let contenu = serde_json::to_value(&contenu)
            .map_err(|e| PortError::transformation(e.to_string()))?;

        let job = Job::new(JobType::NotifierBeneficiaires, self.clock.now(), contenu);
        self.planificateur.planifier_job(&job).await?;
        Ok(job.id)
    }

    async fn monitor(
        &self,
        utilisateur: &Utilisateur,
        _command: &CreerJobNotifierBeneficiairesCommand,
    ) -> DomainResult<()> {
        enregistrer_evenement(
            self.evenements.as_ref(),
            CodeEvenement::NotificationBeneficiairesPlanifiee,
            utilisateur,
            self.clock.now(),
        )
        .await
    }
}

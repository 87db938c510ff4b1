//! Polls due jobs and routes them to their handler

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use core_kernel::{Clock, PortError};
use domain_notification::{
    Job, JobType, PlanificateurRepository, SuiviJob, SuiviJobRepository,
    RETENTION_SUIVI_JOBS_JOURS,
};

use super::{
    JobHandler, NettoyerLesSuivisDeJobHandler, NotifierBeneficiairesJobHandler,
    NotifierRappelActionJobHandler, NotifierRappelRendezVousJobHandler,
};
use crate::context::Contexte;

/// Tunables of the job handlers
#[derive(Debug, Clone)]
pub struct ConfigurationJobs {
    pub pause_entre_notifications: Duration,
    pub retention_suivi_jobs_jours: i64,
}

impl Default for ConfigurationJobs {
    fn default() -> Self {
        Self {
            pause_entre_notifications: Duration::from_millis(500),
            retention_suivi_jobs_jours: RETENTION_SUIVI_JOBS_JOURS,
        }
    }
}

pub struct JobDispatcher {
    planificateur: Arc<dyn PlanificateurRepository>,
    suivis: Arc<dyn SuiviJobRepository>,
    clock: Arc<dyn Clock>,
    handlers: HashMap<JobType, Arc<dyn JobHandler>>,
}

impl JobDispatcher {
    /// Dispatcher with no handler registered
    pub fn vide(ctx: &Contexte) -> Self {
        Self {
            planificateur: ctx.planificateur.clone(),
            suivis: ctx.suivi_jobs.clone(),
            clock: ctx.clock.clone(),
            handlers: HashMap::new(),
        }
    }

    /// Dispatcher with every job type of the platform
    pub fn new(ctx: &Contexte, configuration: &ConfigurationJobs) -> Self {
        Self::vide(ctx)
            .avec_handler(NotifierBeneficiairesJobHandler::new(
                ctx,
                configuration.pause_entre_notifications,
            ))
            .avec_handler(NotifierRappelRendezVousJobHandler::new(ctx))
            .avec_handler(NotifierRappelActionJobHandler::new(ctx))
            .avec_handler(NettoyerLesSuivisDeJobHandler::new(
                ctx,
                configuration.retention_suivi_jobs_jours,
            ))
    }

    pub fn avec_handler(mut self, handler: impl JobHandler + 'static) -> Self {
        self.handlers.insert(handler.job_type(), Arc::new(handler));
        self
    }

    pub async fn executer(&self, job: &Job) -> SuiviJob {
        match self.handlers.get(&job.job_type) {
            Some(handler) => handler.handle(job).await,
            None => {
                error!(job_id = %job.id, job_type = %job.job_type, "Aucun handler pour ce type de job");
                let now = self.clock.now();
                SuiviJob::echec(
                    job.job_type,
                    now,
                    now,
                    format!("Aucun handler pour le job de type {}", job.job_type),
                )
            }
        }
    }

    /// Removes at most `limite` due jobs from the planificateur
    pub async fn reserver_jobs_echus(&self, limite: u64) -> Result<Vec<Job>, PortError> {
        self.planificateur
            .reserver_jobs_echus(self.clock.now(), limite)
            .await
    }

    /// Runs one claimed job and records its SuiviJob
    pub async fn executer_et_suivre(&self, job: &Job) -> SuiviJob {
        let suivi = self.executer(job).await;
        info!(
            job_id = %job.id,
            job_type = %job.job_type,
            succes = suivi.succes,
            nb_erreurs = suivi.nb_erreurs,
            temps_execution_ms = suivi.temps_execution_ms,
            retard_ms = (self.clock.now() - job.date_execution).num_milliseconds(),
            "Job exécuté"
        );
        if let Err(e) = self.suivis.save(&suivi).await {
            warn!(job_id = %job.id, error = %e, "Echec de l'enregistrement du suivi de job");
        }
        suivi
    }

    /// Claims at most `limite` due jobs and runs them one after another
    pub async fn executer_jobs_echus(&self, limite: u64) -> Result<Vec<SuiviJob>, PortError> {
        let jobs = self.reserver_jobs_echus(limite).await?;

        let mut suivis = Vec::with_capacity(jobs.len());
        for job in &jobs {
            suivis.push(self.executer_et_suivre(job).await);
        }
        Ok(suivis)
    }
}

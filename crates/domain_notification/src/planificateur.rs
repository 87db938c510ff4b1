//! Persistent job scheduler
//!
//! Jobs are rows with an execution date, a closed type and a JSON payload.
//! Reminder jobs use deterministic ids (`rdv:{id}:{jours}`, `action:{id}:3`)
//! so that re-planning overwrites them and deleting an action or a
//! rendez-vous can remove every job mentioning its id.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use core_kernel::{PortError, Structure};
use domain_action::{Action, JOURS_AVANT_RAPPEL};
use domain_rendez_vous::RendezVous;

use crate::messages::TypeNotification;
use crate::ports::PlanificateurRepository;

/// Minutes between two batches of a broadcast when the payload omits it
pub const MINUTES_ENTRE_LES_BATCHS_PAR_DEFAUT: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    NotifierBeneficiaires,
    NotifierRappelRendezVous,
    NotifierRappelAction,
    NettoyerLesSuivisDeJob,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::NotifierBeneficiaires,
        JobType::NotifierRappelRendezVous,
        JobType::NotifierRappelAction,
        JobType::NettoyerLesSuivisDeJob,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::NotifierBeneficiaires => "NOTIFIER_BENEFICIAIRES",
            JobType::NotifierRappelRendezVous => "NOTIFIER_RAPPEL_RENDEZ_VOUS",
            JobType::NotifierRappelAction => "NOTIFIER_RAPPEL_ACTION",
            JobType::NettoyerLesSuivisDeJob => "NETTOYER_LES_SUIVIS_DE_JOB",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PortError::transformation(format!("Type de job '{}' inconnu", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub date_execution: DateTime<Utc>,
    pub job_type: JobType,
    pub contenu: Value,
}

impl Job {
    pub fn new(job_type: JobType, date_execution: DateTime<Utc>, contenu: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date_execution,
            job_type,
            contenu,
        }
    }

    /// Deserializes the payload into the shape expected by the job type
    pub fn contenu<T: serde::de::DeserializeOwned>(&self) -> Result<T, PortError> {
        serde_json::from_value(self.contenu.clone())
            .map_err(|e| PortError::transformation(format!("Contenu du job {} invalide: {}", self.id, e)))
    }
}

/// Payload of a broadcast job, carried from one batch to the next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContenuNotifierBeneficiaires {
    pub type_notification: TypeNotification,
    pub titre: String,
    pub description: String,
    pub structures: Vec<Structure>,
    pub push: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_entre_les_batchs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_beneficiaires_notifies: Option<u64>,
}

impl ContenuNotifierBeneficiaires {
    pub fn minutes_entre_les_batchs(&self) -> i64 {
        self.minutes_entre_les_batchs
            .unwrap_or(MINUTES_ENTRE_LES_BATCHS_PAR_DEFAUT)
    }
}

pub fn id_job_rappel_rendez_vous(rendez_vous: &RendezVous, jours: i64) -> String {
    format!("rdv:{}:{}", rendez_vous.id.as_uuid(), jours)
}

pub fn id_job_rappel_action(action: &Action) -> String {
    format!("action:{}:{}", action.id.as_uuid(), JOURS_AVANT_RAPPEL)
}

/// Schedules reminder and broadcast jobs
#[derive(Clone)]
pub struct PlanificateurService {
    repository: Arc<dyn PlanificateurRepository>,
}

impl PlanificateurService {
    pub fn new(repository: Arc<dyn PlanificateurRepository>) -> Self {
        Self { repository }
    }

    /// One reminder a week before and one the day before, when still ahead
    pub async fn planifier_rappels_rendez_vous(
        &self,
        rendez_vous: &RendezVous,
        now: DateTime<Utc>,
    ) -> Result<(), PortError> {
        for jours in [7, 1] {
            if rendez_vous.date - now > Duration::days(jours) {
                let job = Job {
                    id: id_job_rappel_rendez_vous(rendez_vous, jours),
                    date_execution: rendez_vous.date - Duration::days(jours),
                    job_type: JobType::NotifierRappelRendezVous,
                    contenu: json!({ "idRendezVous": rendez_vous.id.as_uuid() }),
                };
                debug!(job_id = %job.id, "Planification d'un rappel de rendez-vous");
                self.repository.ajouter(&job).await?;
            }
        }
        Ok(())
    }

    pub async fn planifier_rappel_action(
        &self,
        action: &Action,
        now: DateTime<Utc>,
    ) -> Result<(), PortError> {
        if !action.doit_planifier_une_notification_de_rappel(now) {
            return Ok(());
        }
        let job = Job {
            id: id_job_rappel_action(action),
            date_execution: action.date_du_rappel(),
            job_type: JobType::NotifierRappelAction,
            contenu: json!({ "idAction": action.id.as_uuid() }),
        };
        debug!(job_id = %job.id, "Planification d'un rappel d'action");
        self.repository.ajouter(&job).await
    }

    /// Removes every job whose id mentions `id`
    pub async fn supprimer_rappels_par_id(&self, id: Uuid) -> Result<u64, PortError> {
        let supprimes = self.repository.supprimer_contenant(&id.to_string()).await?;
        if supprimes > 0 {
            info!(%id, supprimes, "Rappels supprimés");
        }
        Ok(supprimes)
    }

    pub async fn planifier_job(&self, job: &Job) -> Result<(), PortError> {
        info!(job_id = %job.id, job_type = %job.job_type, date = %job.date_execution, "Job planifié");
        self.repository.ajouter(job).await
    }
}

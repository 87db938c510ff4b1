use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::temporal::{a_l_heure, jour_local};
use core_kernel::{Clock, PortError};
use domain_notification::{Job, JobType, PlanificateurService, SuiviJob, SuiviJobRepository};

use super::JobHandler;
use crate::context::Contexte;

pub const ID_JOB_NETTOYAGE: &str = "nettoyer-les-suivis-de-job";
const HEURE_DU_NETTOYAGE: u32 = 4;

/// Next 04:00 (Paris) strictly after `now`
fn prochaine_date_de_nettoyage(now: DateTime<Utc>) -> DateTime<Utc> {
    let aujourd_hui = a_l_heure(jour_local(now), HEURE_DU_NETTOYAGE, 0);
    if aujourd_hui > now {
        aujourd_hui
    } else {
        a_l_heure(jour_local(now) + Duration::days(1), HEURE_DU_NETTOYAGE, 0)
    }
}

/// Upserts the daily cleanup job; its fixed id keeps a single occurrence
pub async fn planifier_prochain_nettoyage(
    planificateur: &PlanificateurService,
    now: DateTime<Utc>,
) -> Result<(), PortError> {
    let job = Job {
        id: ID_JOB_NETTOYAGE.to_string(),
        date_execution: prochaine_date_de_nettoyage(now),
        job_type: JobType::NettoyerLesSuivisDeJob,
        contenu: json!({}),
    };
    planificateur.planifier_job(&job).await
}

pub struct NettoyerLesSuivisDeJobHandler {
    suivis: Arc<dyn SuiviJobRepository>,
    planificateur: PlanificateurService,
    clock: Arc<dyn Clock>,
    retention: Duration,
}

impl NettoyerLesSuivisDeJobHandler {
    pub fn new(ctx: &Contexte, retention_en_jours: i64) -> Self {
        Self {
            suivis: ctx.suivi_jobs.clone(),
            planificateur: ctx.planificateur_service(),
            clock: ctx.clock.clone(),
            retention: Duration::days(retention_en_jours),
        }
    }
}

#[async_trait]
impl JobHandler for NettoyerLesSuivisDeJobHandler {
    fn job_type(&self) -> JobType {
        JobType::NettoyerLesSuivisDeJob
    }

    async fn handle(&self, _job: &Job) -> SuiviJob {
        let debut = self.clock.now();
        let suivi = match self.suivis.supprimer_anterieurs_a(debut - self.retention).await {
            Ok(nb_suivis_supprimes) => {
                info!(nb_suivis_supprimes, "Suivis de job purgés");
                SuiviJob::new(
                    self.job_type(),
                    debut,
                    self.clock.now(),
                    true,
                    json!({ "nb_suivis_supprimes": nb_suivis_supprimes }),
                    0,
                )
            }
            Err(e) => SuiviJob::echec(self.job_type(), debut, self.clock.now(), e),
        };

        if let Err(e) = planifier_prochain_nettoyage(&self.planificateur, debut).await {
            warn!(error = %e, "Echec de la planification du prochain nettoyage");
        }
        suivi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_prochaine_date_de_nettoyage() {
        let jour = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let avant = a_l_heure(jour, 3, 0);
        let apres = a_l_heure(jour, 4, 0);

        assert_eq!(prochaine_date_de_nettoyage(avant), a_l_heure(jour, 4, 0));
        assert_eq!(
            prochaine_date_de_nettoyage(apres),
            a_l_heure(jour + Duration::days(1), 4, 0)
        );
    }
}

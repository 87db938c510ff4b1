//! Broadcast of a free-form notification to every connected jeune of some
//! structures, one batch per run
//!
//! A run notifies one page of jeunes, then re-enqueues itself with the next
//! offset, a few minutes later and inside business hours. The run that gets
//! a partial page is the last one.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::temporal::prochaine_fenetre_ouvree;
use core_kernel::{Clock, PortError};
use domain_beneficiaire::JeuneRepository;
use domain_notification::{
    ContenuNotifierBeneficiaires, Job, JobType, NotificationMessage, NotificationService,
    PlanificateurService, SuiviJob,
};

use super::JobHandler;
use crate::context::Contexte;

/// Share of the audience notified per batch when the payload sets no size
const POURCENTAGE_DE_L_AUDIENCE_PAR_BATCH: u64 = 20;

/// `max(1, trunc(0.2 × total))`
pub fn taille_de_batch_par_defaut(total: u64) -> u64 {
    (total.saturating_mul(POURCENTAGE_DE_L_AUDIENCE_PAR_BATCH) / 100).max(1)
}

struct RapportDeBatch {
    total: u64,
    nb_beneficiaires_notifies: u64,
    est_la_derniere_execution: bool,
    nb_erreurs: u64,
}

pub struct NotifierBeneficiairesJobHandler {
    jeunes: Arc<dyn JeuneRepository>,
    notifications: NotificationService,
    planificateur: PlanificateurService,
    clock: Arc<dyn Clock>,
    pause_entre_notifications: std::time::Duration,
}

impl NotifierBeneficiairesJobHandler {
    pub fn new(ctx: &Contexte, pause_entre_notifications: std::time::Duration) -> Self {
        Self {
            jeunes: ctx.jeunes.clone(),
            notifications: ctx.notification_service(),
            planificateur: ctx.planificateur_service(),
            clock: ctx.clock.clone(),
            pause_entre_notifications,
        }
    }

    async fn notifier_un_batch(
        &self,
        contenu: &ContenuNotifierBeneficiaires,
    ) -> Result<RapportDeBatch, PortError> {
        let total = self.jeunes.count_avec_token(&contenu.structures).await?;
        let pagination = contenu
            .batch_size
            .unwrap_or_else(|| taille_de_batch_par_defaut(total))
            .max(1);
        let offset = contenu.offset.unwrap_or(0);

        let ids = self
            .jeunes
            .find_ids_avec_token(&contenu.structures, offset, pagination)
            .await?;

        let message = NotificationMessage::personnalise(
            contenu.type_notification,
            contenu.titre.clone(),
            contenu.description.clone(),
        );
        let mut nb_erreurs = 0;
        for (index, id_jeune) in ids.iter().enumerate() {
            if index > 0 && !self.pause_entre_notifications.is_zero() {
                tokio::time::sleep(self.pause_entre_notifications).await;
            }
            let envoyee = self
                .notifications
                .notifier(*id_jeune, message.clone(), contenu.push, self.clock.now())
                .await;
            if !envoyee {
                nb_erreurs += 1;
            }
        }

        let taille = ids.len() as u64;
        let nb_beneficiaires_notifies = contenu.nb_beneficiaires_notifies.unwrap_or(0) + taille;
        let est_la_derniere_execution = taille < pagination;

        if !est_la_derniere_execution {
            // the page size is frozen for the whole broadcast
            let suite = ContenuNotifierBeneficiaires {
                batch_size: Some(pagination),
                minutes_entre_les_batchs: Some(contenu.minutes_entre_les_batchs()),
                offset: Some(offset.saturating_add(pagination)),
                nb_beneficiaires_notifies: Some(nb_beneficiaires_notifies),
                ..contenu.clone()
            };
            self.planifier_la_suite(suite, self.clock.now()).await?;
        }

        Ok(RapportDeBatch {
            total,
            nb_beneficiaires_notifies,
            est_la_derniere_execution,
            nb_erreurs,
        })
    }

    async fn planifier_la_suite(
        &self,
        contenu: ContenuNotifierBeneficiaires,
        now: DateTime<Utc>,
    ) -> Result<(), PortError> {
        let date_execution = prochaine_fenetre_ouvree(
            now + Duration::minutes(contenu.minutes_entre_les_batchs()),
        );
        let contenu =
            serde_json::to_value(&contenu).map_err(|e| PortError::transformation(e.to_string()))?;
        let job = Job::new(JobType::NotifierBeneficiaires, date_execution, contenu);
        self.planificateur.planifier_job(&job).await
    }
}

#[async_trait]
impl JobHandler for NotifierBeneficiairesJobHandler {
    fn job_type(&self) -> JobType {
        JobType::NotifierBeneficiaires
    }

    async fn handle(&self, job: &Job) -> SuiviJob {
        let debut = self.clock.now();
        let contenu: ContenuNotifierBeneficiaires = match job.contenu() {
            Ok(contenu) => contenu,
            Err(e) => return SuiviJob::echec(self.job_type(), debut, self.clock.now(), e),
        };

        match self.notifier_un_batch(&contenu).await {
            Ok(rapport) => {
                info!(
                    job_id = %job.id,
                    total = rapport.total,
                    nb_beneficiaires_notifies = rapport.nb_beneficiaires_notifies,
                    est_la_derniere_execution = rapport.est_la_derniere_execution,
                    "Batch de notifications envoyé"
                );
                SuiviJob::new(
                    self.job_type(),
                    debut,
                    self.clock.now(),
                    true,
                    json!({
                        "nb_beneficiaires_notifies": rapport.nb_beneficiaires_notifies,
                        "est_la_derniere_execution": rapport.est_la_derniere_execution,
                        "total": rapport.total,
                    }),
                    rapport.nb_erreurs,
                )
            }
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "Echec du batch de notifications");
                SuiviJob::echec(self.job_type(), debut, self.clock.now(), e)
            }
        }
    }
}

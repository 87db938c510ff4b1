use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use core_kernel::{Clock, DomainError, RendezVousId};
use domain_notification::{Job, JobType, NotificationService, SuiviJob};
use domain_rendez_vous::RendezVousRepository;

use super::JobHandler;
use crate::context::Contexte;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContenuRappelRendezVous {
    id_rendez_vous: Uuid,
}

pub struct NotifierRappelRendezVousJobHandler {
    rendez_vous: Arc<dyn RendezVousRepository>,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
}

impl NotifierRappelRendezVousJobHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            rendez_vous: ctx.rendez_vous.clone(),
            notifications: ctx.notification_service(),
            clock: ctx.clock.clone(),
        }
    }
}

#[async_trait]
impl JobHandler for NotifierRappelRendezVousJobHandler {
    fn job_type(&self) -> JobType {
        JobType::NotifierRappelRendezVous
    }

    async fn handle(&self, job: &Job) -> SuiviJob {
        let debut = self.clock.now();
        let contenu: ContenuRappelRendezVous = match job.contenu() {
            Ok(contenu) => contenu,
            Err(e) => return SuiviJob::echec(self.job_type(), debut, self.clock.now(), e),
        };
        let id = RendezVousId::from_uuid(contenu.id_rendez_vous);

        let rendez_vous = match self.rendez_vous.get(id).await {
            Ok(Some(rendez_vous)) => rendez_vous,
            Ok(None) => {
                return SuiviJob::echec(
                    self.job_type(),
                    debut,
                    self.clock.now(),
                    DomainError::non_trouve("Rendez-Vous", id),
                )
            }
            Err(e) => return SuiviJob::echec(self.job_type(), debut, self.clock.now(), e),
        };

        let nb_notifications_envoyees = self
            .notifications
            .notifier_rappel_rendez_vous(&rendez_vous, debut)
            .await;
        SuiviJob::new(
            self.job_type(),
            debut,
            self.clock.now(),
            true,
            json!({
                "id_rendez_vous": contenu.id_rendez_vous,
                "nb_notifications_envoyees": nb_notifications_envoyees,
            }),
            0,
        )
    }
}

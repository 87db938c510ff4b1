use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use core_kernel::{ActionId, Clock, DomainError};
use domain_action::ActionRepository;
use domain_beneficiaire::JeuneRepository;
use domain_notification::{Job, JobType, NotificationService, SuiviJob};

use super::JobHandler;
use crate::context::Contexte;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContenuRappelAction {
    id_action: Uuid,
}

pub struct NotifierRappelActionJobHandler {
    actions: Arc<dyn ActionRepository>,
    jeunes: Arc<dyn JeuneRepository>,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
}

impl NotifierRappelActionJobHandler {
    pub fn new(ctx: &Contexte) -> Self {
        Self {
            actions: ctx.actions.clone(),
            jeunes: ctx.jeunes.clone(),
            notifications: ctx.notification_service(),
            clock: ctx.clock.clone(),
        }
    }
}

#[async_trait]
impl JobHandler for NotifierRappelActionJobHandler {
    fn job_type(&self) -> JobType {
        JobType::NotifierRappelAction
    }

    async fn handle(&self, job: &Job) -> SuiviJob {
        let debut = self.clock.now();
        let echec = |erreur: &dyn std::fmt::Display| {
            SuiviJob::echec(self.job_type(), debut, self.clock.now(), erreur)
        };

        let contenu: ContenuRappelAction = match job.contenu() {
            Ok(contenu) => contenu,
            Err(e) => return echec(&e),
        };
        let id = ActionId::from_uuid(contenu.id_action);

        let action = match self.actions.get(id).await {
            Ok(Some(action)) => action,
            Ok(None) => return echec(&DomainError::non_trouve("Action", id)),
            Err(e) => return echec(&e),
        };

        // A reminder that no longer applies is not a failure
        if let Err(e) = action.doit_envoyer_une_notification_de_rappel(debut) {
            let raison = match &e {
                DomainError::PasDeRappel { raison, .. } => raison.clone(),
                autre => autre.to_string(),
            };
            debug!(id_action = %id, %raison, "Rappel d'action non envoyé");
            return SuiviJob::new(
                self.job_type(),
                debut,
                self.clock.now(),
                true,
                json!({ "id_action": contenu.id_action, "notification_envoyee": false, "raison": raison }),
                0,
            );
        }

        let jeune = match self.jeunes.get(action.id_jeune).await {
            Ok(Some(jeune)) => jeune,
            Ok(None) => return echec(&DomainError::non_trouve("Jeune", action.id_jeune)),
            Err(e) => return echec(&e),
        };

        let notification_envoyee = self
            .notifications
            .notifier_rappel_action(&jeune, &action, debut)
            .await;
        SuiviJob::new(
            self.job_type(),
            debut,
            self.clock.now(),
            true,
            json!({ "id_action": contenu.id_action, "notification_envoyee": notification_envoyee }),
            0,
        )
    }
}

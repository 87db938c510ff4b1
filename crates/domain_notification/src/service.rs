//! Notification service
//!
//! Decides whether a jeune can and wants to receive a notification, then
//! hands it to the [`NotificationPort`]. Delivery failures are logged and
//! reported to the caller as `false`; a command never fails because a push
//! could not be sent.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use core_kernel::JeuneId;
use domain_action::Action;
use domain_beneficiaire::{Jeune, Preferences};
use domain_rendez_vous::{JeuneDuRendezVous, RendezVous};

use crate::messages::NotificationMessage;
use crate::ports::{Notification, NotificationPort};

/// Preference a jeune must have enabled to receive a given notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceRequise {
    Aucune,
    Messages,
    CreationActionConseiller,
    RendezVousSessions,
}

impl PreferenceRequise {
    fn est_active(&self, preferences: &Preferences) -> bool {
        match self {
            PreferenceRequise::Aucune => true,
            PreferenceRequise::Messages => preferences.messages,
            PreferenceRequise::CreationActionConseiller => preferences.creation_action_conseiller,
            PreferenceRequise::RendezVousSessions => preferences.rendez_vous_sessions,
        }
    }
}

/// Recipient view shared by jeunes and rendez-vous participants
#[derive(Debug, Clone)]
pub struct Destinataire {
    pub id: JeuneId,
    pub push_notification_token: Option<String>,
    pub preferences: Preferences,
}

impl From<&Jeune> for Destinataire {
    fn from(jeune: &Jeune) -> Self {
        Self {
            id: jeune.id,
            push_notification_token: jeune.push_notification_token().map(str::to_string),
            preferences: jeune.preferences,
        }
    }
}

impl From<&JeuneDuRendezVous> for Destinataire {
    fn from(jeune: &JeuneDuRendezVous) -> Self {
        Self {
            id: jeune.id,
            push_notification_token: jeune.push_notification_token().map(str::to_string),
            preferences: jeune.preferences,
        }
    }
}

#[derive(Clone)]
pub struct NotificationService {
    port: Arc<dyn NotificationPort>,
}

impl NotificationService {
    pub fn new(port: Arc<dyn NotificationPort>) -> Self {
        Self { port }
    }

    /// Sends `message` when the jeune has a token and the preference enabled;
    /// returns whether it was sent
    pub async fn envoyer(
        &self,
        destinataire: &Destinataire,
        message: NotificationMessage,
        preference: PreferenceRequise,
        now: DateTime<Utc>,
    ) -> bool {
        if destinataire.push_notification_token.is_none() {
            info!(
                id_jeune = %destinataire.id,
                "Le jeune ne s'est jamais connecté sur l'application, notification non envoyée"
            );
            return false;
        }
        if !preference.est_active(&destinataire.preferences) {
            debug!(id_jeune = %destinataire.id, ?preference, "Notification désactivée par le jeune");
            return false;
        }

        self.notifier(destinataire.id, message, true, now).await
    }

    /// Sends without token or preference checks
    pub async fn notifier(
        &self,
        id_jeune: JeuneId,
        message: NotificationMessage,
        push: bool,
        now: DateTime<Utc>,
    ) -> bool {
        let type_notification = message.type_notification;
        let notification = Notification {
            id_jeune,
            message,
            push,
            date: now,
        };
        match self.port.envoyer(&notification).await {
            Ok(()) => {
                debug!(%id_jeune, %type_notification, "Notification envoyée");
                true
            }
            Err(e) => {
                warn!(%id_jeune, %type_notification, error = %e, "Echec de l'envoi de la notification");
                false
            }
        }
    }

    pub async fn notifier_nouvelle_action(
        &self,
        jeune: &Jeune,
        action: &Action,
        now: DateTime<Utc>,
    ) -> bool {
        self.envoyer(
            &jeune.into(),
            NotificationMessage::nouvelle_action(action.id.as_uuid()),
            PreferenceRequise::CreationActionConseiller,
            now,
        )
        .await
    }

    pub async fn notifier_commentaire_action(
        &self,
        jeune: &Jeune,
        action: &Action,
        now: DateTime<Utc>,
    ) -> bool {
        self.envoyer(
            &jeune.into(),
            NotificationMessage::commentaire_action(action.id.as_uuid()),
            PreferenceRequise::CreationActionConseiller,
            now,
        )
        .await
    }

    pub async fn notifier_rappel_action(
        &self,
        jeune: &Jeune,
        action: &Action,
        now: DateTime<Utc>,
    ) -> bool {
        self.envoyer(
            &jeune.into(),
            NotificationMessage::rappel_action(action.id.as_uuid()),
            PreferenceRequise::CreationActionConseiller,
            now,
        )
        .await
    }

    /// Sends `message` to each of `jeunes`; returns how many were reached
    pub async fn notifier_les_jeunes(
        &self,
        jeunes: &[JeuneDuRendezVous],
        message: &NotificationMessage,
        now: DateTime<Utc>,
    ) -> u64 {
        let mut envoyees = 0;
        for jeune in jeunes {
            if self
                .envoyer(
                    &jeune.into(),
                    message.clone(),
                    PreferenceRequise::RendezVousSessions,
                    now,
                )
                .await
            {
                envoyees += 1;
            }
        }
        envoyees
    }

    /// New chat message to each jeune having the messages preference enabled
    pub async fn notifier_nouveau_message(&self, jeunes: &[Jeune], now: DateTime<Utc>) -> u64 {
        let mut envoyees = 0;
        for jeune in jeunes {
            if self
                .envoyer(
                    &jeune.into(),
                    NotificationMessage::nouveau_message(),
                    PreferenceRequise::Messages,
                    now,
                )
                .await
            {
                envoyees += 1;
            }
        }
        envoyees
    }

    /// Reminder to every participant, when a reminder applies at `now`
    pub async fn notifier_rappel_rendez_vous(
        &self,
        rendez_vous: &RendezVous,
        now: DateTime<Utc>,
    ) -> u64 {
        match NotificationMessage::rappel_rendez_vous(rendez_vous.id.as_uuid(), rendez_vous.date, now)
        {
            Some(message) => self.notifier_les_jeunes(&rendez_vous.jeunes, &message, now).await,
            None => {
                debug!(id_rendez_vous = %rendez_vous.id, "Pas de rappel à envoyer pour ce rendez-vous");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockNotificationPort;
    use crate::messages::TypeNotification;

    fn un_destinataire(token: Option<&str>) -> Destinataire {
        Destinataire {
            id: JeuneId::new(),
            push_notification_token: token.map(str::to_string),
            preferences: Preferences::default(),
        }
    }

    #[tokio::test]
    async fn test_sans_token_pas_d_envoi() {
        let port = Arc::new(MockNotificationPort::new());
        let service = NotificationService::new(port.clone());

        let envoye = service
            .envoyer(
                &un_destinataire(None),
                NotificationMessage::nouveau_message(),
                PreferenceRequise::Aucune,
                Utc::now(),
            )
            .await;

        assert!(!envoye);
        assert!(port.envoyees().await.is_empty());
    }

    #[tokio::test]
    async fn test_preference_desactivee() {
        let port = Arc::new(MockNotificationPort::new());
        let service = NotificationService::new(port.clone());
        let mut destinataire = un_destinataire(Some("token"));
        destinataire.preferences.rendez_vous_sessions = false;

        let envoye = service
            .envoyer(
                &destinataire,
                NotificationMessage::rendez_vous_modifie("rdv"),
                PreferenceRequise::RendezVousSessions,
                Utc::now(),
            )
            .await;
        assert!(!envoye);
    }

    #[tokio::test]
    async fn test_envoi_et_echec() {
        let port = Arc::new(MockNotificationPort::new());
        let service = NotificationService::new(port.clone());
        let ok = un_destinataire(Some("token"));
        let ko = un_destinataire(Some("token"));
        port.faire_echouer_pour(ko.id).await;

        let message = NotificationMessage::nouveau_message();
        assert!(service.envoyer(&ok, message.clone(), PreferenceRequise::Messages, Utc::now()).await);
        assert!(!service.envoyer(&ko, message, PreferenceRequise::Messages, Utc::now()).await);

        let envoyees = port.envoyees().await;
        assert_eq!(envoyees.len(), 1);
        assert_eq!(envoyees[0].id_jeune, ok.id);
        assert_eq!(envoyees[0].message.type_notification, TypeNotification::NouveauMessage);
        assert!(envoyees[0].push);
    }
}

//! PostgreSQL Notification and Evenement Adapters
//!
//! Notifications are written to the `notification` table with an empty
//! `envoyee_le`; the push gateway relays rows to Firebase and stamps them.
//! The same table doubles as the jeune's notification history.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_notification::{Evenement, EvenementRepository, Notification, NotificationPort};

use crate::colonnes::vers_code;
use crate::error::erreur_sql;
use crate::pool::sonder;

/// PostgreSQL-backed implementation of `NotificationPort`
#[derive(Debug, Clone)]
pub struct PostgresNotificationAdapter {
    pool: PgPool,
}

impl PostgresNotificationAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresNotificationAdapter {}

#[async_trait]
impl HealthCheckable for PostgresNotificationAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-notification-adapter").await
    }
}

#[async_trait]
impl NotificationPort for PostgresNotificationAdapter {
    #[instrument(
        skip(self, notification),
        fields(
            id_jeune = %notification.id_jeune,
            type_notification = %notification.message.type_notification
        )
    )]
    async fn envoyer(&self, notification: &Notification) -> Result<(), PortError> {
        let message = &notification.message;

        sqlx::query(
            r#"
            INSERT INTO notification (
                id, id_jeune, type, titre, description, id_objet, push, date_notif
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(notification.id_jeune.into_uuid())
        .bind(vers_code(&message.type_notification)?)
        .bind(&message.titre)
        .bind(&message.description)
        .bind(&message.id_objet)
        .bind(notification.push)
        .bind(notification.date)
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        debug!(push = notification.push, "Notification queued");
        Ok(())
    }
}

/// PostgreSQL-backed implementation of `EvenementRepository`
#[derive(Debug, Clone)]
pub struct PostgresEvenementAdapter {
    pool: PgPool,
}

impl PostgresEvenementAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresEvenementAdapter {}

#[async_trait]
impl HealthCheckable for PostgresEvenementAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-evenement-adapter").await
    }
}

#[async_trait]
impl EvenementRepository for PostgresEvenementAdapter {
    #[instrument(skip(self, evenement), fields(code = evenement.code.as_str()))]
    async fn save(&self, evenement: &Evenement) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO evenement_engagement (
                code, id_utilisateur, type_utilisateur, structure, date_evenement
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(evenement.code.as_str())
        .bind(evenement.emetteur.id)
        .bind(vers_code(&evenement.emetteur.type_utilisateur)?)
        .bind(vers_code(&evenement.emetteur.structure)?)
        .bind(evenement.date)
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(())
    }
}

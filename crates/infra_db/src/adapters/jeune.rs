//! PostgreSQL Jeune Adapter
//!
//! A jeune row is always read joined with its current conseiller so the
//! aggregate comes back fully hydrated. The same projection is reused by the
//! rendez-vous adapter to load participants.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    AgenceId, ConseillerId, DomainPort, HealthCheckResult, HealthCheckable, JeuneId, PortError,
    Structure,
};
use domain_beneficiaire::{
    ConfigurationApplication, ConseillerDuJeune, Jeune, JeuneRepository, Preferences,
    TransfertConseiller,
};

use crate::colonnes::{depuis_code, vers_code, vers_codes};
use crate::error::erreur_sql;
use crate::pool::sonder;

/// Select list of a jeune joined with its conseiller (`j` and `c` aliases)
pub(crate) const COLONNES_JEUNE: &str = r#"
    j.id, j.prenom, j.nom, j.email, j.structure, j.date_creation, j.is_activated,
    j.id_conseiller_initial, j.id_partenaire, j.push_notification_token,
    j.date_derniere_actualisation_token, j.app_version,
    j.partage_favoris, j.alertes_offres, j.messages, j.creation_action_conseiller,
    j.rendez_vous_sessions,
    c.id AS conseiller_id, c.prenom AS conseiller_prenom, c.nom AS conseiller_nom,
    c.email AS conseiller_email, c.id_agence AS conseiller_id_agence
"#;

pub(crate) const JOINTURE_CONSEILLER: &str = "LEFT JOIN conseiller c ON c.id = j.id_conseiller";

#[derive(Debug, Clone, FromRow)]
pub(crate) struct JeuneRow {
    pub id: Uuid,
    pub prenom: String,
    pub nom: String,
    pub email: Option<String>,
    pub structure: String,
    pub date_creation: DateTime<Utc>,
    pub is_activated: bool,
    pub id_conseiller_initial: Option<Uuid>,
    pub id_partenaire: Option<String>,
    pub push_notification_token: Option<String>,
    pub date_derniere_actualisation_token: Option<DateTime<Utc>>,
    pub app_version: Option<String>,
    pub partage_favoris: bool,
    pub alertes_offres: bool,
    pub messages: bool,
    pub creation_action_conseiller: bool,
    pub rendez_vous_sessions: bool,
    pub conseiller_id: Option<Uuid>,
    pub conseiller_prenom: Option<String>,
    pub conseiller_nom: Option<String>,
    pub conseiller_email: Option<String>,
    pub conseiller_id_agence: Option<Uuid>,
}

impl JeuneRow {
    fn conseiller(&self) -> Option<ConseillerDuJeune> {
        let id = self.conseiller_id?;
        Some(ConseillerDuJeune {
            id: ConseillerId::from_uuid(id),
            prenom: self.conseiller_prenom.clone().unwrap_or_default(),
            nom: self.conseiller_nom.clone().unwrap_or_default(),
            email: self.conseiller_email.clone(),
            id_agence: self.conseiller_id_agence.map(AgenceId::from_uuid),
        })
    }
}

impl TryFrom<JeuneRow> for Jeune {
    type Error = PortError;

    fn try_from(row: JeuneRow) -> Result<Self, Self::Error> {
        let conseiller = row.conseiller();
        let structure: Structure = depuis_code("jeune.structure", &row.structure)?;

        Ok(Jeune {
            id: JeuneId::from_uuid(row.id),
            prenom: row.prenom,
            nom: row.nom,
            email: row.email,
            structure,
            date_creation: row.date_creation,
            is_activated: row.is_activated,
            conseiller,
            id_conseiller_initial: row.id_conseiller_initial.map(ConseillerId::from_uuid),
            id_partenaire: row.id_partenaire,
            configuration: ConfigurationApplication {
                push_notification_token: row.push_notification_token,
                date_derniere_actualisation_token: row.date_derniere_actualisation_token,
                app_version: row.app_version,
            },
            preferences: Preferences {
                partage_favoris: row.partage_favoris,
                alertes_offres: row.alertes_offres,
                messages: row.messages,
                creation_action_conseiller: row.creation_action_conseiller,
                rendez_vous_sessions: row.rendez_vous_sessions,
            },
        })
    }
}

/// PostgreSQL-backed implementation of `JeuneRepository`
#[derive(Debug, Clone)]
pub struct PostgresJeuneAdapter {
    pool: PgPool,
}

impl PostgresJeuneAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch(&self, condition: &str, id: Uuid) -> Result<Vec<Jeune>, PortError> {
        let sql = format!(
            "SELECT {} FROM jeune j {} WHERE {} ORDER BY j.nom, j.prenom",
            COLONNES_JEUNE, JOINTURE_CONSEILLER, condition
        );
        let rows = sqlx::query_as::<_, JeuneRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(erreur_sql)?;

        rows.into_iter().map(Jeune::try_from).collect()
    }
}

impl DomainPort for PostgresJeuneAdapter {}

#[async_trait]
impl HealthCheckable for PostgresJeuneAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-jeune-adapter").await
    }
}

#[async_trait]
impl JeuneRepository for PostgresJeuneAdapter {
    #[instrument(skip(self), fields(id_jeune = %id))]
    async fn get(&self, id: JeuneId) -> Result<Option<Jeune>, PortError> {
        debug!("Fetching jeune");
        Ok(self.fetch("j.id = $1", id.into_uuid()).await?.into_iter().next())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_all(&self, ids: &[JeuneId]) -> Result<Vec<Jeune>, PortError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let sql = format!(
            "SELECT {} FROM jeune j {} WHERE j.id = ANY($1)",
            COLONNES_JEUNE, JOINTURE_CONSEILLER
        );
        let rows = sqlx::query_as::<_, JeuneRow>(&sql)
            .bind(&uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(erreur_sql)?;

        debug!(found = rows.len(), "Fetched jeunes");
        rows.into_iter().map(Jeune::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_all_by_conseiller(
        &self,
        id_conseiller: ConseillerId,
    ) -> Result<Vec<Jeune>, PortError> {
        self.fetch("j.id_conseiller = $1", id_conseiller.into_uuid()).await
    }

    #[instrument(skip(self, email))]
    async fn exists_by_email(&self, email: &str) -> Result<bool, PortError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM jeune WHERE lower(email) = lower(trim($1)))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(erreur_sql)
    }

    #[instrument(skip(self))]
    async fn exists_by_id_partenaire(
        &self,
        id_partenaire: &str,
        structure: Structure,
    ) -> Result<bool, PortError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM jeune WHERE id_partenaire = $1 AND structure = $2)",
        )
        .bind(id_partenaire)
        .bind(vers_code(&structure)?)
        .fetch_one(&self.pool)
        .await
        .map_err(erreur_sql)
    }

    #[instrument(skip(self, jeune), fields(id_jeune = %jeune.id))]
    async fn save(&self, jeune: &Jeune) -> Result<(), PortError> {
        debug!("Saving jeune");

        sqlx::query(
            r#"
            INSERT INTO jeune (
                id, prenom, nom, email, structure, date_creation, is_activated,
                id_conseiller, id_conseiller_initial, id_partenaire,
                push_notification_token, date_derniere_actualisation_token, app_version,
                partage_favoris, alertes_offres, messages, creation_action_conseiller,
                rendez_vous_sessions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (id) DO UPDATE SET
                prenom = EXCLUDED.prenom,
                nom = EXCLUDED.nom,
                email = EXCLUDED.email,
                structure = EXCLUDED.structure,
                is_activated = EXCLUDED.is_activated,
                id_conseiller = EXCLUDED.id_conseiller,
                id_conseiller_initial = EXCLUDED.id_conseiller_initial,
                id_partenaire = EXCLUDED.id_partenaire,
                push_notification_token = EXCLUDED.push_notification_token,
                date_derniere_actualisation_token = EXCLUDED.date_derniere_actualisation_token,
                app_version = EXCLUDED.app_version,
                partage_favoris = EXCLUDED.partage_favoris,
                alertes_offres = EXCLUDED.alertes_offres,
                messages = EXCLUDED.messages,
                creation_action_conseiller = EXCLUDED.creation_action_conseiller,
                rendez_vous_sessions = EXCLUDED.rendez_vous_sessions
            "#,
        )
        .bind(jeune.id.into_uuid())
        .bind(&jeune.prenom)
        .bind(&jeune.nom)
        .bind(&jeune.email)
        .bind(vers_code(&jeune.structure)?)
        .bind(jeune.date_creation)
        .bind(jeune.is_activated)
        .bind(jeune.id_conseiller().map(ConseillerId::into_uuid))
        .bind(jeune.id_conseiller_initial.map(ConseillerId::into_uuid))
        .bind(&jeune.id_partenaire)
        .bind(&jeune.configuration.push_notification_token)
        .bind(jeune.configuration.date_derniere_actualisation_token)
        .bind(&jeune.configuration.app_version)
        .bind(jeune.preferences.partage_favoris)
        .bind(jeune.preferences.alertes_offres)
        .bind(jeune.preferences.messages)
        .bind(jeune.preferences.creation_action_conseiller)
        .bind(jeune.preferences.rendez_vous_sessions)
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(())
    }

    #[instrument(skip(self, jeunes, transferts), fields(count = jeunes.len()))]
    async fn transferer(
        &self,
        jeunes: &[Jeune],
        transferts: &[TransfertConseiller],
    ) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(erreur_sql)?;

        for jeune in jeunes {
            sqlx::query(
                "UPDATE jeune SET id_conseiller = $2, id_conseiller_initial = $3 WHERE id = $1",
            )
            .bind(jeune.id.into_uuid())
            .bind(jeune.id_conseiller().map(ConseillerId::into_uuid))
            .bind(jeune.id_conseiller_initial.map(ConseillerId::into_uuid))
            .execute(&mut *tx)
            .await
            .map_err(erreur_sql)?;
        }

        for transfert in transferts {
            sqlx::query(
                r#"
                INSERT INTO transfert_conseiller (
                    id, id_jeune, id_conseiller_source, id_conseiller_cible,
                    id_conseiller_qui_transfert, type_transfert, date_transfert
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(transfert.id_jeune.into_uuid())
            .bind(transfert.id_conseiller_source.into_uuid())
            .bind(transfert.id_conseiller_cible.into_uuid())
            .bind(transfert.id_conseiller_qui_transfert.map(ConseillerId::into_uuid))
            .bind(vers_code(&transfert.type_transfert)?)
            .bind(transfert.date_transfert)
            .execute(&mut *tx)
            .await
            .map_err(erreur_sql)?;
        }

        tx.commit().await.map_err(erreur_sql)?;
        debug!("Jeunes transferred");
        Ok(())
    }

    #[instrument(skip(self), fields(id_jeune = %id))]
    async fn supprimer(&self, id: JeuneId) -> Result<(), PortError> {
        let result = sqlx::query("DELETE FROM jeune WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(erreur_sql)?;

        if result.rows_affected() == 0 {
            return Err(PortError::not_found("Jeune", id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_avec_token(&self, structures: &[Structure]) -> Result<u64, PortError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM jeune
            WHERE structure = ANY($1)
              AND push_notification_token IS NOT NULL
              AND push_notification_token <> ''
            "#,
        )
        .bind(vers_codes(structures)?)
        .fetch_one(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(total.max(0) as u64)
    }

    #[instrument(skip(self))]
    async fn find_ids_avec_token(
        &self,
        structures: &[Structure],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<JeuneId>, PortError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM jeune
            WHERE structure = ANY($1)
              AND push_notification_token IS NOT NULL
              AND push_notification_token <> ''
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(vers_codes(structures)?)
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(ids.into_iter().map(JeuneId::from_uuid).collect())
    }
}

//! PostgreSQL Rendez-Vous Adapters
//!
//! A rendez-vous is stored in `rendez_vous` with its jeunes in
//! `rendez_vous_jeune_association`; saving rewrites both in one
//! transaction. Participants are read back with the jeune projection so
//! handlers get their conseiller, token and preferences.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    AgenceId, ConseillerId, DomainPort, HealthCheckResult, HealthCheckable, JeuneId, PortError,
    RendezVousId,
};
use domain_beneficiaire::Jeune;
use domain_rendez_vous::{
    AuteurHistorique, CreateurRendezVous, HistoriqueRendezVous, HistoriqueRendezVousRepository,
    JeuneDuRendezVous, RendezVous, RendezVousRepository,
};

use crate::adapters::jeune::{JeuneRow, COLONNES_JEUNE, JOINTURE_CONSEILLER};
use crate::colonnes::{depuis_code, vers_code};
use crate::error::erreur_sql;
use crate::pool::sonder;

const COLONNES_RENDEZ_VOUS: &str = r#"
    r.id, r.titre, r.sous_titre, r.commentaire, r.modalite, r.date, r.duree, r.type,
    r.precision, r.adresse, r.organisme, r.presence_conseiller, r.invitation, r.createur,
    r.id_agence, r.date_cloture, r.source
"#;

#[derive(Debug, FromRow)]
struct RendezVousRow {
    id: Uuid,
    titre: String,
    sous_titre: String,
    commentaire: Option<String>,
    modalite: Option<String>,
    date: DateTime<Utc>,
    duree: i32,
    #[sqlx(rename = "type")]
    type_rendez_vous: String,
    precision: Option<String>,
    adresse: Option<String>,
    organisme: Option<String>,
    presence_conseiller: bool,
    invitation: bool,
    createur: Json<CreateurRendezVous>,
    id_agence: Option<Uuid>,
    date_cloture: Option<DateTime<Utc>>,
    source: String,
}

impl RendezVousRow {
    fn vers_domaine(self, jeunes: Vec<JeuneDuRendezVous>) -> Result<RendezVous, PortError> {
        Ok(RendezVous {
            id: RendezVousId::from_uuid(self.id),
            titre: self.titre,
            sous_titre: self.sous_titre,
            commentaire: self.commentaire,
            modalite: self.modalite,
            date: self.date,
            duree: u32::try_from(self.duree).map_err(|_| {
                PortError::transformation(format!("Durée négative pour le rendez-vous {}", self.id))
            })?,
            type_rendez_vous: depuis_code("rendez_vous.type", &self.type_rendez_vous)?,
            precision: self.precision,
            adresse: self.adresse,
            organisme: self.organisme,
            presence_conseiller: self.presence_conseiller,
            invitation: self.invitation,
            jeunes,
            createur: self.createur.0,
            id_agence: self.id_agence.map(AgenceId::from_uuid),
            date_cloture: self.date_cloture,
            source: depuis_code("rendez_vous.source", &self.source)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct ParticipantRow {
    id_rendez_vous: Uuid,
    present: Option<bool>,
    #[sqlx(flatten)]
    jeune: JeuneRow,
}

/// PostgreSQL-backed implementation of `RendezVousRepository`
#[derive(Debug, Clone)]
pub struct PostgresRendezVousAdapter {
    pool: PgPool,
}

impl PostgresRendezVousAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads rendez-vous matching `condition` (alias `r`, id bound to `$1`)
    /// with their participants, ordered by date
    async fn fetch(
        &self,
        condition: &str,
        id: Uuid,
        presence_conseiller: Option<bool>,
    ) -> Result<Vec<RendezVous>, PortError> {
        let sql = format!(
            r#"
            SELECT {} FROM rendez_vous r
            WHERE {} AND ($2::boolean IS NULL OR r.presence_conseiller = $2)
            ORDER BY r.date
            "#,
            COLONNES_RENDEZ_VOUS, condition
        );
        let rows = sqlx::query_as::<_, RendezVousRow>(&sql)
            .bind(id)
            .bind(presence_conseiller)
            .fetch_all(&self.pool)
            .await
            .map_err(erreur_sql)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut participants = self.participants(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let jeunes = participants.remove(&row.id).unwrap_or_default();
                row.vers_domaine(jeunes)
            })
            .collect()
    }

    async fn participants(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<JeuneDuRendezVous>>, PortError> {
        let sql = format!(
            r#"
            SELECT a.id_rendez_vous, a.present, {}
            FROM rendez_vous_jeune_association a
            JOIN jeune j ON j.id = a.id_jeune
            {}
            WHERE a.id_rendez_vous = ANY($1)
            ORDER BY j.nom, j.prenom
            "#,
            COLONNES_JEUNE, JOINTURE_CONSEILLER
        );
        let rows = sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(erreur_sql)?;

        let mut par_rendez_vous: HashMap<Uuid, Vec<JeuneDuRendezVous>> = HashMap::new();
        for row in rows {
            let jeune = Jeune::try_from(row.jeune)?;
            let mut participant = JeuneDuRendezVous::from(&jeune);
            participant.present = row.present;
            par_rendez_vous
                .entry(row.id_rendez_vous)
                .or_default()
                .push(participant);
        }
        Ok(par_rendez_vous)
    }
}

impl DomainPort for PostgresRendezVousAdapter {}

#[async_trait]
impl HealthCheckable for PostgresRendezVousAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-rendez-vous-adapter").await
    }
}

#[async_trait]
impl RendezVousRepository for PostgresRendezVousAdapter {
    #[instrument(skip(self))]
    async fn get(&self, id: RendezVousId) -> Result<Option<RendezVous>, PortError> {
        debug!("Fetching rendez-vous");
        Ok(self
            .fetch("r.id = $1", id.into_uuid(), None)
            .await?
            .into_iter()
            .next())
    }

    #[instrument(skip(self, rendez_vous), fields(id_rendez_vous = %rendez_vous.id, jeunes = rendez_vous.jeunes.len()))]
    async fn save(&self, rendez_vous: &RendezVous) -> Result<(), PortError> {
        let duree = i32::try_from(rendez_vous.duree)
            .map_err(|_| PortError::validation("Durée du rendez-vous trop grande"))?;

        let mut tx = self.pool.begin().await.map_err(erreur_sql)?;

        sqlx::query(
            r#"
            INSERT INTO rendez_vous (
                id, titre, sous_titre, commentaire, modalite, date, duree, type, precision,
                adresse, organisme, presence_conseiller, invitation, createur, id_agence,
                date_cloture, source
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (id) DO UPDATE SET
                titre = EXCLUDED.titre,
                sous_titre = EXCLUDED.sous_titre,
                commentaire = EXCLUDED.commentaire,
                modalite = EXCLUDED.modalite,
                date = EXCLUDED.date,
                duree = EXCLUDED.duree,
                type = EXCLUDED.type,
                precision = EXCLUDED.precision,
                adresse = EXCLUDED.adresse,
                organisme = EXCLUDED.organisme,
                presence_conseiller = EXCLUDED.presence_conseiller,
                invitation = EXCLUDED.invitation,
                id_agence = EXCLUDED.id_agence,
                date_cloture = EXCLUDED.date_cloture
            "#,
        )
        .bind(rendez_vous.id.into_uuid())
        .bind(&rendez_vous.titre)
        .bind(&rendez_vous.sous_titre)
        .bind(&rendez_vous.commentaire)
        .bind(&rendez_vous.modalite)
        .bind(rendez_vous.date)
        .bind(duree)
        .bind(vers_code(&rendez_vous.type_rendez_vous)?)
        .bind(&rendez_vous.precision)
        .bind(&rendez_vous.adresse)
        .bind(&rendez_vous.organisme)
        .bind(rendez_vous.presence_conseiller)
        .bind(rendez_vous.invitation)
        .bind(Json(&rendez_vous.createur))
        .bind(rendez_vous.id_agence.map(AgenceId::into_uuid))
        .bind(rendez_vous.date_cloture)
        .bind(vers_code(&rendez_vous.source)?)
        .execute(&mut *tx)
        .await
        .map_err(erreur_sql)?;

        sqlx::query("DELETE FROM rendez_vous_jeune_association WHERE id_rendez_vous = $1")
            .bind(rendez_vous.id.into_uuid())
            .execute(&mut *tx)
            .await
            .map_err(erreur_sql)?;

        for jeune in &rendez_vous.jeunes {
            sqlx::query(
                r#"
                INSERT INTO rendez_vous_jeune_association (id_rendez_vous, id_jeune, present)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(rendez_vous.id.into_uuid())
            .bind(jeune.id.into_uuid())
            .bind(jeune.present)
            .execute(&mut *tx)
            .await
            .map_err(erreur_sql)?;
        }

        tx.commit().await.map_err(erreur_sql)?;
        debug!("Rendez-vous saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RendezVousId) -> Result<(), PortError> {
        sqlx::query("DELETE FROM rendez_vous WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(erreur_sql)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_all_by_jeune(&self, id_jeune: JeuneId) -> Result<Vec<RendezVous>, PortError> {
        self.fetch(
            r#"r.id IN (
                SELECT id_rendez_vous FROM rendez_vous_jeune_association WHERE id_jeune = $1
            )"#,
            id_jeune.into_uuid(),
            None,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_all_by_conseiller(
        &self,
        id_conseiller: ConseillerId,
        presence_conseiller: Option<bool>,
    ) -> Result<Vec<RendezVous>, PortError> {
        self.fetch(
            r#"(
                (r.createur->>'id')::uuid = $1
                OR EXISTS (
                    SELECT 1 FROM rendez_vous_jeune_association a
                    JOIN jeune j ON j.id = a.id_jeune
                    WHERE a.id_rendez_vous = r.id AND j.id_conseiller = $1
                )
            )"#,
            id_conseiller.into_uuid(),
            presence_conseiller,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_animations_collectives_by_agence(
        &self,
        id_agence: AgenceId,
    ) -> Result<Vec<RendezVous>, PortError> {
        let rendez_vous = self
            .fetch("r.id_agence = $1", id_agence.into_uuid(), None)
            .await?;
        Ok(rendez_vous
            .into_iter()
            .filter(RendezVous::est_animation_collective)
            .collect())
    }
}

#[derive(Debug, FromRow)]
struct HistoriqueRow {
    id: Uuid,
    id_rendez_vous: Uuid,
    date: DateTime<Utc>,
    operation: String,
    auteur: Json<AuteurHistorique>,
    message: String,
}

impl TryFrom<HistoriqueRow> for HistoriqueRendezVous {
    type Error = PortError;

    fn try_from(row: HistoriqueRow) -> Result<Self, Self::Error> {
        Ok(HistoriqueRendezVous {
            id: row.id,
            id_rendez_vous: RendezVousId::from_uuid(row.id_rendez_vous),
            date: row.date,
            auteur: row.auteur.0,
            operation: depuis_code("historique_rendez_vous.operation", &row.operation)?,
            message: row.message,
        })
    }
}

/// PostgreSQL-backed implementation of `HistoriqueRendezVousRepository`
#[derive(Debug, Clone)]
pub struct PostgresHistoriqueRendezVousAdapter {
    pool: PgPool,
}

impl PostgresHistoriqueRendezVousAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresHistoriqueRendezVousAdapter {}

#[async_trait]
impl HealthCheckable for PostgresHistoriqueRendezVousAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-historique-rendez-vous-adapter").await
    }
}

#[async_trait]
impl HistoriqueRendezVousRepository for PostgresHistoriqueRendezVousAdapter {
    #[instrument(skip(self, historique), fields(id_rendez_vous = %historique.id_rendez_vous))]
    async fn save(&self, historique: &HistoriqueRendezVous) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO historique_rendez_vous (id, id_rendez_vous, date, operation, auteur, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(historique.id)
        .bind(historique.id_rendez_vous.into_uuid())
        .bind(historique.date)
        .bind(vers_code(&historique.operation)?)
        .bind(Json(&historique.auteur))
        .bind(&historique.message)
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_all_by_rendez_vous(
        &self,
        id_rendez_vous: RendezVousId,
    ) -> Result<Vec<HistoriqueRendezVous>, PortError> {
        let rows = sqlx::query_as::<_, HistoriqueRow>(
            r#"
            SELECT id, id_rendez_vous, date, operation, auteur, message
            FROM historique_rendez_vous
            WHERE id_rendez_vous = $1
            ORDER BY date
            "#,
        )
        .bind(id_rendez_vous.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(erreur_sql)?;

        rows.into_iter().map(HistoriqueRendezVous::try_from).collect()
    }
}

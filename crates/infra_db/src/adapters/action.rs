//! PostgreSQL Action and Commentaire Adapters
//!
//! `find_page` pushes filtering, sorting and pagination down to SQL. The
//! derived qualification state is recomputed with the same rule as
//! `Action::etat`: qualified when a qualification is stored, to qualify
//! when done, not qualifiable otherwise.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    ActionId, CommentaireId, DomainPort, HealthCheckResult, HealthCheckable, JeuneId, PortError,
};
use domain_action::{
    Action, ActionRepository, Commentaire, CommentaireRepository, Createur, FiltreActions,
    PageActions, Pagination, Qualification, TriActions,
};

use crate::colonnes::{depuis_code, vers_code, vers_codes};
use crate::error::erreur_sql;
use crate::pool::sonder;

const COLONNES_ACTION: &str = r#"
    id, id_jeune, contenu, description, statut, date_creation, date_derniere_actualisation,
    date_echeance, date_debut, date_fin_reelle, createur, rappel, qualification
"#;

/// Filter on `$2` statuts, `$3` etats and `$4` codes; an empty array keeps every row
const FILTRE_ACTIONS: &str = r#"
    (cardinality($2::text[]) = 0 OR statut = ANY($2))
    AND (cardinality($3::text[]) = 0 OR
        CASE
            WHEN qualification IS NOT NULL THEN 'QUALIFIEE'
            WHEN statut = 'done' THEN 'A_QUALIFIER'
            ELSE 'NON_QUALIFIABLE'
        END = ANY($3))
    AND (cardinality($4::text[]) = 0 OR qualification->>'code' = ANY($4))
"#;

fn ordre(tri: TriActions) -> &'static str {
    match tri {
        TriActions::DateCroissante => "date_creation ASC",
        TriActions::DateDecroissante => "date_creation DESC",
        TriActions::DateEcheanceCroissante => "date_echeance ASC, date_creation ASC",
        TriActions::DateEcheanceDecroissante => "date_echeance DESC, date_creation ASC",
        TriActions::Statut => "(statut = 'done') ASC, date_derniere_actualisation DESC",
    }
}

#[derive(Debug, FromRow)]
struct ActionRow {
    id: Uuid,
    id_jeune: Uuid,
    contenu: String,
    description: String,
    statut: String,
    date_creation: DateTime<Utc>,
    date_derniere_actualisation: DateTime<Utc>,
    date_echeance: DateTime<Utc>,
    date_debut: Option<DateTime<Utc>>,
    date_fin_reelle: Option<DateTime<Utc>>,
    createur: Json<Createur>,
    rappel: bool,
    qualification: Option<Json<Qualification>>,
}

impl TryFrom<ActionRow> for Action {
    type Error = PortError;

    fn try_from(row: ActionRow) -> Result<Self, Self::Error> {
        Ok(Action {
            id: ActionId::from_uuid(row.id),
            id_jeune: JeuneId::from_uuid(row.id_jeune),
            contenu: row.contenu,
            description: row.description,
            statut: depuis_code("action.statut", &row.statut)?,
            date_creation: row.date_creation,
            date_derniere_actualisation: row.date_derniere_actualisation,
            date_echeance: row.date_echeance,
            date_debut: row.date_debut,
            date_fin_reelle: row.date_fin_reelle,
            createur: row.createur.0,
            rappel: row.rappel,
            qualification: row.qualification.map(|q| q.0),
        })
    }
}

#[derive(Debug, FromRow)]
struct ComptesRow {
    nombre_total: i64,
    nombre_filtrees: i64,
}

/// PostgreSQL-backed implementation of `ActionRepository`
#[derive(Debug, Clone)]
pub struct PostgresActionAdapter {
    pool: PgPool,
}

impl PostgresActionAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresActionAdapter {}

#[async_trait]
impl HealthCheckable for PostgresActionAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-action-adapter").await
    }
}

#[async_trait]
impl ActionRepository for PostgresActionAdapter {
    #[instrument(skip(self))]
    async fn get(&self, id: ActionId) -> Result<Option<Action>, PortError> {
        let sql = format!("SELECT {} FROM action WHERE id = $1", COLONNES_ACTION);
        let row = sqlx::query_as::<_, ActionRow>(&sql)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(erreur_sql)?;

        row.map(Action::try_from).transpose()
    }

    #[instrument(skip(self, action), fields(id_action = %action.id, statut = %action.statut))]
    async fn save(&self, action: &Action) -> Result<(), PortError> {
        debug!("Saving action");

        sqlx::query(
            r#"
            INSERT INTO action (
                id, id_jeune, contenu, description, statut, date_creation,
                date_derniere_actualisation, date_echeance, date_debut, date_fin_reelle,
                createur, rappel, qualification
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                contenu = EXCLUDED.contenu,
                description = EXCLUDED.description,
                statut = EXCLUDED.statut,
                date_derniere_actualisation = EXCLUDED.date_derniere_actualisation,
                date_echeance = EXCLUDED.date_echeance,
                date_debut = EXCLUDED.date_debut,
                date_fin_reelle = EXCLUDED.date_fin_reelle,
                rappel = EXCLUDED.rappel,
                qualification = EXCLUDED.qualification
            "#,
        )
        .bind(action.id.into_uuid())
        .bind(action.id_jeune.into_uuid())
        .bind(&action.contenu)
        .bind(&action.description)
        .bind(vers_code(&action.statut)?)
        .bind(action.date_creation)
        .bind(action.date_derniere_actualisation)
        .bind(action.date_echeance)
        .bind(action.date_debut)
        .bind(action.date_fin_reelle)
        .bind(Json(&action.createur))
        .bind(action.rappel)
        .bind(action.qualification.as_ref().map(Json))
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ActionId) -> Result<(), PortError> {
        sqlx::query("DELETE FROM action WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(erreur_sql)?;
        Ok(())
    }

    #[instrument(skip(self, filtre))]
    async fn find_page(
        &self,
        id_jeune: JeuneId,
        filtre: &FiltreActions,
        tri: TriActions,
        pagination: Pagination,
    ) -> Result<PageActions, PortError> {
        let statuts = vers_codes(&filtre.statuts)?;
        let etats = vers_codes(&filtre.etats)?;
        let codes = vers_codes(&filtre.codes_categories)?;

        let comptes_sql = format!(
            r#"
            SELECT COUNT(*) AS nombre_total,
                   COUNT(*) FILTER (WHERE {}) AS nombre_filtrees
            FROM action
            WHERE id_jeune = $1
            "#,
            FILTRE_ACTIONS
        );
        let comptes = sqlx::query_as::<_, ComptesRow>(&comptes_sql)
            .bind(id_jeune.into_uuid())
            .bind(&statuts)
            .bind(&etats)
            .bind(&codes)
            .fetch_one(&self.pool)
            .await
            .map_err(erreur_sql)?;

        let page_sql = format!(
            "SELECT {} FROM action WHERE id_jeune = $1 AND {} ORDER BY {} LIMIT $5 OFFSET $6",
            COLONNES_ACTION,
            FILTRE_ACTIONS,
            ordre(tri)
        );
        let rows = sqlx::query_as::<_, ActionRow>(&page_sql)
            .bind(id_jeune.into_uuid())
            .bind(&statuts)
            .bind(&etats)
            .bind(&codes)
            .bind(pagination.limit().map(|limit| limit as i64))
            .bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(erreur_sql)?;

        debug!(
            nombre_total = comptes.nombre_total,
            nombre_filtrees = comptes.nombre_filtrees,
            "Fetched page of actions"
        );

        Ok(PageActions {
            actions: rows
                .into_iter()
                .map(Action::try_from)
                .collect::<Result<_, _>>()?,
            nombre_total: comptes.nombre_total.max(0) as u64,
            nombre_filtrees: comptes.nombre_filtrees.max(0) as u64,
        })
    }
}

#[derive(Debug, FromRow)]
struct CommentaireRow {
    id: Uuid,
    id_action: Uuid,
    date: DateTime<Utc>,
    createur: Json<Createur>,
    message: String,
}

impl From<CommentaireRow> for Commentaire {
    fn from(row: CommentaireRow) -> Self {
        Commentaire {
            id: CommentaireId::from_uuid(row.id),
            id_action: ActionId::from_uuid(row.id_action),
            date: row.date,
            createur: row.createur.0,
            message: row.message,
        }
    }
}

/// PostgreSQL-backed implementation of `CommentaireRepository`
#[derive(Debug, Clone)]
pub struct PostgresCommentaireAdapter {
    pool: PgPool,
}

impl PostgresCommentaireAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresCommentaireAdapter {}

#[async_trait]
impl HealthCheckable for PostgresCommentaireAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-commentaire-adapter").await
    }
}

#[async_trait]
impl CommentaireRepository for PostgresCommentaireAdapter {
    #[instrument(skip(self, commentaire), fields(id_action = %commentaire.id_action))]
    async fn save(&self, commentaire: &Commentaire) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO commentaire (id, id_action, date, createur, message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(commentaire.id.into_uuid())
        .bind(commentaire.id_action.into_uuid())
        .bind(commentaire.date)
        .bind(Json(&commentaire.createur))
        .bind(&commentaire.message)
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_all_by_action(&self, id_action: ActionId) -> Result<Vec<Commentaire>, PortError> {
        let rows = sqlx::query_as::<_, CommentaireRow>(
            r#"
            SELECT id, id_action, date, createur, message
            FROM commentaire
            WHERE id_action = $1
            ORDER BY date
            "#,
        )
        .bind(id_action.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(rows.into_iter().map(Commentaire::from).collect())
    }

    #[instrument(skip(self))]
    async fn exists_for_action(&self, id_action: ActionId) -> Result<bool, PortError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM commentaire WHERE id_action = $1)",
        )
        .bind(id_action.into_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(erreur_sql)
    }
}

//! PostgreSQL Suggestion Adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, JeuneId, PortError, SuggestionId,
};
use domain_beneficiaire::{InformationsSuggestion, Suggestion, SuggestionRepository};

use crate::colonnes::{depuis_code, vers_code};
use crate::error::erreur_sql;
use crate::pool::sonder;

const COLONNES_SUGGESTION: &str = r#"
    id, id_jeune, type, source, criteres, informations, date_creation,
    date_mise_a_jour, date_refus, date_creation_recherche
"#;

#[derive(Debug, FromRow)]
struct SuggestionRow {
    id: Uuid,
    id_jeune: Uuid,
    #[sqlx(rename = "type")]
    type_recherche: String,
    source: String,
    criteres: Value,
    informations: Json<InformationsSuggestion>,
    date_creation: DateTime<Utc>,
    date_mise_a_jour: DateTime<Utc>,
    date_refus: Option<DateTime<Utc>>,
    date_creation_recherche: Option<DateTime<Utc>>,
}

impl TryFrom<SuggestionRow> for Suggestion {
    type Error = PortError;

    fn try_from(row: SuggestionRow) -> Result<Self, Self::Error> {
        Ok(Suggestion {
            id: SuggestionId::from_uuid(row.id),
            id_jeune: JeuneId::from_uuid(row.id_jeune),
            type_recherche: depuis_code("suggestion.type", &row.type_recherche)?,
            source: depuis_code("suggestion.source", &row.source)?,
            criteres: row.criteres,
            informations: row.informations.0,
            date_creation: row.date_creation,
            date_mise_a_jour: row.date_mise_a_jour,
            date_refus: row.date_refus,
            date_creation_recherche: row.date_creation_recherche,
        })
    }
}

/// PostgreSQL-backed implementation of `SuggestionRepository`
#[derive(Debug, Clone)]
pub struct PostgresSuggestionAdapter {
    pool: PgPool,
}

impl PostgresSuggestionAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresSuggestionAdapter {}

#[async_trait]
impl HealthCheckable for PostgresSuggestionAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-suggestion-adapter").await
    }
}

#[async_trait]
impl SuggestionRepository for PostgresSuggestionAdapter {
    #[instrument(skip(self))]
    async fn get(&self, id: SuggestionId) -> Result<Option<Suggestion>, PortError> {
        let sql = format!("SELECT {} FROM suggestion WHERE id = $1", COLONNES_SUGGESTION);
        let row = sqlx::query_as::<_, SuggestionRow>(&sql)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(erreur_sql)?;

        row.map(Suggestion::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all_by_jeune(&self, id_jeune: JeuneId) -> Result<Vec<Suggestion>, PortError> {
        let sql = format!(
            "SELECT {} FROM suggestion WHERE id_jeune = $1 ORDER BY date_creation DESC",
            COLONNES_SUGGESTION
        );
        let rows = sqlx::query_as::<_, SuggestionRow>(&sql)
            .bind(id_jeune.into_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(erreur_sql)?;

        rows.into_iter().map(Suggestion::try_from).collect()
    }

    #[instrument(skip(self, suggestion), fields(id_suggestion = %suggestion.id))]
    async fn save(&self, suggestion: &Suggestion) -> Result<(), PortError> {
        debug!("Saving suggestion");

        sqlx::query(
            r#"
            INSERT INTO suggestion (
                id, id_jeune, type, source, criteres, informations, date_creation,
                date_mise_a_jour, date_refus, date_creation_recherche
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                criteres = EXCLUDED.criteres,
                informations = EXCLUDED.informations,
                date_mise_a_jour = EXCLUDED.date_mise_a_jour,
                date_refus = EXCLUDED.date_refus,
                date_creation_recherche = EXCLUDED.date_creation_recherche
            "#,
        )
        .bind(suggestion.id.into_uuid())
        .bind(suggestion.id_jeune.into_uuid())
        .bind(vers_code(&suggestion.type_recherche)?)
        .bind(vers_code(&suggestion.source)?)
        .bind(&suggestion.criteres)
        .bind(Json(&suggestion.informations))
        .bind(suggestion.date_creation)
        .bind(suggestion.date_mise_a_jour)
        .bind(suggestion.date_refus)
        .bind(suggestion.date_creation_recherche)
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(())
    }
}

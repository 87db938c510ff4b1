//! PostgreSQL Planificateur and SuiviJob Adapters
//!
//! Due jobs are claimed by deleting them under `FOR UPDATE SKIP LOCKED`, so
//! concurrent workers never pick the same job and a claimed job is gone even
//! if the worker crashes while running it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_notification::{Job, JobType, PlanificateurRepository, SuiviJob, SuiviJobRepository};

use crate::error::erreur_sql;
use crate::pool::sonder;

#[derive(Debug, FromRow)]
struct JobRow {
    id: String,
    date_execution: DateTime<Utc>,
    #[sqlx(rename = "type")]
    job_type: String,
    contenu: Value,
}

impl TryFrom<JobRow> for Job {
    type Error = PortError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.id,
            date_execution: row.date_execution,
            job_type: row.job_type.parse::<JobType>()?,
            contenu: row.contenu,
        })
    }
}

/// PostgreSQL-backed implementation of `PlanificateurRepository`
#[derive(Debug, Clone)]
pub struct PostgresPlanificateurAdapter {
    pool: PgPool,
}

impl PostgresPlanificateurAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresPlanificateurAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPlanificateurAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-planificateur-adapter").await
    }
}

#[async_trait]
impl PlanificateurRepository for PostgresPlanificateurAdapter {
    /// Re-planning a job with the same id replaces it
    #[instrument(skip(self, job), fields(id_job = %job.id, job_type = job.job_type.as_str()))]
    async fn ajouter(&self, job: &Job) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO planificateur_job (id, date_execution, type, contenu)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                date_execution = EXCLUDED.date_execution,
                type = EXCLUDED.type,
                contenu = EXCLUDED.contenu
            "#,
        )
        .bind(&job.id)
        .bind(job.date_execution)
        .bind(job.job_type.as_str())
        .bind(&job.contenu)
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        debug!(date_execution = %job.date_execution, "Job planned");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn supprimer_contenant(&self, fragment: &str) -> Result<u64, PortError> {
        let result = sqlx::query("DELETE FROM planificateur_job WHERE strpos(id, $1) > 0")
            .bind(fragment)
            .execute(&self.pool)
            .await
            .map_err(erreur_sql)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn reserver_jobs_echus(
        &self,
        now: DateTime<Utc>,
        limite: u64,
    ) -> Result<Vec<Job>, PortError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            DELETE FROM planificateur_job
            WHERE id IN (
                SELECT id FROM planificateur_job
                WHERE date_execution <= $1
                ORDER BY date_execution
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, date_execution, type, contenu
            "#,
        )
        .bind(now)
        .bind(limite as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(erreur_sql)?;

        let mut jobs = rows
            .into_iter()
            .map(Job::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        jobs.sort_by(|a, b| a.date_execution.cmp(&b.date_execution));

        debug!(count = jobs.len(), "Claimed due jobs");
        Ok(jobs)
    }
}

/// PostgreSQL-backed implementation of `SuiviJobRepository`
#[derive(Debug, Clone)]
pub struct PostgresSuiviJobAdapter {
    pool: PgPool,
}

impl PostgresSuiviJobAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresSuiviJobAdapter {}

#[async_trait]
impl HealthCheckable for PostgresSuiviJobAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-suivi-job-adapter").await
    }
}

#[async_trait]
impl SuiviJobRepository for PostgresSuiviJobAdapter {
    #[instrument(skip(self, suivi), fields(job_type = suivi.job_type.as_str(), succes = suivi.succes))]
    async fn save(&self, suivi: &SuiviJob) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO suivi_job (
                id, job_type, date_execution, succes, resultat, nb_erreurs, temps_execution_ms
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(suivi.id.into_uuid())
        .bind(suivi.job_type.as_str())
        .bind(suivi.date_execution)
        .bind(suivi.succes)
        .bind(&suivi.resultat)
        .bind(i64::try_from(suivi.nb_erreurs).unwrap_or(i64::MAX))
        .bind(i64::try_from(suivi.temps_execution_ms).unwrap_or(i64::MAX))
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn supprimer_anterieurs_a(&self, date: DateTime<Utc>) -> Result<u64, PortError> {
        let result = sqlx::query("DELETE FROM suivi_job WHERE date_execution < $1")
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(erreur_sql)?;

        debug!(deleted = result.rows_affected(), "Purged job executions");
        Ok(result.rows_affected())
    }
}

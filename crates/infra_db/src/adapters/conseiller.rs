//! PostgreSQL Conseiller and Agence Adapters

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    AgenceId, ConseillerId, DomainPort, HealthCheckResult, HealthCheckable, PortError, Structure,
};
use domain_beneficiaire::{
    Agence, AgenceDuConseiller, AgenceRepository, Conseiller, ConseillerRepository,
};

use crate::colonnes::{depuis_code, vers_code};
use crate::error::erreur_sql;
use crate::pool::sonder;

#[derive(Debug, FromRow)]
struct ConseillerRow {
    id: Uuid,
    prenom: String,
    nom: String,
    email: Option<String>,
    structure: String,
    id_agence: Option<Uuid>,
    nom_agence: Option<String>,
    date_derniere_connexion: Option<DateTime<Utc>>,
}

impl TryFrom<ConseillerRow> for Conseiller {
    type Error = PortError;

    fn try_from(row: ConseillerRow) -> Result<Self, Self::Error> {
        Ok(Conseiller {
            id: ConseillerId::from_uuid(row.id),
            prenom: row.prenom,
            nom: row.nom,
            email: row.email,
            structure: depuis_code("conseiller.structure", &row.structure)?,
            agence: row.id_agence.map(|id| AgenceDuConseiller {
                id: AgenceId::from_uuid(id),
                nom: row.nom_agence,
            }),
            date_derniere_connexion: row.date_derniere_connexion,
        })
    }
}

/// PostgreSQL-backed implementation of `ConseillerRepository`
#[derive(Debug, Clone)]
pub struct PostgresConseillerAdapter {
    pool: PgPool,
}

impl PostgresConseillerAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresConseillerAdapter {}

#[async_trait]
impl HealthCheckable for PostgresConseillerAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-conseiller-adapter").await
    }
}

#[async_trait]
impl ConseillerRepository for PostgresConseillerAdapter {
    #[instrument(skip(self))]
    async fn get(&self, id: ConseillerId) -> Result<Option<Conseiller>, PortError> {
        let row = sqlx::query_as::<_, ConseillerRow>(
            r#"
            SELECT id, prenom, nom, email, structure, id_agence, nom_agence,
                   date_derniere_connexion
            FROM conseiller
            WHERE id = $1
            "#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(erreur_sql)?;

        row.map(Conseiller::try_from).transpose()
    }

    #[instrument(skip(self, conseiller), fields(id_conseiller = %conseiller.id))]
    async fn save(&self, conseiller: &Conseiller) -> Result<(), PortError> {
        debug!("Saving conseiller");

        sqlx::query(
            r#"
            INSERT INTO conseiller (
                id, prenom, nom, email, structure, id_agence, nom_agence, date_derniere_connexion
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                prenom = EXCLUDED.prenom,
                nom = EXCLUDED.nom,
                email = EXCLUDED.email,
                structure = EXCLUDED.structure,
                id_agence = EXCLUDED.id_agence,
                nom_agence = EXCLUDED.nom_agence,
                date_derniere_connexion = EXCLUDED.date_derniere_connexion
            "#,
        )
        .bind(conseiller.id.into_uuid())
        .bind(&conseiller.prenom)
        .bind(&conseiller.nom)
        .bind(&conseiller.email)
        .bind(vers_code(&conseiller.structure)?)
        .bind(conseiller.id_agence().map(AgenceId::into_uuid))
        .bind(conseiller.agence.as_ref().and_then(|agence| agence.nom.clone()))
        .bind(conseiller.date_derniere_connexion)
        .execute(&self.pool)
        .await
        .map_err(erreur_sql)?;

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct AgenceRow {
    id: Uuid,
    nom: String,
    code_departement: String,
    structure: String,
}

impl TryFrom<AgenceRow> for Agence {
    type Error = PortError;

    fn try_from(row: AgenceRow) -> Result<Self, Self::Error> {
        Ok(Agence {
            id: AgenceId::from_uuid(row.id),
            nom: row.nom,
            code_departement: row.code_departement,
            structure: depuis_code("agence.structure", &row.structure)?,
        })
    }
}

/// PostgreSQL-backed implementation of `AgenceRepository`
#[derive(Debug, Clone)]
pub struct PostgresAgenceAdapter {
    pool: PgPool,
}

impl PostgresAgenceAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresAgenceAdapter {}

#[async_trait]
impl HealthCheckable for PostgresAgenceAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-agence-adapter").await
    }
}

#[async_trait]
impl AgenceRepository for PostgresAgenceAdapter {
    #[instrument(skip(self))]
    async fn get(&self, id: AgenceId, structure: Structure) -> Result<Option<Agence>, PortError> {
        let row = sqlx::query_as::<_, AgenceRow>(
            r#"
            SELECT id, nom, code_departement, structure
            FROM agence
            WHERE id = $1 AND structure = $2
            "#,
        )
        .bind(id.into_uuid())
        .bind(vers_code(&structure)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(erreur_sql)?;

        row.map(Agence::try_from).transpose()
    }
}

//! PostgreSQL Liste de Diffusion Adapter
//!
//! Membership lives in `liste_de_diffusion_jeune_association`. Whether a
//! member is still in the owner's portfolio is computed at read time by
//! comparing the jeune's current conseiller with the list owner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    ConseillerId, DomainPort, HealthCheckResult, HealthCheckable, JeuneId, ListeDeDiffusionId,
    PortError,
};
use domain_beneficiaire::{BeneficiaireDeLaListe, ListeDeDiffusion, ListeDeDiffusionRepository};

use crate::error::erreur_sql;
use crate::pool::sonder;

#[derive(Debug, FromRow)]
struct ListeRow {
    id: Uuid,
    titre: String,
    id_conseiller: Uuid,
    date_de_creation: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct MembreRow {
    id_liste: Uuid,
    id_jeune: Uuid,
    date_ajout: DateTime<Utc>,
    est_dans_le_portefeuille: bool,
}

/// PostgreSQL-backed implementation of `ListeDeDiffusionRepository`
#[derive(Debug, Clone)]
pub struct PostgresListeDeDiffusionAdapter {
    pool: PgPool,
}

impl PostgresListeDeDiffusionAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrater(&self, listes: Vec<ListeRow>) -> Result<Vec<ListeDeDiffusion>, PortError> {
        let ids: Vec<Uuid> = listes.iter().map(|liste| liste.id).collect();

        let membres = sqlx::query_as::<_, MembreRow>(
            r#"
            SELECT a.id_liste, a.id_jeune, a.date_ajout,
                   (j.id_conseiller IS NOT DISTINCT FROM l.id_conseiller) AS est_dans_le_portefeuille
            FROM liste_de_diffusion_jeune_association a
            JOIN liste_de_diffusion l ON l.id = a.id_liste
            JOIN jeune j ON j.id = a.id_jeune
            WHERE a.id_liste = ANY($1)
            ORDER BY a.date_ajout, a.id_jeune
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(erreur_sql)?;

        let mut par_liste: HashMap<Uuid, Vec<BeneficiaireDeLaListe>> = HashMap::new();
        for membre in membres {
            par_liste
                .entry(membre.id_liste)
                .or_default()
                .push(BeneficiaireDeLaListe {
                    id: JeuneId::from_uuid(membre.id_jeune),
                    date_ajout: membre.date_ajout,
                    est_dans_le_portefeuille: membre.est_dans_le_portefeuille,
                });
        }

        Ok(listes
            .into_iter()
            .map(|row| ListeDeDiffusion {
                id: ListeDeDiffusionId::from_uuid(row.id),
                titre: row.titre,
                id_conseiller: ConseillerId::from_uuid(row.id_conseiller),
                date_de_creation: row.date_de_creation,
                beneficiaires: par_liste.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }
}

impl DomainPort for PostgresListeDeDiffusionAdapter {}

#[async_trait]
impl HealthCheckable for PostgresListeDeDiffusionAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        sonder(&self.pool, "postgres-liste-de-diffusion-adapter").await
    }
}

#[async_trait]
impl ListeDeDiffusionRepository for PostgresListeDeDiffusionAdapter {
    #[instrument(skip(self))]
    async fn get(&self, id: ListeDeDiffusionId) -> Result<Option<ListeDeDiffusion>, PortError> {
        let row = sqlx::query_as::<_, ListeRow>(
            "SELECT id, titre, id_conseiller, date_de_creation FROM liste_de_diffusion WHERE id = $1",
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(erreur_sql)?;

        match row {
            Some(row) => Ok(self.hydrater(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_all_by_conseiller(
        &self,
        id_conseiller: ConseillerId,
    ) -> Result<Vec<ListeDeDiffusion>, PortError> {
        let rows = sqlx::query_as::<_, ListeRow>(
            r#"
            SELECT id, titre, id_conseiller, date_de_creation
            FROM liste_de_diffusion
            WHERE id_conseiller = $1
            ORDER BY date_de_creation DESC
            "#,
        )
        .bind(id_conseiller.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(erreur_sql)?;

        self.hydrater(rows).await
    }

    #[instrument(skip(self, liste), fields(id_liste = %liste.id, membres = liste.beneficiaires.len()))]
    async fn save(&self, liste: &ListeDeDiffusion) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(erreur_sql)?;

        sqlx::query(
            r#"
            INSERT INTO liste_de_diffusion (id, titre, id_conseiller, date_de_creation)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET titre = EXCLUDED.titre
            "#,
        )
        .bind(liste.id.into_uuid())
        .bind(&liste.titre)
        .bind(liste.id_conseiller.into_uuid())
        .bind(liste.date_de_creation)
        .execute(&mut *tx)
        .await
        .map_err(erreur_sql)?;

        sqlx::query("DELETE FROM liste_de_diffusion_jeune_association WHERE id_liste = $1")
            .bind(liste.id.into_uuid())
            .execute(&mut *tx)
            .await
            .map_err(erreur_sql)?;

        for beneficiaire in &liste.beneficiaires {
            sqlx::query(
                r#"
                INSERT INTO liste_de_diffusion_jeune_association (id_liste, id_jeune, date_ajout)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(liste.id.into_uuid())
            .bind(beneficiaire.id.into_uuid())
            .bind(beneficiaire.date_ajout)
            .execute(&mut *tx)
            .await
            .map_err(erreur_sql)?;
        }

        tx.commit().await.map_err(erreur_sql)?;
        debug!("Liste de diffusion saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ListeDeDiffusionId) -> Result<(), PortError> {
        sqlx::query("DELETE FROM liste_de_diffusion WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(erreur_sql)?;
        Ok(())
    }
}

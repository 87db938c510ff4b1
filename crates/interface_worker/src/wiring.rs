//! Builds the handler context on top of the PostgreSQL adapters

use std::sync::Arc;

use application::Contexte;
use core_kernel::{HealthCheckable, SystemClock};
use infra_db::{
    DatabasePool, PostgresActionAdapter, PostgresAgenceAdapter, PostgresCommentaireAdapter,
    PostgresConseillerAdapter, PostgresEvenementAdapter, PostgresHistoriqueRendezVousAdapter,
    PostgresJeuneAdapter, PostgresListeDeDiffusionAdapter, PostgresNotificationAdapter, PostgresPlanificateurAdapter,
    PostgresRendezVousAdapter, PostgresSuggestionAdapter, PostgresSuiviJobAdapter,
};

pub fn contexte_postgres(pool: &DatabasePool) -> Contexte {
    Contexte {
        jeunes: Arc::new(PostgresJeuneAdapter::new(pool.clone())),
        conseillers: Arc::new(PostgresConseillerAdapter::new(pool.clone())),
        agences: Arc::new(PostgresAgenceAdapter::new(pool.clone())),
        listes_de_diffusion: Arc::new(PostgresListeDeDiffusionAdapter::new(pool.clone())),
        suggestions: Arc::new(PostgresSuggestionAdapter::new(pool.clone())),
        actions: Arc::new(PostgresActionAdapter::new(pool.clone())),
        commentaires: Arc::new(PostgresCommentaireAdapter::new(pool.clone())),
        rendez_vous: Arc::new(PostgresRendezVousAdapter::new(pool.clone())),
        historique_rendez_vous: Arc::new(PostgresHistoriqueRendezVousAdapter::new(pool.clone())),
        planificateur: Arc::new(PostgresPlanificateurAdapter::new(pool.clone())),
        suivi_jobs: Arc::new(PostgresSuiviJobAdapter::new(pool.clone())),
        evenements: Arc::new(PostgresEvenementAdapter::new(pool.clone())),
        notifications: Arc::new(PostgresNotificationAdapter::new(pool.clone())),
        clock: Arc::new(SystemClock),
    }
}

/// Adapters probed by the readiness endpoint
///
/// Every adapter shares the pool, so the ones the worker loop depends on
/// are enough to tell whether the database answers.
pub fn sondes_postgres(pool: &DatabasePool) -> Vec<Arc<dyn HealthCheckable>> {
    vec![
        Arc::new(PostgresPlanificateurAdapter::new(pool.clone())),
        Arc::new(PostgresNotificationAdapter::new(pool.clone())),
    ]
}

//! Pass Emploi - Job Worker Binary
//!
//! Polls the planificateur for due jobs and serves the operational HTTP
//! endpoints.
//!
//! # Usage
//!
//! ```bash
//! WORKER_DATABASE_URL=postgres://... WORKER_JWT_SECRET=... cargo run --bin pass-emploi-worker
//! ```
//!
//! # Environment Variables
//!
//! * `WORKER_HOST` / `WORKER_PORT` - HTTP address (default: 0.0.0.0:8080)
//! * `WORKER_DATABASE_URL` - PostgreSQL connection string
//! * `WORKER_JWT_SECRET` - access token signing secret
//! * `WORKER_LOG_LEVEL` - default level when `RUST_LOG` is unset (default: info)
//! * `WORKER_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `WORKER_POLL_INTERVAL_SECS` - delay between two polls (default: 10)
//! * `WORKER_BATCH_JOBS` - jobs claimed per poll (default: 20)
//! * `WORKER_MAX_JOBS_SIMULTANES` - jobs running at the same time (default: 4)
//! * `WORKER_PAUSE_ENTRE_NOTIFICATIONS_MS` - pause between two pushes of a broadcast (default: 500)
//! * `WORKER_RETENTION_SUIVI_JOBS_JOURS` - days of job executions kept (default: 30)

use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;

use application::jobs::planifier_prochain_nettoyage;
use application::JobDispatcher;
use infra_db::{create_pool, DatabaseConfig};
use interface_worker::config::WorkerConfig;
use interface_worker::telemetry::init_tracing;
use interface_worker::wiring::{contexte_postgres, sondes_postgres};
use interface_worker::worker::Worker;
use interface_worker::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = WorkerConfig::from_env().context("Configuration du worker invalide")?;

    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Démarrage du worker Pass Emploi"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_url))
        .await
        .context("Connexion à la base impossible")?;

    let contexte = contexte_postgres(&pool);

    planifier_prochain_nettoyage(&contexte.planificateur_service(), contexte.clock.now())
        .await
        .context("Planification du nettoyage des suivis de job impossible")?;

    let worker = Worker::new(
        JobDispatcher::new(&contexte, &config.configuration_jobs()),
        config.poll_interval(),
        config.batch_jobs,
        config.max_jobs_simultanes,
    );
    let (arret, reception) = watch::channel(false);
    let boucle = tokio::spawn(worker.run(reception));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("Adresse d'écoute invalide")?;
    let app = create_router(AppState::new(contexte, config, sondes_postgres(&pool)));

    tracing::info!(%addr, "Serveur HTTP à l'écoute");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    arret.send(true).ok();
    boucle.await.context("Arrêt anormal de la boucle du worker")?;
    pool.close().await;

    tracing::info!("Arrêt du worker terminé");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Impossible d'écouter Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Impossible d'écouter SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C reçu, arrêt en cours");
        }
        _ = terminate => {
            tracing::info!("SIGTERM reçu, arrêt en cours");
        }
    }
}

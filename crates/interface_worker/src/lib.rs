//! Job worker
//!
//! Runs the jobs of the planificateur (broadcasts, reminders, cleanup) and
//! exposes a small operational HTTP surface next to the polling loop.
//!
//! # Architecture
//!
//! - **Worker**: polls due jobs and hands them to the `JobDispatcher`
//! - **Handlers**: health probes and the support trigger of broadcasts
//! - **Middleware**: bearer authentication, audit logging
//! - **Error Handling**: `DomainError` mapped to a status and a `{code, message}` body
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_worker::{create_router, AppState};
//!
//! let app = create_router(AppState::new(contexte, config, sondes));
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod telemetry;
pub mod wiring;
pub mod worker;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use application::Contexte;
use core_kernel::HealthCheckable;

use crate::config::WorkerConfig;
use crate::handlers::{health, jobs};
use crate::middleware::{audit_middleware, auth_middleware};

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub contexte: Contexte,
    pub config: WorkerConfig,
    /// Adapters probed by `/health/ready`
    pub sondes: Vec<Arc<dyn HealthCheckable>>,
}

impl AppState {
    pub fn new(
        contexte: Contexte,
        config: WorkerConfig,
        sondes: Vec<Arc<dyn HealthCheckable>>,
    ) -> Self {
        Self {
            contexte,
            config,
            sondes,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let job_routes = Router::new()
        .route("/notifier-beneficiaires", post(jobs::notifier_beneficiaires));

    // audit runs inside auth so it sees the resolved Utilisateur
    let api_routes = Router::new()
        .nest("/jobs", job_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

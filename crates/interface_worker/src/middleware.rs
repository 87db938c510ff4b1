//! HTTP middleware

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use core_kernel::Utilisateur;

use crate::auth::{bearer, validate_token};
use crate::error::ApiError;
use crate::AppState;

/// Resolves the bearer token into the `Utilisateur` extension
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let utilisateur = bearer(header)
        .and_then(|token| validate_token(token, &state.config.jwt_secret))
        .inspect_err(|e| warn!(error = %e, "Authentification refusée"))?;

    request.extensions_mut().insert(utilisateur);
    Ok(next.run(request).await)
}

/// Logs every authenticated call with its caller
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let utilisateur = request
        .extensions()
        .get::<Utilisateur>()
        .map(|u| u.id.to_string())
        .unwrap_or_else(|| "anonyme".to_string());

    let debut = Instant::now();
    let response = next.run(request).await;

    info!(
        method = %method,
        uri = %uri,
        utilisateur = %utilisateur,
        status = response.status().as_u16(),
        duration_ms = debut.elapsed().as_millis() as u64,
        "Appel API"
    );

    response
}

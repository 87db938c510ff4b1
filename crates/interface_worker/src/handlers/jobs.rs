//! Job handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};

use application::commands::CreerJobNotifierBeneficiairesCommandHandler;
use application::CommandHandler;
use core_kernel::Utilisateur;

use crate::dto::jobs::{JobPlanifieResponse, NotifierBeneficiairesRequest};
use crate::error::ApiError;
use crate::AppState;

/// Enqueues a broadcast to the jeunes of the requested structures
pub async fn notifier_beneficiaires(
    State(state): State<AppState>,
    Extension(utilisateur): Extension<Utilisateur>,
    request: Result<Json<NotifierBeneficiairesRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobPlanifieResponse>), ApiError> {
    let Json(request) = request.map_err(|e| ApiError::RequeteInvalide(e.body_text()))?;

    let id_job = CreerJobNotifierBeneficiairesCommandHandler::new(&state.contexte)
        .execute(request.into(), &utilisateur)
        .await?;

    Ok((StatusCode::ACCEPTED, Json(JobPlanifieResponse { id_job })))
}

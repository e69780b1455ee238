use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::applications::form::ApplicationForm;
use crate::applications::intake::prepare_run;
use crate::applications::repository;
use crate::auth::{ApprovedUser, AuthUser};
use crate::errors::AppError;
use crate::models::application::{ApplicationDetail, ApplicationSummaryRow};
use crate::pipeline::PipelineState;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ApplicationRunResponse {
    pub application_id: Uuid,
    pub result: PipelineState,
    pub warnings: Vec<String>,
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    ApprovedUser(user): ApprovedUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationRunResponse>), AppError> {
    let form = ApplicationForm::from_multipart(multipart).await?;
    let prepared = prepare_run(&state.page_client, form).await?;

    info!(
        "User {} started a run for '{}' at '{}'",
        user.id, prepared.state.job.title, prepared.state.job.company
    );
    let result = state.pipeline.run(prepared.state).await?;

    let row = repository::insert_application(
        &state.db,
        user.id,
        prepared.resume_filename.as_deref(),
        &result,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationRunResponse {
            application_id: row.id,
            result,
            warnings: prepared.warnings,
        }),
    ))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ApplicationSummaryRow>>, AppError> {
    Ok(Json(repository::list_applications(&state.db, user.id).await?))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let row = repository::get_application(&state.db, user.id, id).await?;
    Ok(Json(row.into()))
}

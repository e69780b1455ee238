use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{generate_token, hash_token, users, AdminUser};
use crate::errors::AppError;
use crate::models::user::{User, UserStatus};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub user: User,
    /// Shown once; only its hash is stored.
    pub token: String,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: UserStatus,
}

/// Lowercased, trimmed email, or a validation error.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::Validation(format!("Invalid email address: '{}'", raw.trim()))),
    }
}

/// POST /api/v1/users/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let email = normalize_email(&req.email)?;
    let token = generate_token();
    let user = users::create_user(&state.db, &email, &hash_token(&token)).await?;
    info!("Registered user {} ({})", user.id, user.email);
    Ok((StatusCode::CREATED, Json(RegisterResponse { user, token })))
}

/// GET /api/v1/admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(users::list_users(&state.db).await?))
}

/// POST /api/v1/admin/users/:id/status
pub async fn handle_set_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<User>, AppError> {
    let user = users::set_status(&state.db, id, req.status).await?;
    info!(
        "Admin {} set user {} to {}",
        admin.email,
        user.id,
        req.status.as_str()
    );
    Ok(Json(user))
}

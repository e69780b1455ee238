// Bearer-token accounts. Tokens are issued once at registration and only their
// blake3 hash is stored. New accounts start pending until an admin approves them.

pub mod handlers;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{User, UserStatus};
use crate::state::AppState;

const TOKEN_PREFIX: &str = "jf_";

/// Fresh API token handed to the user exactly once.
pub fn generate_token() -> String {
    format!("{TOKEN_PREFIX}{}", Uuid::new_v4().simple())
}

pub fn hash_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Admins always pass; everyone else must be approved.
pub fn check_approval(user: &User) -> Result<(), AppError> {
    if user.is_admin {
        return Ok(());
    }
    match user.status() {
        Some(UserStatus::Approved) => Ok(()),
        Some(UserStatus::Blocked) => Err(AppError::Forbidden(
            "Your account is blocked. Contact the administrator.".to_string(),
        )),
        _ => Err(AppError::Forbidden(
            "Your account is pending approval. An administrator must approve it before you can generate applications.".to_string(),
        )),
    }
}

/// Any registered user, whatever their status.
pub struct AuthUser(pub User);

/// A user allowed to run the pipeline.
pub struct ApprovedUser(pub User);

pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user = users::find_by_token_hash(&state.db, &hash_token(token))
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ApprovedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        check_approval(&user)?;
        Ok(ApprovedUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

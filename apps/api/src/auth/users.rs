use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::hash_token;
use crate::errors::AppError;
use crate::models::user::{User, UserStatus, USER_COLUMNS};

const UNIQUE_VIOLATION: &str = "23505";

/// Inserts a pending, non-admin account.
pub async fn create_user(pool: &PgPool, email: &str, token_hash: &str) -> Result<User, AppError> {
    let sql = format!(
        "INSERT INTO users (id, email, token_hash, status, is_admin) \
         VALUES ($1, $2, $3, $4, FALSE) RETURNING {USER_COLUMNS}"
    );
    let result = sqlx::query_as::<_, User>(&sql)
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(token_hash)
        .bind(UserStatus::Pending.as_str())
        .fetch_one(pool)
        .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Err(AppError::Conflict(format!("An account for {email} already exists")))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_token_hash(pool: &PgPool, token_hash: &str) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE token_hash = $1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
    let users = sqlx::query_as::<_, User>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn set_status(pool: &PgPool, user_id: Uuid, status: UserStatus) -> Result<User, AppError> {
    let sql = format!("UPDATE users SET status = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await?;
    user.ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

/// Ensures the configured admin exists, is approved, and holds the configured token.
pub async fn seed_admin(pool: &PgPool, email: &str, token: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, token_hash, status, is_admin)
        VALUES ($1, $2, $3, $4, TRUE)
        ON CONFLICT (email) DO UPDATE
        SET token_hash = EXCLUDED.token_hash, status = EXCLUDED.status, is_admin = TRUE
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(hash_token(token))
    .bind(UserStatus::Approved.as_str())
    .execute(pool)
    .await?;

    info!("Admin account ensured for {}", email);
    Ok(())
}

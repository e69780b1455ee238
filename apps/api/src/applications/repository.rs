use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationSummaryRow};
use crate::pipeline::PipelineState;

/// Persists a completed run and returns the stored row.
pub async fn insert_application(
    pool: &PgPool,
    user_id: Uuid,
    resume_filename: Option<&str>,
    state: &PipelineState,
) -> Result<ApplicationRow, AppError> {
    let fit = state.fit.as_ref();
    let fit_reasons = fit
        .map(|f| serde_json::to_string(&f.reasons))
        .transpose()
        .map_err(anyhow::Error::from)?;
    let fit_gaps = fit
        .map(|f| serde_json::to_string(&f.gaps))
        .transpose()
        .map_err(anyhow::Error::from)?;

    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (
            id, user_id, job_title, job_company, job_location, job_url,
            resume_filename, resume_text, job_description, questions,
            fit_score, fit_level, fit_reasons, fit_gaps,
            job_parsed_markdown, tailored_resume_md, cover_letter, qna
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&state.job.title)
    .bind(&state.job.company)
    .bind(&state.job.location)
    .bind(&state.job.source_url)
    .bind(resume_filename)
    .bind(&state.user.resume_text)
    .bind(&state.job.description)
    .bind(state.questions.join("\n"))
    .bind(fit.map(|f| i32::from(f.score)))
    .bind(fit.map(|f| f.level.label()))
    .bind(fit_reasons)
    .bind(fit_gaps)
    .bind(&state.job_parsed_markdown)
    .bind(&state.tailored_resume_md)
    .bind(&state.cover_letter)
    .bind(&state.qna)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// The caller's runs, newest first.
pub async fn list_applications(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ApplicationSummaryRow>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationSummaryRow>(
        r#"
        SELECT id, created_at, job_title, job_company, fit_score, fit_level
        FROM applications
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Runs owned by someone else are reported as not found.
pub async fn get_application(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<ApplicationRow, AppError> {
    let row: Option<ApplicationRow> =
        sqlx::query_as("SELECT * FROM applications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Tables are created if missing; existing tables are never altered.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        email       TEXT NOT NULL UNIQUE,
        token_hash  TEXT NOT NULL UNIQUE,
        status      TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'approved', 'blocked')),
        is_admin    BOOLEAN NOT NULL DEFAULT FALSE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id                   UUID PRIMARY KEY,
        user_id              UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at           TIMESTAMPTZ NOT NULL DEFAULT now(),
        job_title            TEXT NOT NULL,
        job_company          TEXT NOT NULL,
        job_location         TEXT NOT NULL,
        job_url              TEXT,
        resume_filename      TEXT,
        resume_text          TEXT NOT NULL,
        job_description      TEXT NOT NULL,
        questions            TEXT NOT NULL DEFAULT '',
        fit_score            INTEGER,
        fit_level            TEXT,
        fit_reasons          TEXT,
        fit_gaps             TEXT,
        job_parsed_markdown  TEXT,
        tailored_resume_md   TEXT,
        cover_letter         TEXT,
        qna                  TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS applications_user_created_idx ON applications (user_id, created_at DESC)",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `users` and `applications` tables when they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

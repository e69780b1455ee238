use sqlx::PgPool;

use crate::config::Config;
use crate::pipeline::PipelineRunner;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Wraps the injected completion client; cloned per request.
    pub pipeline: PipelineRunner,
    /// Used for job page fetches only.
    pub page_client: reqwest::Client,
    pub config: Config,
}

mod applications;
mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::extract::job_page::build_page_client;
use crate::llm_client::LlmClient;
use crate::pipeline::PipelineRunner;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    if let Some((email, token)) = config.admin_seed() {
        auth::users::seed_admin(&db, email, token)
            .await
            .map_err(|e| anyhow::anyhow!("Admin seeding failed: {e}"))?;
    }

    // Initialize LLM client and the pipeline around it
    let llm = LlmClient::new(config.llm_settings());
    info!("LLM client initialized (model: {})", llm.model());
    let pipeline = PipelineRunner::new(Arc::new(llm))?;

    let page_client = build_page_client()?;

    let state = AppState {
        db,
        pipeline,
        page_client,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

mod config;
mod errors;
mod llm_client;
mod models;
mod roadmap;
mod routes;
mod state;
mod workflow;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::roadmap::client::RoadmapClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::engine::{spawn_idle_sweeper, WorkflowEngine};

const SESSION_SWEEP_INTERVAL_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PivotPath API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the model client
    let gemini = GeminiClient::new(config.gemini_api_key.clone(), &config.gemini_api_base)?;
    info!(
        "Gemini client initialized (model: {}, base: {})",
        llm_client::MODEL,
        config.gemini_api_base
    );

    // Sessions are held in memory for the lifetime of the process
    let engine = WorkflowEngine::new(RoadmapClient::new(Arc::new(gemini)));
    let session_ttl = chrono::Duration::seconds(
        i64::try_from(config.session_ttl_secs).context("SESSION_TTL_SECS is too large")?,
    );
    spawn_idle_sweeper(
        engine.clone(),
        session_ttl,
        std::time::Duration::from_secs(SESSION_SWEEP_INTERVAL_SECS),
    );
    info!("Idle sessions expire after {}s", config.session_ttl_secs);

    let state = AppState {
        engine,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

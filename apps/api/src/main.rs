mod config;
mod errors;
mod extraction;
mod gateway;
mod generation;
mod language;
mod llm_client;
mod questions;
mod routes;
mod schema;
mod state;
mod wizard;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::sources::PageFetcher;
use crate::gateway::LlmGateway;
use crate::llm_client::{LlmClient, LlmProfiles};
use crate::routes::build_router;
use crate::state::AppState;
use crate::wizard::store::SessionStore;

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

    info!("Starting Vacancy API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
        config.llm_timeout,
    )?;
    info!(
        "LLM client initialized (base: {}, extraction model: {})",
        config.openai_base_url, config.openai_model
    );

    let fetcher = PageFetcher::new(config.fetch_timeout)?;
    let profiles = LlmProfiles::new(&config.openai_model);
    info!("Wizard sessions expire after {}s idle", config.session_ttl.as_secs());

    // Build app state
    let state = AppState {
        gateway: LlmGateway::new(Arc::new(llm), profiles, fetcher),
        sessions: SessionStore::new(config.session_ttl),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the wizard frontend has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

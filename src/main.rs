//! Jadwal - session status service

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jadwal::{
    api::{self, AppState},
    config::Config,
    services::clock::clock_from_config,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jadwal=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Jadwal status service...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    config.validate()?;
    tracing::info!("Configuration loaded");

    let clock = clock_from_config(&config.clock)?;
    tracing::info!("Clock initialized: {}", clock.describe());
    tracing::info!(
        "Invalid dates policy: {:?}, batch limit: {}",
        config.status.invalid_date_policy,
        config.status.max_batch_size
    );

    // Build application state
    let state = AppState::new(&config, clock);

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! AppForge API Server
//!
//! HTTP entry point for the AppForge builder backend.

use anyhow::Result;
use appforge_api::{app::build_router, config::ApiConfig, middleware::spawn_sweeper, state::AppState};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ApiConfig::from_env()?;

    init_tracing(&config);

    info!(
        environment = ?config.environment,
        address = %config.server_address(),
        "Starting AppForge API"
    );
    if config.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET is not set; token endpoints will refuse to operate");
    }
    if config.api_key.is_none() {
        tracing::warn!("API_KEY is not set; token issuance will refuse to operate");
    }

    let state = AppState::new(config.clone());
    spawn_sweeper(state.limiter.clone(), config.rate_limit_sweep_interval());

    let app = build_router(state)?;

    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
    info!(address = %listener.local_addr()?, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(config: &ApiConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    result = signal::ctrl_c() => log_ctrl_c(result),
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to register SIGTERM handler");
                log_ctrl_c(signal::ctrl_c().await);
            }
        }
    }
    #[cfg(not(unix))]
    log_ctrl_c(signal::ctrl_c().await);
}

fn log_ctrl_c(result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("Received shutdown signal"),
        Err(err) => tracing::error!(error = %err, "Failed to listen for shutdown signal"),
    }
}

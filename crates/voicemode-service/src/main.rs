//! VoiceMode Service
//!
//! Entry point. Loads configuration, builds the router and serves HTTP until
//! SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voicemode_service::config::Config;
use voicemode_service::routes::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voicemode_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting VoiceMode service");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        voicemode_enabled = config.voicemode_enabled,
        token_server_url = %config.token_server_url,
        livekit_url = %config.livekit_url,
        token_timeout_seconds = config.token_timeout_seconds,
        "Configuration loaded successfully"
    );

    if !config.voicemode_enabled {
        warn!("VoiceMode is disabled; token requests will be rejected with 503");
    }

    let metrics_handle = routes::init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    let drain_period = Duration::from_secs(config.drain_seconds);
    let state = Arc::new(AppState::new(config)?);
    let app = routes::build_routes(state, metrics_handle);

    info!("VoiceMode service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(drain_period))
        .await?;

    info!("VoiceMode service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
/// Returns when a shutdown signal is received and drain period is complete.
async fn shutdown_signal(drain_period: Duration) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    if !drain_period.is_zero() {
        warn!("Draining connections for {} seconds...", drain_period.as_secs());
        tokio::time::sleep(drain_period).await;
        info!("Drain period complete");
    } else {
        info!("Skipping drain period (VOICEMODE_DRAIN_SECONDS=0)");
    }
}

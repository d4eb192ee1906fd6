//! HTTP routes for the VoiceMode service.
//!
//! Defines the Axum router and application state.

use crate::auth::{Authenticator, JwtAuthenticator};
use crate::config::Config;
use crate::errors::VmError;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, require_verified_user, AuthState};
use crate::services::TokenServerClient;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration, immutable for the process lifetime.
    pub config: Config,

    /// Client for the LiveKit token server.
    pub token_server: TokenServerClient,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// # Errors
    ///
    /// Returns `VmError::Internal` if the token server client cannot be built.
    pub fn new(config: Config) -> Result<Self, VmError> {
        let token_server = TokenServerClient::new(
            config.token_server_url.clone(),
            config.livekit_url.clone(),
            Duration::from_secs(config.token_timeout_seconds),
        )?;

        Ok(Self {
            config,
            token_server,
        })
    }
}

/// Install the global Prometheus recorder and return its render handle.
///
/// Must be called at most once per process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))
}

/// Build the application routes with the JWT authenticator from `state.config`.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let authenticator = Arc::new(JwtAuthenticator::new(
        &state.config.jwt_secret,
        state.config.jwt_clock_skew_seconds,
    ));
    build_routes_with_authenticator(state, metrics_handle, authenticator)
}

/// Build the application routes with an explicit authenticator.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe (plain "OK") - public
/// - `/metrics` - Prometheus metrics - public
/// - `/api/v1/voicemode/token` - Token proxy - verified user
/// - `/api/v1/voicemode/config` - Config reporter - verified user
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - Request timeout from `Config::request_timeout`, always longer than the
///   token server timeout
pub fn build_routes_with_authenticator(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    authenticator: Arc<dyn Authenticator>,
) -> Router {
    let auth_state = Arc::new(AuthState { authenticator });
    let request_timeout = state.config.request_timeout();

    let public_routes = Router::new().route("/health", get(handlers::health_check));

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let protected_routes = Router::new()
        .route("/api/v1/voicemode/token", post(handlers::issue_token))
        .route("/api/v1/voicemode/config", get(handlers::get_config))
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            require_verified_user,
        ))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(http_metrics_middleware))
}

//! VoiceMode handlers.
//!
//! - `POST /api/v1/voicemode/token` - Proxy a LiveKit token request
//! - `GET /api/v1/voicemode/config` - Report VoiceMode configuration
//!
//! Both sit behind `require_verified_user`.

use crate::auth::Claims;
use crate::errors::VmError;
use crate::models::{TokenRequest, TokenResponse, VoiceModeConfig};
use crate::observability::metrics;
use crate::routes::AppState;
use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

// ============================================================================
// Handler: POST /api/v1/voicemode/token
// ============================================================================

/// Handler for POST /api/v1/voicemode/token
///
/// Forwards `{identity, room}` to the LiveKit token server and relays the
/// issued token.
///
/// # Response
///
/// - 200 OK: `{token, url}`
/// - 400 Bad Request: body is not `{identity, room}` with non-empty strings
/// - 502 Bad Gateway: token server reply has no `token`
/// - 503 Service Unavailable: VoiceMode disabled or token server unreachable
#[instrument(
    skip_all,
    name = "vm.voicemode.token",
    fields(method = "POST", endpoint = "/api/v1/voicemode/token")
)]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Extension(_claims): Extension<Claims>,
    body: axum::body::Bytes,
) -> Result<Json<TokenResponse>, VmError> {
    let start = Instant::now();

    let result = proxy_token_request(&state, &body).await;

    let duration = start.elapsed();
    match &result {
        Ok(_) => metrics::record_token_request("success", None, duration),
        Err(e) => metrics::record_token_request("error", Some(e.error_type()), duration),
    }

    result.map(Json)
}

async fn proxy_token_request(state: &AppState, body: &[u8]) -> Result<TokenResponse, VmError> {
    // Deserialize manually to return 400 (not Axum's default 422)
    let request: TokenRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(target: "vm.handlers.voicemode", error = %e, "Invalid request body");
        VmError::BadRequest("Invalid request body".to_string())
    })?;

    request
        .validate()
        .map_err(|e| VmError::BadRequest(e.to_string()))?;

    if !state.config.voicemode_enabled {
        return Err(VmError::FeatureDisabled);
    }

    let response = state.token_server.issue_token(&request).await?;

    info!(target: "vm.handlers.voicemode", "LiveKit token issued");

    Ok(response)
}

// ============================================================================
// Handler: GET /api/v1/voicemode/config
// ============================================================================

/// Handler for GET /api/v1/voicemode/config
///
/// ```json
/// { "enabled": true, "livekit_url": "wss://livekit.example.com" }
/// ```
#[instrument(skip_all, name = "vm.voicemode.config")]
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    Extension(_claims): Extension<Claims>,
) -> Json<VoiceModeConfig> {
    Json(VoiceModeConfig {
        enabled: state.config.voicemode_enabled,
        livekit_url: state.config.livekit_url.clone(),
    })
}

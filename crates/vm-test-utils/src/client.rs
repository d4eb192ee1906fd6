//! Typed HTTP client for the VoiceMode API.
//!
//! Mirrors what the web frontend does: bearer-authenticated JSON calls to
//! `/api/v1/voicemode/token` and `/api/v1/voicemode/config`. Non-2xx replies
//! surface the server's error body.

use reqwest::{Client, Response};
use thiserror::Error;
use voicemode_service::models::{TokenRequest, TokenResponse, VoiceModeConfig};

/// VoiceMode client errors.
#[derive(Debug, Error)]
pub enum VoiceModeClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    RequestFailed {
        status: u16,
        body: serde_json::Value,
    },
}

impl VoiceModeClientError {
    /// HTTP status of a failed request, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// `error.code` from the server's error body, if present.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::RequestFailed { body, .. } => body["error"]["code"].as_str(),
            Self::HttpError(_) => None,
        }
    }
}

/// Client for the VoiceMode API.
pub struct VoiceModeClient {
    base_url: String,
    http: Client,
}

impl VoiceModeClient {
    /// Create a client for a server at `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Get a LiveKit token for joining a voice session.
    pub async fn get_livekit_token(
        &self,
        session_token: &str,
        identity: &str,
        room: &str,
    ) -> Result<TokenResponse, VoiceModeClientError> {
        let request = TokenRequest {
            identity: identity.to_string(),
            room: room.to_string(),
        };

        let response = self
            .http
            .post(format!("{}/api/v1/voicemode/token", self.base_url))
            .bearer_auth(session_token)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        Ok(Self::success_or_error(response).await?.json().await?)
    }

    /// Get the VoiceMode configuration.
    pub async fn get_voicemode_config(
        &self,
        session_token: &str,
    ) -> Result<VoiceModeConfig, VoiceModeClientError> {
        let response = self
            .http
            .get(format!("{}/api/v1/voicemode/config", self.base_url))
            .bearer_auth(session_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        Ok(Self::success_or_error(response).await?.json().await?)
    }

    async fn success_or_error(response: Response) -> Result<Response, VoiceModeClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        Err(VoiceModeClientError::RequestFailed {
            status: status.as_u16(),
            body,
        })
    }
}

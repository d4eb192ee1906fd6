//! Data models for the VoiceMode service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for `POST /api/v1/voicemode/token`.
///
/// Forwarded to the token server unchanged, so it also serializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Participant identity inside the room.
    pub identity: String,

    /// Room the participant wants to join.
    pub room: String,
}

impl TokenRequest {
    /// Both fields are required non-empty strings. Values are otherwise
    /// passed through untouched.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.identity.is_empty() {
            return Err("identity must not be empty");
        }

        if self.room.is_empty() {
            return Err("room must not be empty");
        }

        Ok(())
    }
}

/// Response body for a successful token request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// LiveKit access token, verbatim from the token server.
    pub token: String,

    /// LiveKit server URL the client should connect to.
    pub url: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"[REDACTED]")
            .field("url", &self.url)
            .finish()
    }
}

/// Reply expected from the token server.
///
/// `token` is required. `url` is optional; `None` covers both an absent key
/// and an explicit `null`.
#[derive(Clone, Deserialize)]
pub struct UpstreamTokenReply {
    pub token: String,

    #[serde(default)]
    pub url: Option<String>,
}

impl fmt::Debug for UpstreamTokenReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamTokenReply")
            .field("token", &"[REDACTED]")
            .field("url", &self.url)
            .finish()
    }
}

impl UpstreamTokenReply {
    /// Build the client response, falling back to `default_url` only when the
    /// token server did not supply a URL. An empty string is kept as-is.
    pub fn into_response(self, default_url: &str) -> TokenResponse {
        TokenResponse {
            token: self.token,
            url: self.url.unwrap_or_else(|| default_url.to_string()),
        }
    }
}

/// Response body for `GET /api/v1/voicemode/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceModeConfig {
    pub enabled: bool,
    pub livekit_url: String,
}

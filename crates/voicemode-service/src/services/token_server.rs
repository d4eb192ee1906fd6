//! LiveKit token server HTTP client.
//!
//! Forwards `{identity, room}` to the token server and maps its reply onto
//! `TokenResponse`. One request per call: no retries, no caching.
//!
//! # Error mapping
//!
//! - connection failure, timeout, non-2xx status, body read failure:
//!   `VmError::UpstreamUnavailable` carrying the underlying cause
//! - reply that is not a JSON object with a string `token`:
//!   `VmError::UpstreamProtocolError`

use crate::errors::VmError;
use crate::models::{TokenRequest, TokenResponse, UpstreamTokenReply};
use reqwest::Client;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{error, instrument};

/// Connect timeout for token server requests in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP client for the LiveKit token server.
#[derive(Clone)]
pub struct TokenServerClient {
    /// HTTP client with the configured request timeout.
    client: Client,

    /// Token server endpoint (full URL, requests are POSTed here).
    endpoint: String,

    /// URL handed to clients when the token server omits one.
    default_livekit_url: String,
}

impl TokenServerClient {
    /// Create a new token server client.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Token server URL, e.g. "http://localhost:8081/token"
    /// * `default_livekit_url` - Fallback connection URL
    /// * `timeout` - Bound on a whole request, including reading the body
    ///
    /// # Errors
    ///
    /// Returns `VmError::Internal` if the HTTP client cannot be built.
    pub fn new(
        endpoint: String,
        default_livekit_url: String,
        timeout: Duration,
    ) -> Result<Self, VmError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .build()
            .map_err(|e| {
                error!(target: "vm.services.token_server", error = %e, "Failed to build HTTP client");
                VmError::Internal
            })?;

        Ok(Self {
            client,
            endpoint,
            default_livekit_url,
        })
    }

    /// Request a LiveKit token for `request.identity` in `request.room`.
    ///
    /// # Errors
    ///
    /// - `VmError::UpstreamUnavailable` if the token server is unreachable,
    ///   times out, or answers with a non-2xx status
    /// - `VmError::UpstreamProtocolError` if the reply lacks a `token`
    #[instrument(skip_all, name = "vm.services.token_server.issue")]
    pub async fn issue_token(&self, request: &TokenRequest) -> Result<TokenResponse, VmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                let cause = describe(&e);
                error!(target: "vm.services.token_server", cause = %cause, "Failed to get LiveKit token");
                VmError::UpstreamUnavailable(cause)
            })?;

        let body = response.bytes().await.map_err(|e| {
            let cause = describe(&e);
            error!(target: "vm.services.token_server", cause = %cause, "Failed to read token server reply");
            VmError::UpstreamUnavailable(cause)
        })?;

        // A 2xx body that is not JSON is a protocol error (502), same as a
        // missing `token`. Only transport and status failures map to 503.
        let reply: UpstreamTokenReply = serde_json::from_slice(&body).map_err(|e| {
            error!(target: "vm.services.token_server", error = %e, "Invalid response from token server");
            VmError::UpstreamProtocolError(e.to_string())
        })?;

        Ok(reply.into_response(&self.default_livekit_url))
    }
}

/// Flatten a reqwest error and its source chain into one message.
///
/// reqwest's top-level Display omits the interesting part ("operation timed
/// out", "Connection refused"), which lives in the sources.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    if err.is_timeout() && !message.contains("timed out") {
        message.push_str(" (timed out)");
    }
    message
}

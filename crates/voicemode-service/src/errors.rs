//! VoiceMode service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Every
//! error is logged server-side when it is converted into a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// VoiceMode service error type.
///
/// Maps to HTTP status codes:
/// - FeatureDisabled, UpstreamUnavailable: 503 Service Unavailable
/// - UpstreamProtocolError: 502 Bad Gateway
/// - InvalidToken: 401 Unauthorized
/// - Forbidden: 403 Forbidden
/// - BadRequest: 400 Bad Request
/// - Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum VmError {
    #[error("VoiceMode is not enabled. Please configure VOICEMODE_ENABLED=true")]
    FeatureDisabled,

    #[error("Failed to connect to voicemode token server: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid response from voicemode token server: {0}")]
    UpstreamProtocolError(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl VmError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            VmError::FeatureDisabled | VmError::UpstreamUnavailable(_) => 503,
            VmError::UpstreamProtocolError(_) => 502,
            VmError::InvalidToken(_) => 401,
            VmError::Forbidden(_) => 403,
            VmError::BadRequest(_) => 400,
            VmError::Internal => 500,
        }
    }

    /// Bounded label for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            VmError::FeatureDisabled => "feature_disabled",
            VmError::UpstreamUnavailable(_) => "upstream_unavailable",
            VmError::UpstreamProtocolError(_) => "upstream_protocol_error",
            VmError::InvalidToken(_) => "invalid_token",
            VmError::Forbidden(_) => "forbidden",
            VmError::BadRequest(_) => "bad_request",
            VmError::Internal => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for VmError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            VmError::FeatureDisabled => {
                tracing::warn!(target: "vm.availability", "Token requested while VoiceMode is disabled");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "FEATURE_DISABLED",
                    self.to_string(),
                )
            }
            VmError::UpstreamUnavailable(cause) => {
                tracing::error!(target: "vm.availability", cause = %cause, "Token server unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UPSTREAM_UNAVAILABLE",
                    self.to_string(),
                )
            }
            VmError::UpstreamProtocolError(detail) => {
                // Detail stays server-side; it may echo upstream payload fragments
                tracing::error!(target: "vm.availability", detail = %detail, "Token server reply violated contract");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_PROTOCOL_ERROR",
                    "Invalid response from voicemode token server".to_string(),
                )
            }
            VmError::InvalidToken(reason) => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", reason.clone())
            }
            VmError::Forbidden(reason) => (StatusCode::FORBIDDEN, "FORBIDDEN", reason.clone()),
            VmError::BadRequest(reason) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone()),
            VmError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) = "Bearer realm=\"voicemode\", error=\"invalid_token\"".parse() {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

//! JWT utilities shared across VoiceMode services.
//!
//! Provides the checks that run around signature verification:
//! - Size limits, applied BEFORE any parsing
//! - Clock skew constants for `iat` validation
//! - `iat` validation logic
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::{check_token_size, validate_iat, DEFAULT_CLOCK_SKEW};
//!
//! check_token_size(token)?;
//! // ... verify signature, decode claims ...
//! validate_iat(claims.iat, DEFAULT_CLOCK_SKEW)?;
//! ```

use std::time::Duration;
use thiserror::Error;

/// Maximum allowed JWT size in bytes (8KB).
///
/// Typical session tokens are a few hundred bytes. Anything larger than this
/// is rejected before base64 decoding or signature verification.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Default JWT clock skew tolerance (5 minutes).
///
/// Tokens with an `iat` more than this far in the future are rejected.
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(300);

/// Maximum allowed JWT clock skew tolerance (10 minutes).
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(600);

/// Errors that can occur during JWT pre/post-verification checks.
///
/// Messages are intentionally identical so callers cannot distinguish
/// failure causes. Details are logged at debug level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Token is empty or does not have three dot-separated segments.
    #[error("The access token is invalid or expired")]
    MalformedToken,

    /// Token `iat` claim is too far in the future.
    #[error("The access token is invalid or expired")]
    IatTooFarInFuture,
}

/// Reject oversized or structurally invalid tokens before parsing.
///
/// # Errors
///
/// - `TokenTooLarge` if the token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `MalformedToken` if the token is not `header.payload.signature`
pub fn check_token_size(token: &str) -> Result<(), JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    let segments = token.split('.').count();
    if segments != 3 || token.split('.').any(str::is_empty) {
        tracing::debug!(
            target: "common.jwt",
            segments = segments,
            "Token rejected: invalid JWT format"
        );
        return Err(JwtValidationError::MalformedToken);
    }

    Ok(())
}

/// Validate the `iat` (issued-at) claim with clock skew tolerance.
///
/// # Errors
///
/// Returns `JwtValidationError::IatTooFarInFuture` if `iat` is more than
/// `clock_skew` ahead of the current time.
pub fn validate_iat(iat: i64, clock_skew: Duration) -> Result<(), JwtValidationError> {
    let now = chrono::Utc::now().timestamp();
    validate_iat_at(iat, clock_skew, now)
}

/// Deterministic `iat` validation against an explicit `now` timestamp.
pub(crate) fn validate_iat_at(
    iat: i64,
    clock_skew: Duration,
    now: i64,
) -> Result<(), JwtValidationError> {
    // Safe cast: clock_skew is bounded to MAX_CLOCK_SKEW by config validation
    #[allow(clippy::cast_possible_wrap)]
    let clock_skew_secs = clock_skew.as_secs() as i64;
    let max_iat = now + clock_skew_secs;

    if iat > max_iat {
        tracing::debug!(
            target: "common.jwt",
            iat = iat,
            now = now,
            max_allowed = max_iat,
            "Token rejected: iat too far in the future"
        );
        return Err(JwtValidationError::IatTooFarInFuture);
    }

    Ok(())
}

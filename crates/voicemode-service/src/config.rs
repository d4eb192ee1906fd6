//! VoiceMode service configuration.
//!
//! Configuration is loaded once from environment variables at startup and is
//! immutable afterwards. The JWT secret is redacted in Debug output.

use common::jwt::{DEFAULT_CLOCK_SKEW, MAX_CLOCK_SKEW};
use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default LiveKit token server endpoint.
pub const DEFAULT_TOKEN_SERVER_URL: &str = "http://localhost:8081/token";

/// Default LiveKit connection URL returned when the token server omits one.
pub const DEFAULT_LIVEKIT_URL: &str = "ws://localhost:7880";

/// Default timeout for token server requests in seconds.
pub const DEFAULT_TOKEN_TIMEOUT_SECONDS: u64 = 10;

/// Default graceful shutdown drain period in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 30;

/// Lower bound on the whole-request timeout applied by the router.
pub const MIN_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Headroom the router timeout keeps above the token server timeout.
const REQUEST_TIMEOUT_HEADROOM_SECONDS: u64 = 5;

/// VoiceMode service configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Whether VoiceMode is enabled for this deployment.
    pub voicemode_enabled: bool,

    /// LiveKit token server endpoint that issues room tokens.
    pub token_server_url: String,

    /// Connection URL handed to clients when the token server does not supply one.
    pub livekit_url: String,

    /// Timeout for a single token server request, in seconds.
    pub token_timeout_seconds: u64,

    /// HS256 secret used to verify caller session tokens.
    pub jwt_secret: SecretString,

    /// JWT clock skew tolerance in seconds for `iat` validation.
    pub jwt_clock_skew_seconds: i64,

    /// Seconds to keep serving in-flight requests after a shutdown signal.
    pub drain_seconds: u64,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("voicemode_enabled", &self.voicemode_enabled)
            .field("token_server_url", &self.token_server_url)
            .field("livekit_url", &self.livekit_url)
            .field("token_timeout_seconds", &self.token_timeout_seconds)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_clock_skew_seconds", &self.jwt_clock_skew_seconds)
            .field("drain_seconds", &self.drain_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid boolean value: {0}")]
    InvalidBool(String),

    #[error("Invalid token server timeout configuration: {0}")]
    InvalidTokenTimeout(String),

    #[error("Invalid JWT clock skew configuration: {0}")]
    InvalidJwtClockSkew(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainSeconds(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let jwt_secret = vars
            .get("AUTH_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_JWT_SECRET".to_string()))?;
        let jwt_secret = SecretString::from(jwt_secret.clone());

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let voicemode_enabled = match vars.get("VOICEMODE_ENABLED") {
            Some(value) => parse_bool("VOICEMODE_ENABLED", value)?,
            None => false,
        };

        let token_server_url = vars
            .get("VOICEMODE_TOKEN_SERVER_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_TOKEN_SERVER_URL.to_string());

        let livekit_url = vars
            .get("LIVEKIT_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_LIVEKIT_URL.to_string());

        let token_timeout_seconds =
            if let Some(value_str) = vars.get("VOICEMODE_TOKEN_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidTokenTimeout(format!(
                        "VOICEMODE_TOKEN_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidTokenTimeout(
                        "VOICEMODE_TOKEN_TIMEOUT_SECONDS must be greater than 0".to_string(),
                    ));
                }

                value
            } else {
                DEFAULT_TOKEN_TIMEOUT_SECONDS
            };

        let jwt_clock_skew_seconds = if let Some(value_str) = vars.get("JWT_CLOCK_SKEW_SECONDS") {
            let value: i64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value <= 0 {
                return Err(ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must be positive, got {}",
                    value
                )));
            }

            if value > MAX_CLOCK_SKEW.as_secs() as i64 {
                return Err(ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must not exceed {} seconds, got {}",
                    MAX_CLOCK_SKEW.as_secs(),
                    value
                )));
            }

            value
        } else {
            DEFAULT_CLOCK_SKEW.as_secs() as i64
        };

        let drain_seconds = match vars.get("VOICEMODE_DRAIN_SECONDS") {
            Some(value_str) => value_str.parse().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!(
                    "VOICEMODE_DRAIN_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => DEFAULT_DRAIN_SECONDS,
        };

        Ok(Config {
            bind_address,
            voicemode_enabled,
            token_server_url,
            livekit_url,
            token_timeout_seconds,
            jwt_secret,
            jwt_clock_skew_seconds,
            drain_seconds,
        })
    }

    /// Timeout for a whole inbound request.
    ///
    /// Always exceeds the token server timeout so an upstream timeout is
    /// reported by the proxy as 503 before the router gives up on the request.
    pub fn request_timeout(&self) -> Duration {
        let seconds = self
            .token_timeout_seconds
            .saturating_add(REQUEST_TIMEOUT_HEADROOM_SECONDS)
            .max(MIN_REQUEST_TIMEOUT_SECONDS);
        Duration::from_secs(seconds)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool(format!(
            "{} must be true or false, got '{}'",
            name, value
        ))),
    }
}

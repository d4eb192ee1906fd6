//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports types from the [`secrecy`] crate. Use these for every value
//! that must never reach a log line: JWT signing secrets, bearer tokens,
//! and the LiveKit credentials returned by the token server.
//!
//! `SecretString` implements `Debug` with redaction, so any struct that
//! derives `Debug` while holding one stays safe to log. Secrets are zeroized
//! on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct AuthSettings {
//!     issuer: String,
//!     jwt_secret: SecretString,
//! }
//!
//! let settings = AuthSettings {
//!     issuer: "voicemode".to_string(),
//!     jwt_secret: SecretString::from("hunter2"),
//! };
//!
//! assert!(!format!("{settings:?}").contains("hunter2"));
//! assert_eq!(settings.jwt_secret.expose_secret(), "hunter2");
//! ```

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_debug_is_redacted() {
        let secret = SecretString::from("super-secret-signing-key");
        let debug = format!("{secret:?}");

        assert!(!debug.contains("super-secret-signing-key"));
    }

    #[test]
    fn test_secret_string_deserializes_from_json() {
        #[derive(Debug, serde::Deserialize)]
        struct Creds {
            key: SecretString,
        }

        let creds: Creds = serde_json::from_str(r#"{"key":"abc123"}"#).unwrap();
        assert_eq!(creds.key.expose_secret(), "abc123");
        assert!(!format!("{creds:?}").contains("abc123"));
    }
}

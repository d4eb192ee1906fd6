//! Builder for caller session tokens.
//!
//! Produces HS256 tokens accepted (or deliberately rejected) by
//! `JwtAuthenticator`.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

/// Builder for test session tokens.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("alice")
///     .with_role("admin")
///     .sign(TEST_JWT_SECRET);
/// ```
pub struct TestTokenBuilder {
    sub: String,
    role: String,
    exp: i64,
    iat: i64,
}

impl TestTokenBuilder {
    /// Create a new token builder for a verified "user" valid for an hour.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: "test-user".to_string(),
            role: "user".to_string(),
            exp: (now + Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Set the subject (user ID)
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    /// Set the account role
    pub fn with_role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }

    /// Set expiration in seconds from now (negative for an expired token)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Build the claims as a JSON value
    pub fn build(self) -> serde_json::Value {
        json!({
            "sub": self.sub,
            "role": self.role,
            "exp": self.exp,
            "iat": self.iat,
        })
    }

    /// Build and sign the token with HS256.
    pub fn sign(self, secret: &str) -> String {
        let claims = self.build();
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("Failed to sign test token")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! JWT validation for caller session tokens.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Only HS256 is accepted
//! - `exp` is enforced; `iat` is validated with clock skew tolerance
//! - Generic error messages prevent information leakage

use crate::auth::{Authenticator, Claims};
use crate::errors::VmError;
use async_trait::async_trait;
use common::jwt::{check_token_size, validate_iat};
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::time::Duration;
use tracing::instrument;

const INVALID_TOKEN_MESSAGE: &str = "The access token is invalid or expired";

/// Verifies HS256 session tokens signed with the shared secret.
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    clock_skew: Duration,
}

impl JwtAuthenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    ///
    /// * `secret` - Shared HS256 signing secret
    /// * `clock_skew_seconds` - Clock skew tolerance for iat validation
    pub fn new(secret: &SecretString, clock_skew_seconds: i64) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            clock_skew: Duration::from_secs(clock_skew_seconds.unsigned_abs()),
        }
    }

    /// Verify signature and expiry, returning the decoded claims.
    fn verify(&self, token: &str) -> Result<Claims, VmError> {
        check_token_size(token).map_err(|e| {
            tracing::debug!(target: "vm.auth.jwt", error = ?e, "Token pre-check failed");
            VmError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string())
        })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(target: "vm.auth.jwt", error = %e, "Token verification failed");
            VmError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string())
        })?;

        let claims = token_data.claims;

        if let Err(e) = validate_iat(claims.iat, self.clock_skew) {
            tracing::debug!(target: "vm.auth.jwt", error = ?e, "Token iat validation failed");
            return Err(VmError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string()));
        }

        Ok(claims)
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    #[instrument(skip_all, name = "vm.auth.authenticate")]
    async fn authenticate(&self, token: &str) -> Result<Claims, VmError> {
        let claims = self.verify(token)?;

        if !claims.is_verified() {
            tracing::debug!(target: "vm.auth.jwt", role = %claims.role, "Caller is not a verified user");
            return Err(VmError::Forbidden(
                "Your account is not permitted to use this feature".to_string(),
            ));
        }

        tracing::debug!(target: "vm.auth.jwt", "Token validated successfully");
        Ok(claims)
    }
}

//! Caller authentication.
//!
//! The `Authenticator` trait is the seam the auth middleware depends on.
//! `JwtAuthenticator` is the production implementation; tests may supply
//! their own.

pub mod claims;
pub mod jwt;

pub use claims::{Claims, VERIFIED_ROLES};
pub use jwt::JwtAuthenticator;

use crate::errors::VmError;
use async_trait::async_trait;

/// Verifies a bearer token and yields the caller's claims.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate a raw bearer token.
    ///
    /// # Errors
    ///
    /// - `VmError::InvalidToken` when the token cannot be verified
    /// - `VmError::Forbidden` when the caller is authenticated but not a verified user
    async fn authenticate(&self, token: &str) -> Result<Claims, VmError>;
}

//! Session token claims.
//!
//! The `sub` field is redacted in Debug output to keep user identifiers out
//! of logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles that count as a verified user.
pub const VERIFIED_ROLES: &[&str] = &["user", "admin"];

/// Claims carried by a caller's session token.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID) - redacted in Debug output.
    pub sub: String,

    /// Account role, e.g. "user", "admin" or "pending".
    pub role: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("role", &self.role)
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .finish()
    }
}

impl Claims {
    /// Whether the caller holds a role allowed to use VoiceMode.
    pub fn is_verified(&self) -> bool {
        VERIFIED_ROLES.contains(&self.role.as_str())
    }
}

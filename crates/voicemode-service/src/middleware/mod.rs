//! HTTP middleware layers.
//!
//! - `auth` - Verified-user authentication for protected routes
//! - `http_metrics` - Request/response metrics for all routes

pub mod auth;
pub mod http_metrics;

pub use auth::{require_verified_user, AuthState};
pub use http_metrics::http_metrics_middleware;

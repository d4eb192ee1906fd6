//! VoiceMode Service Library
//!
//! An authenticated proxy in front of a LiveKit token server:
//!
//! - Token proxy: forwards `{identity, room}` and relays `{token, url}`
//! - Config reporter: exposes the VoiceMode feature flag and LiveKit URL
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs -> handlers/*.rs -> services/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Authenticator trait and JWT implementation
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Auth and metrics middleware
//! - `models` - Request/response models
//! - `observability` - Prometheus metrics
//! - `routes` - Axum router setup
//! - `services` - Token server client

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;

//! Service layer for the VoiceMode service.
//!
//! - `token_server` - HTTP client for the LiveKit token server

pub mod token_server;

pub use token_server::TokenServerClient;

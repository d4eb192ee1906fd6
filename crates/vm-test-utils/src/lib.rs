//! # VoiceMode Test Utilities
//!
//! Shared test utilities for the VoiceMode service:
//! - Server test harness (`TestVoiceModeServer`)
//! - Session token builder (`TestTokenBuilder`)
//! - Typed API client (`VoiceModeClient`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vm_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestVoiceModeServer::builder().enabled(true).spawn().await?;
//!     let client = VoiceModeClient::new(server.url());
//!     let token = TestTokenBuilder::new().sign(TEST_JWT_SECRET);
//!
//!     let config = client.get_voicemode_config(&token).await?;
//!     assert!(config.enabled);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod server_harness;
pub mod token_builders;

pub use client::*;
pub use server_harness::*;
pub use token_builders::*;

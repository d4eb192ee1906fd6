//! HTTP request handlers for the VoiceMode service.

pub mod health;
pub mod metrics;
pub mod voicemode;

pub use health::health_check;
pub use metrics::metrics_handler;
pub use voicemode::{get_config, issue_token};

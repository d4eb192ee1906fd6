//! Observability for the VoiceMode service.
//!
//! - `metrics` - Prometheus metric definitions

pub mod metrics;

//! Metrics definitions for the VoiceMode service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `vm_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: the known routes, everything else is `/other`
//! - `status`: success, error, timeout
//! - `error_type`: bounded by `VmError` variants

use metrics::{counter, histogram};
use std::time::Duration;

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `vm_http_requests_total`, `vm_http_request_duration_seconds`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("vm_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("vm_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path onto a bounded set of endpoint labels.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/api/v1/voicemode/token" => "/api/v1/voicemode/token",
        "/api/v1/voicemode/config" => "/api/v1/voicemode/config",
        _ => "/other",
    }
}

// ============================================================================
// Token Proxy Metrics
// ============================================================================

/// Record a token proxy outcome.
///
/// Metric: `vm_token_requests_total`, `vm_token_request_duration_seconds`
/// Labels: `status` (success/error), `error_type` (`none` on success)
pub fn record_token_request(status: &str, error_type: Option<&str>, duration: Duration) {
    let error_type = error_type.unwrap_or("none");

    histogram!("vm_token_request_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("vm_token_requests_total",
        "status" => status.to_string(),
        "error_type" => error_type.to_string()
    )
    .increment(1);
}

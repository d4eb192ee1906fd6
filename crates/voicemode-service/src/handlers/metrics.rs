//! Prometheus metrics endpoint handler.
//!
//! Unauthenticated so Prometheus can scrape it. Only bounded operational
//! labels are exported; identities and rooms never appear in metrics.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
#[tracing::instrument(skip_all, name = "vm.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}

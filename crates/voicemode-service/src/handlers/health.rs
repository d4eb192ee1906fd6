//! Liveness probe.

use tracing::instrument;

/// Handler for GET /health
///
/// Returns plain text "OK". The service has no backing store, so liveness
/// is simply "the process answers HTTP".
#[instrument(skip_all, name = "vm.health.check")]
pub async fn health_check() -> &'static str {
    "OK"
}

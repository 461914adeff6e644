use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report the degraded flag while logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        Err(_) => warn!("storage unavailable (degraded mode)"),
    }

    let subscribers = state.sse().subscriber_count();
    if state.is_degraded() {
        HealthResponse::degraded(subscribers)
    } else {
        HealthResponse::ok(subscribers)
    }
}

use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of open SSE connections.
    pub live_subscribers: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(live_subscribers: usize) -> Self {
        Self {
            status: "ok".to_string(),
            live_subscribers,
        }
    }

    /// Create a health response indicating the system is in degraded mode.
    pub fn degraded(live_subscribers: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            live_subscribers,
        }
    }
}

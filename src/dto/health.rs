use std::time::SystemTime;

use serde::Serialize;
use utoipa::ToSchema;

use super::format_system_time;

/// Overall backend condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    /// The match store failed its health check; draws will likely answer 503.
    Degraded,
}

/// Payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Draws currently being persisted or broadcast.
    pub draws_in_flight: usize,
    /// RFC 3339 time the report was built.
    pub timestamp: String,
    /// Deployment label from the configuration, e.g. `production`.
    pub environment: String,
}

impl HealthResponse {
    pub fn new(storage_healthy: bool, draws_in_flight: usize, environment: &str) -> Self {
        let status = if storage_healthy {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        };
        Self {
            status,
            draws_in_flight,
            timestamp: format_system_time(SystemTime::now()),
            environment: environment.to_string(),
        }
    }
}

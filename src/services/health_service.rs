use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the match store and report whether draws can currently be persisted.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let healthy = match state.match_store().health_check().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            false
        }
    };

    HealthResponse::new(healthy, state.draws_in_flight(), state.environment())
}

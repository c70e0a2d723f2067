use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dto::{matches::TeamAssignmentResponse, sse::ServerEvent},
    state::SharedState,
};

pub const EVENT_TEAMS_DRAWN: &str = "teams.drawn";

/// Broadcast a freshly persisted draw to the subscribers of its match.
pub fn broadcast_teams_drawn(
    state: &SharedState,
    match_id: Uuid,
    teams: &TeamAssignmentResponse,
) {
    send_match_event(state, match_id, EVENT_TEAMS_DRAWN, teams);
}

fn send_match_event(state: &SharedState, match_id: Uuid, event: &str, payload: &impl Serialize) {
    // No hub means nobody is subscribed to this match right now.
    let Some(hub) = state.existing_match_sse(match_id) else {
        debug!(%match_id, event, "no match subscribers; skipping SSE event");
        return;
    };
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(%match_id, event, error = %err, "failed to serialize match SSE payload"),
    }
}

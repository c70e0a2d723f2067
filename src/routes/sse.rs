use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;
use uuid::Uuid;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/matches/{id}",
    tag = "sse",
    params(("id" = Uuid, Path, description = "Identifier of the match to follow")),
    responses((status = 200, description = "Match SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream the draws of one match to connected frontends.
pub async fn match_stream(
    State(state): State<SharedState>,
    Path(match_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_match(&state, match_id);
    info!(%match_id, "New match SSE connection");
    sse_service::broadcast_match_info(&state, &state.match_sse(match_id), match_id).await;
    sse_service::to_sse_stream(receiver, state, match_id)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/matches/{id}", get(match_stream))
}

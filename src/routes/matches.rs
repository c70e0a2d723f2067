use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::matches::{DrawRequest, TeamAssignmentResponse},
    error::AppError,
    services::{draw_service, match_service},
    state::SharedState,
};

/// Routes handling match team draws.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/matches/{id}/draw", post(draw_teams))
        .route("/matches/{id}/teams", get(get_teams))
}

/// Draw balanced teams from the confirmed attendees of a match.
#[utoipa::path(
    post,
    path = "/matches/{id}/draw",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    request_body = DrawRequest,
    responses(
        (status = 200, description = "Teams drawn and broadcast", body = TeamAssignmentResponse),
        (status = 400, description = "Invalid attendees, configuration or too few players"),
        (status = 409, description = "Another draw for this match is in progress"),
        (status = 422, description = "Not enough goalkeepers under the hard constraint"),
        (status = 503, description = "Storage unavailable or timed out")
    )
)]
pub async fn draw_teams(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DrawRequest>,
) -> Result<Json<TeamAssignmentResponse>, AppError> {
    payload.validate()?;
    let teams = draw_service::draw_teams(&state, id, payload).await?;
    Ok(Json(teams))
}

/// Fetch the latest drawn teams of a match.
#[utoipa::path(
    get,
    path = "/matches/{id}/teams",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    responses(
        (status = 200, description = "Latest drawn teams", body = TeamAssignmentResponse),
        (status = 404, description = "No teams drawn yet")
    )
)]
pub async fn get_teams(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamAssignmentResponse>, AppError> {
    let teams = match_service::find_teams(&state, id).await?;
    Ok(Json(teams))
}

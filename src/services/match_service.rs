use uuid::Uuid;

use crate::{dto::matches::TeamAssignmentResponse, error::ServiceError, state::SharedState};

/// Latest drawn teams of a match.
pub async fn find_teams(
    state: &SharedState,
    match_id: Uuid,
) -> Result<TeamAssignmentResponse, ServiceError> {
    let Some(teams) = state.match_store().find_teams(match_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "no teams drawn for match `{match_id}`"
        )));
    };
    Ok(teams.into())
}

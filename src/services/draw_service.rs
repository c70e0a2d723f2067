use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    balancer,
    dao::models::MatchTeamsEntity,
    dto::matches::{DrawRequest, TeamAssignmentResponse},
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

/// Draw balanced teams for a match, persist them and notify the match subscribers.
///
/// Only one draw per match runs at a time. Nothing is stored or broadcast unless the
/// balancer succeeds, and the broadcast happens only once the store accepted the teams.
pub async fn draw_teams(
    state: &SharedState,
    match_id: Uuid,
    request: DrawRequest,
) -> Result<TeamAssignmentResponse, ServiceError> {
    let _guard = state.claim_draw(match_id)?;

    let pool = request.pool()?;
    let config = request.draw_config(state.draw_defaults());
    debug!(
        %match_id,
        attendees = pool.len(),
        teams = config.teams,
        seeded = config.seed.is_some(),
        "drawing teams"
    );

    let assignment = balancer::draw(&pool, &config).inspect_err(|err| {
        if pool.is_empty() {
            warn!(%match_id, error = %err, "draw refused: no confirmed attendees");
        } else {
            warn!(%match_id, attendees = pool.len(), error = %err, "draw refused");
        }
    })?;

    if assignment.goalkeeper_constraint_relaxed {
        warn!(
            %match_id,
            available = assignment.goalkeepers_available,
            required = assignment.goalkeepers_required,
            "not enough goalkeepers; some teams play without one"
        );
    }

    let entity = MatchTeamsEntity::from_assignment(match_id, &assignment, &request.names());
    let work = persist_and_broadcast(state, entity);
    let response = match state.draw_timeout() {
        Some(limit) => match timeout(limit, work).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(%match_id, ?limit, "persisting drawn teams timed out");
                return Err(ServiceError::Timeout);
            }
        },
        None => work.await?,
    };

    info!(
        %match_id,
        draw_id = %response.draw_id,
        attendees = assignment.total_members(),
        keepers = ?keepers_per_team(&assignment),
        spread = assignment.score_spread(),
        "teams drawn"
    );
    Ok(response)
}

fn keepers_per_team(assignment: &balancer::TeamAssignment) -> Vec<usize> {
    assignment
        .teams
        .iter()
        .map(|team| team.goalkeepers().count())
        .collect()
}

async fn persist_and_broadcast(
    state: &SharedState,
    entity: MatchTeamsEntity,
) -> Result<TeamAssignmentResponse, ServiceError> {
    let match_id = entity.match_id;
    state
        .match_store()
        .save_teams(entity.clone())
        .await
        .inspect_err(|err| warn!(%match_id, error = %err, "failed to persist drawn teams"))?;

    let response = TeamAssignmentResponse::from(entity);
    sse_events::broadcast_teams_drawn(state, match_id, &response);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use futures::future::BoxFuture;
    use tokio::sync::Notify;

    use super::*;
    use crate::{
        balancer::DrawError,
        config::AppConfig,
        dao::{
            match_store::{InMemoryMatchStore, MatchStore},
            storage::{StorageError, StorageResult, StoreOperation},
        },
        dto::matches::{AttendeeInput, DrawConfigInput, SkillsInput},
        services::match_service,
        state::AppState,
    };

    fn attendee(id: &str, shooting: f64, goalkeeping: f64) -> AttendeeInput {
        AttendeeInput {
            id: id.to_string(),
            name: Some(id.to_uppercase()),
            preferred_position: None,
            skills: SkillsInput {
                shooting,
                passing: 5.0,
                dribbling: 5.0,
                defense: 5.0,
                physical: 5.0,
                goalkeeping,
            },
        }
    }

    fn request() -> DrawRequest {
        DrawRequest {
            attendees: vec![
                attendee("ana", 9.0, 8.0),
                attendee("bia", 7.0, 2.0),
                attendee("caio", 6.0, 7.0),
                attendee("duda", 4.0, 1.0),
            ],
            config: Some(DrawConfigInput {
                seed: Some(balancer::DrawSeed::Number(3)),
                ..DrawConfigInput::default()
            }),
        }
    }

    /// Store that fails every write.
    struct FailingStore;

    impl MatchStore for FailingStore {
        fn save_teams(&self, _teams: MatchTeamsEntity) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async {
                Err(StorageError::unavailable(
                    StoreOperation::SaveTeams,
                    "offline",
                    std::io::Error::other("connection refused"),
                ))
            })
        }

        fn find_teams(
            &self,
            _match_id: Uuid,
        ) -> BoxFuture<'static, StorageResult<Option<MatchTeamsEntity>>> {
            Box::pin(async { Ok(None) })
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    /// Store whose writes wait until the test releases them.
    #[derive(Clone)]
    struct GatedStore {
        gate: Arc<Notify>,
        inner: InMemoryMatchStore,
    }

    impl MatchStore for GatedStore {
        fn save_teams(&self, teams: MatchTeamsEntity) -> BoxFuture<'static, StorageResult<()>> {
            let store = self.clone();
            Box::pin(async move {
                store.gate.notified().await;
                store.inner.save_teams(teams).await
            })
        }

        fn find_teams(
            &self,
            match_id: Uuid,
        ) -> BoxFuture<'static, StorageResult<Option<MatchTeamsEntity>>> {
            self.inner.find_teams(match_id)
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.health_check()
        }
    }

    #[tokio::test]
    async fn successful_draw_is_persisted_and_broadcast() {
        let state = AppState::in_memory();
        let match_id = Uuid::new_v4();
        let mut events = state.match_sse(match_id).subscribe();

        let response = draw_teams(&state, match_id, request()).await.unwrap();
        assert_eq!(response.teams.len(), 2);
        assert_eq!(
            response.teams.iter().map(|team| team.size).sum::<usize>(),
            4
        );
        assert!(!response.goalkeeper_constraint_relaxed);

        let stored = match_service::find_teams(&state, match_id).await.unwrap();
        assert_eq!(stored.draw_id, response.draw_id);

        let event = events.try_recv().unwrap();
        assert_eq!(event.event.as_deref(), Some(sse_events::EVENT_TEAMS_DRAWN));
        assert!(event.data.contains(&response.draw_id.to_string()));
        assert!(event.data.contains("\"name\":\"ANA\""));
        assert!(!state.is_draw_in_flight(match_id));
    }

    #[tokio::test]
    async fn same_seed_redraw_gives_same_teams() {
        let state = AppState::in_memory();
        let match_id = Uuid::new_v4();

        let first = draw_teams(&state, match_id, request()).await.unwrap();
        let second = draw_teams(&state, match_id, request()).await.unwrap();
        assert_ne!(first.draw_id, second.draw_id);
        let ids = |response: &TeamAssignmentResponse| {
            response
                .teams
                .iter()
                .map(|team| team.members.iter().map(|m| m.id.clone()).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn refused_draw_is_neither_stored_nor_broadcast() {
        let state = AppState::in_memory();
        let match_id = Uuid::new_v4();
        let mut events = state.match_sse(match_id).subscribe();

        let mut payload = request();
        payload.config = Some(DrawConfigInput {
            hard_goalkeeper_constraint: Some(true),
            goalkeeper_threshold: Some(9.5),
            ..DrawConfigInput::default()
        });

        let err = draw_teams(&state, match_id, payload).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Draw(DrawError::GoalkeeperShortage {
                available: 0,
                required: 2
            })
        ));
        assert!(matches!(
            match_service::find_teams(&state, match_id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(events.try_recv().is_err());
        assert!(!state.is_draw_in_flight(match_id));
    }

    #[tokio::test]
    async fn empty_attendee_list_is_refused() {
        let state = AppState::in_memory();
        let mut payload = request();
        payload.attendees.clear();

        let err = draw_teams(&state, Uuid::new_v4(), payload)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Draw(DrawError::InsufficientPlayers {
                available: 0,
                required: 2
            })
        ));
    }

    #[tokio::test]
    async fn duplicate_attendee_is_invalid_input() {
        let state = AppState::in_memory();
        let mut payload = request();
        payload.attendees.push(attendee("ana", 1.0, 1.0));

        let err = draw_teams(&state, Uuid::new_v4(), payload)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn storage_failure_broadcasts_nothing() {
        let state = AppState::new(&AppConfig::default(), Arc::new(FailingStore));
        let match_id = Uuid::new_v4();
        let mut events = state.match_sse(match_id).subscribe();

        let err = draw_teams(&state, match_id, request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_store_refuses_draw_for_new_match() {
        let store = InMemoryMatchStore::with_capacity(1);
        let state = AppState::new(&AppConfig::default(), Arc::new(store));
        let kept = Uuid::new_v4();
        draw_teams(&state, kept, request()).await.unwrap();

        let err = draw_teams(&state, Uuid::new_v4(), request()).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Unavailable(StorageError::CapacityExceeded { limit: 1 })
        ));
        assert!(draw_teams(&state, kept, request()).await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_draw_for_same_match_is_rejected() {
        let gate = Arc::new(Notify::new());
        let store = GatedStore {
            gate: gate.clone(),
            inner: InMemoryMatchStore::new(),
        };
        let state = AppState::new(&AppConfig::default(), Arc::new(store));
        let match_id = Uuid::new_v4();

        let pending = tokio::spawn({
            let state = state.clone();
            async move { draw_teams(&state, match_id, request()).await }
        });
        while !state.is_draw_in_flight(match_id) {
            tokio::task::yield_now().await;
        }

        let err = draw_teams(&state, match_id, request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::DrawInProgress(id) if id == match_id));

        gate.notify_one();
        let first = pending.await.unwrap().unwrap();
        assert_eq!(first.match_id, match_id);
        assert!(!state.is_draw_in_flight(match_id));
    }

    #[tokio::test]
    async fn slow_store_times_out_and_releases_match() {
        let store = GatedStore {
            gate: Arc::new(Notify::new()),
            inner: InMemoryMatchStore::new(),
        };
        let config = AppConfig {
            draw_timeout: Some(Duration::from_millis(20)),
            ..AppConfig::default()
        };
        let state = AppState::new(&config, Arc::new(store));
        let match_id = Uuid::new_v4();
        let mut events = state.match_sse(match_id).subscribe();

        let err = draw_teams(&state, match_id, request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Timeout));
        assert!(events.try_recv().is_err());
        assert!(!state.is_draw_in_flight(match_id));
    }
}

mod sse;

use std::{sync::Arc, time::Duration};

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    balancer::DrawConfig,
    config::AppConfig,
    dao::match_store::{InMemoryMatchStore, MatchStore},
    dto::sse::ServerEvent,
    error::ServiceError,
};

pub use self::sse::SseHub;
use self::sse::SseState;

pub type SharedState = Arc<AppState>;

/// Central application state: storage handle, match SSE hubs and the in-flight draw registry.
pub struct AppState {
    match_store: Arc<dyn MatchStore>,
    sse: SseState,
    draws_in_flight: DashMap<Uuid, ()>,
    draw_defaults: DrawConfig,
    draw_timeout: Option<Duration>,
    environment: String,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: &AppConfig, match_store: Arc<dyn MatchStore>) -> SharedState {
        Arc::new(Self {
            match_store,
            sse: SseState::new(config.sse_capacity),
            draws_in_flight: DashMap::new(),
            draw_defaults: config.draw_config(),
            draw_timeout: config.draw_timeout,
            environment: config.environment.clone(),
        })
    }

    /// State with default configuration and an empty in-memory store.
    pub fn in_memory() -> SharedState {
        Self::new(&AppConfig::default(), Arc::new(InMemoryMatchStore::new()))
    }

    pub fn match_store(&self) -> Arc<dyn MatchStore> {
        self.match_store.clone()
    }

    /// Broadcast hub of one match, created on first use.
    pub fn match_sse(&self, match_id: Uuid) -> SseHub {
        self.sse.hub(match_id)
    }

    /// New receiver on the hub of one match.
    pub fn subscribe_match_sse(&self, match_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.sse.subscribe(match_id)
    }

    /// Broadcast hub of one match, without creating it.
    pub fn existing_match_sse(&self, match_id: Uuid) -> Option<SseHub> {
        self.sse.existing_hub(match_id)
    }

    /// Forget the hub of a match whose last subscriber left.
    pub fn release_match_sse(&self, match_id: Uuid) -> bool {
        self.sse.release(match_id)
    }

    /// Number of matches with a live SSE hub.
    pub fn match_hubs(&self) -> usize {
        self.sse.len()
    }

    /// Draw settings every request starts from.
    pub fn draw_defaults(&self) -> &DrawConfig {
        &self.draw_defaults
    }

    /// Upper bound on persisting and broadcasting a draw; `None` waits indefinitely.
    pub fn draw_timeout(&self) -> Option<Duration> {
        self.draw_timeout
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Reserve the draw slot of `match_id`, failing if another draw for it is still running.
    ///
    /// The slot is released when the returned guard is dropped.
    pub fn claim_draw(&self, match_id: Uuid) -> Result<DrawGuard<'_>, ServiceError> {
        match self.draws_in_flight.entry(match_id) {
            Entry::Occupied(_) => Err(ServiceError::DrawInProgress(match_id)),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(DrawGuard {
                    registry: &self.draws_in_flight,
                    match_id,
                })
            }
        }
    }

    pub fn is_draw_in_flight(&self, match_id: Uuid) -> bool {
        self.draws_in_flight.contains_key(&match_id)
    }

    pub fn draws_in_flight(&self) -> usize {
        self.draws_in_flight.len()
    }
}

/// Held for the lifetime of one draw; releases the match slot on drop.
#[must_use]
pub struct DrawGuard<'a> {
    registry: &'a DashMap<Uuid, ()>,
    match_id: Uuid,
}

impl Drop for DrawGuard<'_> {
    fn drop(&mut self) {
        self.registry.remove(&self.match_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_for_same_match_is_refused() {
        let state = AppState::in_memory();
        let match_id = Uuid::new_v4();

        let guard = state.claim_draw(match_id).unwrap();
        assert!(matches!(
            state.claim_draw(match_id),
            Err(ServiceError::DrawInProgress(id)) if id == match_id
        ));
        assert!(state.claim_draw(Uuid::new_v4()).is_ok());

        drop(guard);
        assert!(!state.is_draw_in_flight(match_id));
        assert!(state.claim_draw(match_id).is_ok());
    }

    #[test]
    fn match_hubs_are_isolated() {
        let state = AppState::in_memory();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let mut receiver = state.match_sse(first).subscribe();
        state
            .match_sse(second)
            .broadcast(ServerEvent::new(Some("info".into()), "x".into()));
        assert!(receiver.try_recv().is_err());
        assert_eq!(state.match_sse(first).subscriber_count(), 1);
        assert!(state.existing_match_sse(Uuid::new_v4()).is_none());
    }

    #[test]
    fn zero_draw_timeout_is_kept_as_none() {
        let config = AppConfig::parse(r#"{"draw_timeout_ms": 0}"#).unwrap();
        let state = AppState::new(&config, Arc::new(InMemoryMatchStore::new()));
        assert_eq!(state.draw_timeout(), None);
        assert_eq!(
            AppState::in_memory().draw_timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn hub_is_released_only_without_subscribers() {
        let state = AppState::in_memory();
        let match_id = Uuid::new_v4();

        let receiver = state.subscribe_match_sse(match_id);
        assert!(!state.release_match_sse(match_id));
        assert!(state.existing_match_sse(match_id).is_some());

        drop(receiver);
        assert!(state.release_match_sse(match_id));
        assert!(state.existing_match_sse(match_id).is_none());
        assert_eq!(state.match_hubs(), 0);
    }
}

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::dto::sse::ServerEvent;

/// SSE-specific sub-state carved out from [`AppState`](super::AppState): one hub per match.
pub struct SseState {
    capacity: usize,
    matches: DashMap<Uuid, SseHub>,
}

impl SseState {
    /// Build the SSE sub-tree; every match hub gets the same channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            matches: DashMap::new(),
        }
    }

    /// Hub of `match_id`, created on first use.
    pub fn hub(&self, match_id: Uuid) -> SseHub {
        self.matches
            .entry(match_id)
            .or_insert_with(|| SseHub::new(self.capacity))
            .clone()
    }

    /// Subscribe to `match_id`, creating its hub if needed. The map entry stays locked until
    /// the receiver exists, so [`SseState::release`] cannot drop the hub in between.
    pub fn subscribe(&self, match_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.matches
            .entry(match_id)
            .or_insert_with(|| SseHub::new(self.capacity))
            .subscribe()
    }

    /// Hub of `match_id` while it still has subscribers.
    pub fn existing_hub(&self, match_id: Uuid) -> Option<SseHub> {
        self.matches.get(&match_id).map(|hub| hub.clone())
    }

    /// Drop the hub of `match_id` once nobody listens to it. Returns whether it was removed.
    pub fn release(&self, match_id: Uuid) -> bool {
        self.matches
            .remove_if(&match_id, |_, hub| hub.subscriber_count() == 0)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// Simple broadcast hub wrapper used by the SSE services.
#[derive(Clone)]
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

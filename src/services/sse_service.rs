use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;
use uuid::Uuid;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    dto::sse::{Handshake, ServerEvent},
    state::{SharedState, SseHub},
};

/// Subscribe to the SSE stream of one match.
pub fn subscribe_match(state: &SharedState, match_id: Uuid) -> broadcast::Receiver<ServerEvent> {
    state.subscribe_match_sse(match_id)
}

/// Convert a broadcast receiver into an SSE response, forwarding events and
/// releasing the match hub once its last client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    state: SharedState,
    match_id: Uuid,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from broadcast and pushes into mpsc
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Clients can refetch the teams; keep the stream alive.
                            warn!(%match_id, skipped, "match SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        // The hub only counts as idle once this receiver is gone.
        drop(receiver);
        if state.release_match_sse(match_id) {
            tracing::debug!(%match_id, "released idle match SSE hub");
        }
        tracing::info!(%match_id, "Match SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Greet the subscribers of a match hub, telling them whether teams can already be fetched.
pub async fn broadcast_match_info(state: &SharedState, hub: &SseHub, match_id: Uuid) {
    let teams_available = match state.match_store().find_teams(match_id).await {
        Ok(found) => found.is_some(),
        Err(err) => {
            warn!(%match_id, error = %err, "failed to look up drawn teams for SSE greeting");
            false
        }
    };
    let handshake = Handshake {
        match_id,
        message: "match stream connected".into(),
        teams_available,
    };
    match ServerEvent::json(Some("info".to_string()), &handshake) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(%match_id, error = %err, "failed to serialize SSE greeting"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn closed_stream_releases_idle_hub() {
        let state = AppState::in_memory();
        let match_id = Uuid::new_v4();

        let receiver = subscribe_match(&state, match_id);
        let sse = to_sse_stream(receiver, state.clone(), match_id);
        assert!(state.existing_match_sse(match_id).is_some());

        drop(sse);
        tokio::time::timeout(Duration::from_secs(1), async {
            while state.existing_match_sse(match_id).is_some() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("hub should be released after the client left");
        assert_eq!(state.match_hubs(), 0);
    }

    #[tokio::test]
    async fn greeting_reaches_new_subscriber() {
        let state = AppState::in_memory();
        let match_id = Uuid::new_v4();
        let mut receiver = subscribe_match(&state, match_id);

        broadcast_match_info(&state, &state.match_sse(match_id), match_id).await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("info"));
        assert!(event.data.contains("\"teams_available\":false"));
    }
}

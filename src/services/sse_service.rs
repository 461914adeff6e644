use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dto::sse::{Handshake, ServerEvent},
    state::{SharedState, SseHub},
};

/// Identifies the target SSE stream so the forwarder only relays the events that
/// belong to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    /// Leaderboard, lifecycle, chat and status events.
    Public,
    /// Scorecard updates of a single game.
    Game(Uuid),
}

impl StreamKind {
    /// Whether `event` is delivered on this stream.
    pub fn accepts(&self, event: &ServerEvent) -> bool {
        match self {
            StreamKind::Public => event.game_id.is_none(),
            StreamKind::Game(id) => event.game_id == Some(*id),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StreamKind::Public => "public",
            StreamKind::Game(_) => "game",
        }
    }
}

/// Subscribe to the shared broadcast hub.
pub fn subscribe(state: &SharedState) -> broadcast::Receiver<ServerEvent> {
    state.sse().subscribe()
}

/// Build the handshake event sent first on every new stream.
pub fn handshake(state: &SharedState, kind: StreamKind) -> Option<ServerEvent> {
    let message = match kind {
        StreamKind::Public => "public stream connected".to_string(),
        StreamKind::Game(id) => format!("game {id} stream connected"),
    };
    let payload = Handshake {
        stream: kind.label().to_string(),
        message,
        degraded: state.is_degraded(),
    };
    ServerEvent::json(Some("handshake".to_string()), &payload).ok()
}

/// Convert a broadcast receiver into an SSE response, forwarding events and
/// cleaning up once the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    kind: StreamKind,
    greeting: Option<ServerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from broadcast and pushes into mpsc
    tokio::spawn(async move {
        if let Some(greeting) = greeting {
            if tx.send(Ok(to_event(greeting))).await.is_err() {
                return;
            }
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if !kind.accepts(&payload) {
                                continue;
                            }
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Every snapshot is complete, the next one catches up.
                            debug!(skipped, stream = kind.label(), "SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        match kind {
            StreamKind::Public => info!("Public SSE stream disconnected"),
            StreamKind::Game(game_id) => info!(%game_id, "Game SSE stream disconnected"),
        }
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_event(payload: ServerEvent) -> Event {
    let mut event = Event::default().data(payload.data);
    if let Some(name) = payload.event {
        event = event.event(name);
    }
    event
}

/// Send a human-readable info message onto the public SSE stream.
pub fn broadcast_public_info(hub: &SseHub, message: &str) {
    hub.broadcast(ServerEvent::new(
        Some("info".to_string()),
        message.to_string(),
    ));
}

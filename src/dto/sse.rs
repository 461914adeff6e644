use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{chat::ChatMessage, game::GameSummary, leaderboard::LeaderboardResponse};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
    /// Game the event is scoped to; `None` for events of the public stream.
    pub game_id: Option<Uuid>,
}

impl ServerEvent {
    /// Build an event with a raw data field.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self {
            event,
            data,
            game_id: None,
        }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
            game_id: None,
        })
    }

    /// Scope the event to a single game stream.
    pub fn for_game(mut self, game_id: Uuid) -> Self {
        self.game_id = Some(game_id);
        self
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream (`public` or `game`).
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast after every score change with the complete live leaderboard.
pub struct LeaderboardUpdatedEvent(pub LeaderboardResponse);

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a scorekeeper starts a game.
pub struct GameCreatedEvent {
    pub game: GameSummary,
    pub team_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a game reaches its terminal state.
pub struct GameCompletedEvent {
    pub game: GameSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Event emitted for every posted chat message.
pub struct ChatMessageEvent(pub ChatMessage);

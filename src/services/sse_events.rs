use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        chat::ChatMessage,
        game::{GameScorecard, GameSummary},
        leaderboard::LeaderboardResponse,
        sse::{
            ChatMessageEvent, GameCompletedEvent, GameCreatedEvent, LeaderboardUpdatedEvent,
            ServerEvent, SystemStatus,
        },
    },
    state::SharedState,
};

pub const EVENT_SYSTEM_STATUS: &str = "system.status";
pub const EVENT_LEADERBOARD_UPDATED: &str = "leaderboard.updated";
pub const EVENT_SCORES_UPDATED: &str = "scores.updated";
pub const EVENT_GAME_CREATED: &str = "game.created";
pub const EVENT_GAME_COMPLETED: &str = "game.completed";
pub const EVENT_CHAT_MESSAGE: &str = "chat.message";

/// Broadcast the degraded flag to public subscribers.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_public_event(state, EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
}

/// Broadcast a full snapshot of the live leaderboard.
pub fn broadcast_leaderboard(state: &SharedState, leaderboard: LeaderboardResponse) {
    send_public_event(
        state,
        EVENT_LEADERBOARD_UPDATED,
        &LeaderboardUpdatedEvent(leaderboard),
    );
}

/// Broadcast a game's scorecard to the subscribers of that game.
pub fn broadcast_scores_updated(state: &SharedState, scorecard: &GameScorecard) {
    send_game_event(state, scorecard.game.id, EVENT_SCORES_UPDATED, scorecard);
}

/// Broadcast that a scorekeeper started a game.
pub fn broadcast_game_created(state: &SharedState, game: GameSummary, team_name: String) {
    let payload = GameCreatedEvent { game, team_name };
    send_public_event(state, EVENT_GAME_CREATED, &payload);
}

/// Broadcast that a game is over, on the public stream and on the game's own stream.
pub fn broadcast_game_completed(state: &SharedState, game: GameSummary) {
    let game_id = game.id;
    let payload = GameCompletedEvent { game };
    send_public_event(state, EVENT_GAME_COMPLETED, &payload);
    send_game_event(state, game_id, EVENT_GAME_COMPLETED, &payload);
}

/// Broadcast a freshly posted chat message.
pub fn broadcast_chat_message(state: &SharedState, message: ChatMessage) {
    send_public_event(state, EVENT_CHAT_MESSAGE, &ChatMessageEvent(message));
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}

fn send_game_event(state: &SharedState, game_id: Uuid, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event.for_game(game_id)),
        Err(err) => warn!(event, %game_id, error = %err, "failed to serialize game SSE payload"),
    }
}

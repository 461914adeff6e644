use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::{Event, Sse},
    routing::get,
};
use futures::Stream;
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::sse::ServerEvent,
    error::AppError,
    services::{
        game_service,
        sse_events::EVENT_SCORES_UPDATED,
        sse_service::{self, StreamKind},
    },
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/public",
    tag = "sse",
    responses((status = 200, description = "Public SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream leaderboard, lifecycle, chat and status events.
pub async fn public_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = sse_service::subscribe(&state);
    info!("New public SSE connection");
    sse_service::broadcast_public_info(state.sse(), "public stream connected");
    let greeting = sse_service::handshake(&state, StreamKind::Public);
    sse_service::to_sse_stream(receiver, StreamKind::Public, greeting)
}

#[utoipa::path(
    get,
    path = "/sse/games/{id}",
    tag = "sse",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Scorecard updates of one game", content_type = "text/event-stream", body = String),
        (status = 404, description = "Unknown game")
    )
)]
/// Stream scorecard snapshots of one game, starting with the current one.
pub async fn game_stream(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // subscribe before reading so no update falls between snapshot and stream
    let receiver = sse_service::subscribe(&state);
    let scorecard = game_service::get_scorecard(&state, id).await?;
    info!(game_id = %id, "New game SSE connection");

    let greeting = ServerEvent::json(Some(EVENT_SCORES_UPDATED.to_string()), &scorecard)
        .ok()
        .map(|event| event.for_game(id));
    Ok(sse_service::to_sse_stream(
        receiver,
        StreamKind::Game(id),
        greeting,
    ))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/sse/public", get(public_stream))
        .route("/sse/games/{id}", get(game_stream))
}

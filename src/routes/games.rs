use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::game::{CreateGameRequest, GameListQuery, GameScorecard, GameSummary, SaveHoleRequest},
    error::AppError,
    routes::identity::CallerId,
    services::{game_service, score_service},
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    params(("X-User-Id" = String, Header, description = "Authenticated scorekeeper id")),
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game started", body = GameSummary),
        (status = 400, description = "Unsupported game length"),
        (status = 403, description = "Caller is not a scorekeeper"),
        (status = 409, description = "Caller has no team")
    )
)]
/// Start a new game for the caller's team.
pub async fn create_game(
    State(state): State<SharedState>,
    CallerId(caller): CallerId,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameSummary>), AppError> {
    let game = game_service::create_game(&state, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(GameListQuery),
    responses((status = 200, description = "Games, newest first", body = [GameSummary]))
)]
/// List games, optionally filtered by activity or team.
pub async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<GameListQuery>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    let games = game_service::list_games(&state, query).await?;
    Ok(Json(games))
}

#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game scorecard", body = GameScorecard),
        (status = 404, description = "Unknown game")
    )
)]
/// Return the scorecard of a game.
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameScorecard>, AppError> {
    let scorecard = game_service::get_scorecard(&state, id).await?;
    Ok(Json(scorecard))
}

#[utoipa::path(
    put,
    path = "/games/{id}/holes/{hole}",
    tag = "games",
    params(
        ("X-User-Id" = String, Header, description = "Authenticated scorekeeper id"),
        ("id" = Uuid, Path, description = "Game identifier"),
        ("hole" = u8, Path, description = "1-based hole number")
    ),
    request_body = SaveHoleRequest,
    responses(
        (status = 200, description = "Updated scorecard", body = GameScorecard),
        (status = 400, description = "Hole out of range"),
        (status = 403, description = "Caller does not own the game"),
        (status = 409, description = "Game already completed")
    )
)]
/// Save the strokes of one hole.
pub async fn save_hole(
    State(state): State<SharedState>,
    CallerId(caller): CallerId,
    Path((id, hole)): Path<(Uuid, u8)>,
    Json(payload): Json<SaveHoleRequest>,
) -> Result<Json<GameScorecard>, AppError> {
    let scorecard = score_service::save_hole(&state, &caller, id, hole, payload).await?;
    Ok(Json(scorecard))
}

#[utoipa::path(
    post,
    path = "/games/{id}/finish",
    tag = "games",
    params(
        ("X-User-Id" = String, Header, description = "Authenticated scorekeeper id"),
        ("id" = Uuid, Path, description = "Game identifier")
    ),
    responses(
        (status = 200, description = "Final scorecard", body = GameScorecard),
        (status = 403, description = "Caller does not own the game"),
        (status = 409, description = "Game already completed")
    )
)]
/// Complete a game before its last hole.
pub async fn finish_game(
    State(state): State<SharedState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<GameScorecard>, AppError> {
    let scorecard = game_service::finish_game(&state, &caller, id).await?;
    Ok(Json(scorecard))
}

/// Configure the game routes.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/holes/{hole}", put(save_hole))
        .route("/games/{id}/finish", post(finish_game))
}

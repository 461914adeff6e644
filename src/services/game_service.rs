use std::{sync::Arc, time::SystemTime};

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        golf_store::GolfStore,
        models::{GameEntity, GameFilter, PlayerScoreEntity, TeamEntity},
    },
    dto::game::{CreateGameRequest, GameListQuery, GameScorecard, GameSummary},
    error::ServiceError,
    services::{leaderboard_service, sse_events, user_service},
    state::SharedState,
};

/// Start a game for the caller's team with one empty score record per player.
pub async fn create_game(
    state: &SharedState,
    caller_id: &str,
    request: CreateGameRequest,
) -> Result<GameSummary, ServiceError> {
    if !state.config().accepts_hole_count(request.holes) {
        return Err(ServiceError::InvalidInput(format!(
            "unsupported game length {} (allowed: {:?})",
            request.holes,
            state.config().allowed_hole_counts()
        )));
    }

    let store = state.require_store().await?;
    let owner = user_service::require_scorekeeper(&store, caller_id).await?;
    let team_id = owner
        .team_id
        .ok_or_else(|| ServiceError::InvalidState("register a team before starting a game".into()))?;
    let team = store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}`")))?;

    let game = GameEntity::new(team.id, request.holes, SystemTime::now());
    store.save_game(game.clone()).await?;

    for (player_id, player_name) in team.roster() {
        let record = PlayerScoreEntity::new(game.id, player_id, player_name.to_string());
        store.save_player_score(record).await?;
    }

    info!(game_id = %game.id, team_id = %team.id, holes = game.holes, "game started");

    let summary = GameSummary::from(&game);
    sse_events::broadcast_game_created(state, summary.clone(), team.name);
    leaderboard_service::broadcast_live(state).await;

    Ok(summary)
}

/// Games matching `query`, newest first.
pub async fn list_games(
    state: &SharedState,
    query: GameListQuery,
) -> Result<Vec<GameSummary>, ServiceError> {
    let store = state.require_store().await?;
    let filter = GameFilter {
        active: query.active,
        team_id: query.team_id,
    };

    let games = store.list_games(filter).await?;
    Ok(games.iter().rev().map(GameSummary::from).collect())
}

/// Full scorecard of a game.
pub async fn get_scorecard(state: &SharedState, id: Uuid) -> Result<GameScorecard, ServiceError> {
    let store = state.require_store().await?;
    let game = find_game(&store, id).await?;
    let team = find_team_of(&store, &game).await?;
    let records = store.find_player_scores(id).await?;
    Ok(GameScorecard::build(&game, &team, &records))
}

/// Complete a game before its last hole. The pointer stays where it is.
pub async fn finish_game(
    state: &SharedState,
    caller_id: &str,
    id: Uuid,
) -> Result<GameScorecard, ServiceError> {
    let store = state.require_store().await?;
    let (mut game, team) = load_owned_game(&store, caller_id, id).await?;

    if game.is_completed() {
        return Err(ServiceError::InvalidState(format!(
            "game `{id}` is already completed"
        )));
    }

    game.complete(SystemTime::now());
    store.save_game(game.clone()).await?;
    info!(game_id = %id, current_hole = ?game.current_hole, "game finished early");

    let records = store.find_player_scores(id).await?;
    let scorecard = GameScorecard::build(&game, &team, &records);

    sse_events::broadcast_scores_updated(state, &scorecard);
    sse_events::broadcast_game_completed(state, GameSummary::from(&game));
    leaderboard_service::broadcast_live(state).await;

    Ok(scorecard)
}

/// Load a game and its team, checking the caller is the team's scorekeeper.
pub async fn load_owned_game(
    store: &Arc<dyn GolfStore>,
    caller_id: &str,
    id: Uuid,
) -> Result<(GameEntity, TeamEntity), ServiceError> {
    user_service::require_scorekeeper(store, caller_id).await?;
    let game = find_game(store, id).await?;
    let team = find_team_of(store, &game).await?;

    if team.scorekeeper_id != caller_id {
        return Err(ServiceError::Forbidden(format!(
            "game `{id}` belongs to another scorekeeper"
        )));
    }

    Ok((game, team))
}

async fn find_game(store: &Arc<dyn GolfStore>, id: Uuid) -> Result<GameEntity, ServiceError> {
    store
        .find_game(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game `{id}`")))
}

async fn find_team_of(
    store: &Arc<dyn GolfStore>,
    game: &GameEntity,
) -> Result<TeamEntity, ServiceError> {
    store
        .find_team(game.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}`", game.team_id)))
}

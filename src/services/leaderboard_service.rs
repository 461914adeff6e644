use std::{collections::HashMap, sync::Arc};

use tracing::warn;

use crate::{
    dao::{golf_store::GolfStore, models::GameFilter},
    dto::leaderboard::{LeaderboardResponse, LeaderboardScope},
    error::ServiceError,
    scoring::assemble_leaderboard,
    services::sse_events,
    state::SharedState,
};

/// Compute the ranked leaderboard of the games selected by `scope`.
pub async fn leaderboard(
    state: &SharedState,
    scope: LeaderboardScope,
) -> Result<LeaderboardResponse, ServiceError> {
    let store = state.require_store().await?;
    compute(&store, scope).await
}

/// Recompute the live leaderboard and push it to public subscribers.
///
/// Failures are logged only: the write that triggered the refresh already succeeded.
pub async fn broadcast_live(state: &SharedState) {
    let store = match state.require_store().await {
        Ok(store) => store,
        Err(err) => {
            warn!(error = %err, "skipping leaderboard broadcast");
            return;
        }
    };

    match compute(&store, LeaderboardScope::Active).await {
        Ok(leaderboard) => sse_events::broadcast_leaderboard(state, leaderboard),
        Err(err) => warn!(error = %err, "failed to compute live leaderboard"),
    }
}

async fn compute(
    store: &Arc<dyn GolfStore>,
    scope: LeaderboardScope,
) -> Result<LeaderboardResponse, ServiceError> {
    let filter = match scope {
        LeaderboardScope::Active => GameFilter::active(),
        LeaderboardScope::All => GameFilter::default(),
    };
    let games = store.list_games(filter).await?;

    let teams = store
        .list_teams()
        .await?
        .into_iter()
        .map(|team| (team.id, team))
        .collect::<HashMap<_, _>>();

    let mut scores = HashMap::with_capacity(games.len());
    for game in &games {
        scores.insert(game.id, store.find_player_scores(game.id).await?);
    }

    let rows = assemble_leaderboard(&games, &teams, &scores)
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(LeaderboardResponse { scope, rows })
}

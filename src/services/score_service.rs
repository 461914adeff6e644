use std::{sync::Arc, time::SystemTime};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{golf_store::GolfStore, models::PlayerScoreEntity, storage::StorageResult},
    dto::game::{GameScorecard, GameSummary, SaveHoleRequest},
    error::ServiceError,
    scoring::parse_strokes,
    services::{game_service, leaderboard_service, sse_events},
    state::SharedState,
};

/// Upsert one player's strokes on one hole, creating the record when missing and
/// recomputing its total.
pub async fn set_player_hole_score(
    store: &Arc<dyn GolfStore>,
    game_id: Uuid,
    player_id: &str,
    player_name: &str,
    hole: u8,
    strokes: Option<u32>,
    now: SystemTime,
) -> StorageResult<PlayerScoreEntity> {
    let mut record = store
        .find_player_score(game_id, player_id.to_string())
        .await?
        .unwrap_or_else(|| {
            PlayerScoreEntity::new(game_id, player_id.to_string(), player_name.to_string())
        });

    record.set_hole(hole, strokes, now);
    store.save_player_score(record.clone()).await?;
    Ok(record)
}

/// Save the strokes of every listed player on `hole`, then move the game pointer.
///
/// Players missing from the roster are skipped. Saving the current hole advances the
/// pointer; saving the last one completes the game. Any other hole may be corrected
/// without moving the pointer.
pub async fn save_hole(
    state: &SharedState,
    caller_id: &str,
    game_id: Uuid,
    hole: u8,
    request: SaveHoleRequest,
) -> Result<GameScorecard, ServiceError> {
    let store = state.require_store().await?;
    let (mut game, team) = game_service::load_owned_game(&store, caller_id, game_id).await?;

    if game.is_completed() {
        return Err(ServiceError::InvalidState(format!(
            "game `{game_id}` is completed"
        )));
    }
    if hole == 0 || hole > game.holes {
        return Err(ServiceError::InvalidInput(format!(
            "hole must be between 1 and {} (got {hole})",
            game.holes
        )));
    }

    let now = SystemTime::now();
    for (player_id, value) in &request.scores {
        let Some(player_name) = team.player_name(player_id) else {
            warn!(%game_id, %player_id, "player not on the roster; skipping score");
            continue;
        };

        set_player_hole_score(
            &store,
            game_id,
            player_id,
            player_name,
            hole,
            parse_strokes(value),
            now,
        )
        .await?;
    }

    let completed = game.advance_after(hole, now);
    store.save_game(game.clone()).await?;
    info!(%game_id, hole, current_hole = ?game.current_hole, completed, "hole saved");

    let records = store.find_player_scores(game_id).await?;
    let scorecard = GameScorecard::build(&game, &team, &records);

    sse_events::broadcast_scores_updated(state, &scorecard);
    if completed {
        sse_events::broadcast_game_completed(state, GameSummary::from(&game));
    }
    leaderboard_service::broadcast_live(state).await;

    Ok(scorecard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::golf_store::memory::MemoryGolfStore;

    #[tokio::test]
    async fn upsert_creates_then_updates_record() {
        let store: Arc<dyn GolfStore> = Arc::new(MemoryGolfStore::new());
        let game_id = Uuid::new_v4();
        let now = SystemTime::now();

        let first = set_player_hole_score(&store, game_id, "player1", "Ada", 1, Some(4), now)
            .await
            .unwrap();
        assert_eq!(first.total, 4);

        set_player_hole_score(&store, game_id, "player1", "Ada", 2, Some(5), now)
            .await
            .unwrap();
        let cleared = set_player_hole_score(&store, game_id, "player1", "Ada", 1, None, now)
            .await
            .unwrap();

        assert_eq!(cleared.total, 5);
        let stored = store
            .find_player_score(game_id, "player1".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, cleared);
    }
}

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, PlayerScoreEntity, TeamEntity},
    dto::format_system_time,
    scoring::{self, ScoreCard},
};

/// Payload used to start a new game for the caller's team.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGameRequest {
    /// Game length, 9 or 18 unless configured otherwise.
    pub holes: u8,
}

/// Strokes entered for one hole, keyed by positional player id.
///
/// Values are parsed leniently: numbers and numeric strings count, anything else
/// (null, empty, zero) clears the player's score on that hole.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveHoleRequest {
    #[schema(value_type = Object)]
    pub scores: HashMap<String, serde_json::Value>,
}

/// Filters accepted by the game listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GameListQuery {
    /// Only active (`true`) or completed (`false`) games.
    pub active: Option<bool>,
    /// Only games of this team.
    pub team_id: Option<Uuid>,
}

/// Summary of a game as returned by listings and SSE events.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct GameSummary {
    pub id: Uuid,
    pub name: String,
    pub team_id: Uuid,
    pub holes: u8,
    pub current_hole: Option<u8>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
}

impl From<&GameEntity> for GameSummary {
    fn from(value: &GameEntity) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            team_id: value.team_id,
            holes: value.holes,
            current_hole: value.current_hole,
            active: value.active,
            created_at: format_system_time(value.created_at),
            updated_at: format_system_time(value.updated_at),
            completed_at: value.completed_at.map(format_system_time),
        }
    }
}

/// Strokes and running total of one player.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PlayerCard {
    pub player_id: String,
    pub player_name: String,
    /// Strokes keyed by hole number.
    pub holes: BTreeMap<u8, u32>,
    pub total: u32,
}

impl From<&PlayerScoreEntity> for PlayerCard {
    fn from(value: &PlayerScoreEntity) -> Self {
        Self {
            player_id: value.player_id.clone(),
            player_name: value.player_name.clone(),
            holes: value.hole_scores.clone(),
            total: value.total,
        }
    }
}

/// Full scorecard of one game: per-player strokes plus the team's best-two aggregates.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct GameScorecard {
    pub game: GameSummary,
    pub team_name: String,
    pub players: Vec<PlayerCard>,
    /// Best-two aggregate per hole, `null` while fewer than two players scored.
    pub hole_aggregates: Vec<Option<u32>>,
    pub team_total: u32,
    pub team_total_display: String,
    pub through: u8,
    pub through_display: String,
}

impl GameScorecard {
    /// Build the scorecard from a consistent read of a game, its team and its records.
    ///
    /// Players of the roster without a record yet appear with no strokes.
    pub fn build(game: &GameEntity, team: &TeamEntity, records: &[PlayerScoreEntity]) -> Self {
        let card: ScoreCard = scoring::score_card(records);
        let team_total = scoring::team_total(&card, game.holes);
        let through = scoring::game_through(game, &card);

        let players = team
            .roster()
            .map(|(player_id, player_name)| {
                records
                    .iter()
                    .find(|record| record.player_id == player_id)
                    .map(PlayerCard::from)
                    .unwrap_or_else(|| PlayerCard {
                        player_id: player_id.clone(),
                        player_name: player_name.to_string(),
                        holes: BTreeMap::new(),
                        total: 0,
                    })
            })
            .collect();

        Self {
            game: GameSummary::from(game),
            team_name: team.name.clone(),
            players,
            hole_aggregates: scoring::hole_aggregates(&card, game.holes),
            team_total,
            team_total_display: scoring::format_score(i64::from(team_total)),
            through,
            through_display: scoring::format_through(through, game.holes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[test]
    fn scorecard_fills_missing_players_and_aggregates() {
        let now = SystemTime::now();
        let team = TeamEntity::new(
            "Eagles".into(),
            vec!["Ada".into(), "Bo".into(), "Cy".into(), "Di".into()],
            "uid".into(),
            now,
        );
        let mut game = GameEntity::new(team.id, 9, now);
        game.current_hole = Some(2);

        let records = [("player1", 4), ("player2", 5), ("player3", 6)]
            .into_iter()
            .map(|(id, strokes)| {
                let mut record =
                    PlayerScoreEntity::new(game.id, id.into(), team.player_name(id).unwrap().into());
                record.set_hole(1, Some(strokes), now);
                record
            })
            .collect::<Vec<_>>();

        let scorecard = GameScorecard::build(&game, &team, &records);
        assert_eq!(scorecard.players.len(), 4);
        assert_eq!(scorecard.players[3].player_name, "Di");
        assert!(scorecard.players[3].holes.is_empty());
        assert_eq!(scorecard.hole_aggregates.len(), 9);
        assert_eq!(scorecard.hole_aggregates[0], Some(9));
        assert_eq!(scorecard.hole_aggregates[1], None);
        assert_eq!(scorecard.team_total, 9);
        assert_eq!(scorecard.team_total_display, "+9");
        assert_eq!(scorecard.through, 1);
        assert_eq!(scorecard.through_display, "1");
    }
}

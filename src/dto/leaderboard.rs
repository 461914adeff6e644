use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::scoring::{LeaderboardRow, format_score, format_through};

/// Which games feed a leaderboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardScope {
    /// Only games still in progress (the live board).
    #[default]
    Active,
    /// Every game ever played.
    All,
}

/// Query parameters of the leaderboard route.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Defaults to `active`.
    pub scope: Option<LeaderboardScope>,
}

/// One ranked line with display-ready columns.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub game_id: Uuid,
    pub team_id: Uuid,
    pub team_name: String,
    pub total: u32,
    pub total_display: String,
    pub through: u8,
    pub through_display: String,
    pub holes: u8,
    pub roster: Vec<String>,
    pub tied: bool,
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(value: LeaderboardRow) -> Self {
        Self {
            rank: value.rank,
            game_id: value.game_id,
            team_id: value.team_id,
            team_name: value.team_name,
            total: value.total,
            total_display: format_score(i64::from(value.total)),
            through: value.through,
            through_display: format_through(value.through, value.holes),
            holes: value.holes,
            roster: value.roster,
            tied: value.tied,
        }
    }
}

/// Complete leaderboard snapshot.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub scope: LeaderboardScope,
    pub rows: Vec<LeaderboardEntry>,
}

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, time::SystemTime};
use utoipa::ToSchema;
use uuid::Uuid;

/// Number of players on every team.
pub const TEAM_SIZE: usize = 4;

/// Role attached to a user profile, gating which operations they may call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Registers a team and enters strokes for its games.
    Scorekeeper,
    /// Follows leaderboards and chats.
    Spectator,
}

/// Profile of an authenticated user, keyed by the identity provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Identity provider user id.
    pub id: String,
    /// Name shown in chat and used as "Player A" of a scorekeeper's team.
    pub full_name: String,
    /// Role chosen at registration.
    pub role: UserRole,
    /// Team owned by this user (scorekeepers only).
    pub team_id: Option<Uuid>,
    /// Profile creation time.
    pub created_at: SystemTime,
}

/// Registered team of exactly [`TEAM_SIZE`] players.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Player names; index 0 is the registering scorekeeper.
    pub players: Vec<String>,
    /// User id of the scorekeeper owning the team.
    pub scorekeeper_id: String,
    /// Registration time.
    pub created_at: SystemTime,
}

impl TeamEntity {
    /// Build a new team with a fresh identifier.
    pub fn new(
        name: String,
        players: Vec<String>,
        scorekeeper_id: String,
        created_at: SystemTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            players,
            scorekeeper_id,
            created_at,
        }
    }

    /// Iterate over `(player_id, player_name)` pairs in roster order.
    pub fn roster(&self) -> impl Iterator<Item = (String, &str)> {
        self.players
            .iter()
            .enumerate()
            .map(|(index, name)| (player_id(index), name.as_str()))
    }

    /// Name of the roster player with the given positional id.
    pub fn player_name(&self, player_id: &str) -> Option<&str> {
        self.roster()
            .find(|(id, _)| id == player_id)
            .map(|(_, name)| name)
    }
}

/// Positional player id (`player1`..`player4`) for a roster index.
pub fn player_id(index: usize) -> String {
    format!("player{}", index + 1)
}

/// One scoring session of a team over 9 or 18 holes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Display name (e.g. "New 18-Hole Game").
    pub name: String,
    /// Team playing the game.
    pub team_id: Uuid,
    /// Configured game length.
    pub holes: u8,
    /// Next hole to play, `holes + 1` once the last hole was saved. Absent on game
    /// documents written before the pointer existed.
    #[serde(default)]
    pub current_hole: Option<u8>,
    /// False once the game is completed.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last time the game entity was updated.
    pub updated_at: SystemTime,
    /// Completion timestamp.
    #[serde(default)]
    pub completed_at: Option<SystemTime>,
}

impl GameEntity {
    /// Start a fresh game on hole 1.
    pub fn new(team_id: Uuid, holes: u8, now: SystemTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("New {holes}-Hole Game"),
            team_id,
            holes,
            current_hole: Some(1),
            active: true,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Whether the game reached its terminal state.
    pub fn is_completed(&self) -> bool {
        !self.active
    }

    /// Move the pointer forward after `hole` was saved, completing the game when the
    /// last hole is passed. Returns `true` when this call completed the game.
    ///
    /// Saving any hole other than the current one leaves the pointer untouched.
    pub fn advance_after(&mut self, hole: u8, now: SystemTime) -> bool {
        self.updated_at = now;
        let next = match self.current_hole {
            Some(pointer) if pointer == hole => hole.saturating_add(1),
            Some(_) => return false,
            None if hole == self.holes => hole.saturating_add(1),
            None => return false,
        };

        self.current_hole = Some(next);
        if next > self.holes {
            self.complete(now);
            return true;
        }
        false
    }

    /// Mark the game completed. The pointer is left where it is.
    pub fn complete(&mut self, now: SystemTime) {
        self.active = false;
        self.updated_at = now;
        self.completed_at = Some(now);
    }
}

/// Strokes of one player in one game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerScoreEntity {
    /// Game the record belongs to.
    pub game_id: Uuid,
    /// Positional player id within the team.
    pub player_id: String,
    /// Player display name at the time the game started.
    pub player_name: String,
    /// Strokes keyed by 1-based hole number. Unset holes are absent.
    pub hole_scores: BTreeMap<u8, u32>,
    /// Sum of every value in `hole_scores`.
    pub total: u32,
    /// Last time a hole was changed.
    pub updated_at: SystemTime,
}

impl PlayerScoreEntity {
    /// Empty record created when a game starts.
    pub fn new(game_id: Uuid, player_id: String, player_name: String) -> Self {
        Self {
            game_id,
            player_id,
            player_name,
            hole_scores: BTreeMap::new(),
            total: 0,
            updated_at: SystemTime::now(),
        }
    }

    /// Set (or clear, with `None`) the strokes of one hole and recompute the total.
    pub fn set_hole(&mut self, hole: u8, strokes: Option<u32>, now: SystemTime) {
        match strokes {
            Some(value) => {
                self.hole_scores.insert(hole, value);
            }
            None => {
                self.hole_scores.remove(&hole);
            }
        }
        self.total = self
            .hole_scores
            .values()
            .copied()
            .fold(0, u32::saturating_add);
        self.updated_at = now;
    }
}

/// Message posted to a chat channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessageEntity {
    /// Message identifier.
    pub id: Uuid,
    /// Channel the message belongs to.
    pub channel: String,
    /// Message body.
    pub text: String,
    /// User id of the sender.
    pub sender_id: String,
    /// Sender name at the time of posting.
    pub display_name: String,
    /// Sender role at the time of posting.
    pub role: UserRole,
    /// Server-side timestamp.
    pub sent_at: SystemTime,
}

/// Criteria used when listing games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameFilter {
    /// Only games with this active flag.
    pub active: Option<bool>,
    /// Only games of this team.
    pub team_id: Option<Uuid>,
}

impl GameFilter {
    /// Filter selecting active games only.
    pub fn active() -> Self {
        Self {
            active: Some(true),
            team_id: None,
        }
    }

    /// Whether `game` satisfies the filter.
    pub fn matches(&self, game: &GameEntity) -> bool {
        self.active.is_none_or(|active| game.active == active)
            && self.team_id.is_none_or(|team_id| game.team_id == team_id)
    }
}

use std::collections::BTreeMap;

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::dao::models::{
    ChatMessageEntity, GameEntity, PlayerScoreEntity, TeamEntity, UserEntity, UserRole,
};

fn parse_uuid(owner: &str, value: &str) -> MongoResult<Uuid> {
    Uuid::parse_str(value).map_err(|err| MongoDaoError::CorruptedDocument {
        id: owner.to_owned(),
        reason: format!("invalid uuid `{value}`: {err}"),
    })
}

fn narrow<T: TryFrom<i64>>(owner: &str, field: &str, value: i64) -> MongoResult<T> {
    T::try_from(value).map_err(|_| MongoDaoError::CorruptedDocument {
        id: owner.to_owned(),
        reason: format!("`{field}` out of range: {value}"),
    })
}

/// `_id` of a score record: one document per (game, player).
pub fn score_doc_id(game_id: Uuid, player_id: &str) -> String {
    format!("{game_id}:{player_id}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    full_name: String,
    role: UserRole,
    #[serde(default)]
    team_id: Option<String>,
    created_at: DateTime,
}

impl From<UserEntity> for MongoUserDocument {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            full_name: value.full_name,
            role: value.role,
            team_id: value.team_id.map(|id| id.to_string()),
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<MongoUserDocument> for UserEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoUserDocument) -> MongoResult<Self> {
        let team_id = value
            .team_id
            .as_deref()
            .map(|id| parse_uuid(&value.id, id))
            .transpose()?;
        Ok(Self {
            id: value.id,
            full_name: value.full_name,
            role: value.role,
            team_id,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    players: Vec<String>,
    scorekeeper_id: String,
    created_at: DateTime,
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            players: value.players,
            scorekeeper_id: value.scorekeeper_id,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<MongoTeamDocument> for TeamEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoTeamDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_uuid(&value.id, &value.id)?,
            name: value.name,
            players: value.players,
            scorekeeper_id: value.scorekeeper_id,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    pub id: String,
    name: String,
    team_id: String,
    holes: i64,
    #[serde(default)]
    current_hole: Option<i64>,
    active: bool,
    created_at: DateTime,
    updated_at: DateTime,
    #[serde(default)]
    completed_at: Option<DateTime>,
}

impl From<GameEntity> for MongoGameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            team_id: value.team_id.to_string(),
            holes: value.holes.into(),
            current_hole: value.current_hole.map(i64::from),
            active: value.active,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
            completed_at: value.completed_at.map(DateTime::from_system_time),
        }
    }
}

impl TryFrom<MongoGameDocument> for GameEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoGameDocument) -> MongoResult<Self> {
        let current_hole = value
            .current_hole
            .map(|hole| narrow(&value.id, "current_hole", hole))
            .transpose()?;
        Ok(Self {
            id: parse_uuid(&value.id, &value.id)?,
            team_id: parse_uuid(&value.id, &value.team_id)?,
            holes: narrow(&value.id, "holes", value.holes)?,
            current_hole,
            name: value.name,
            active: value.active,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
            completed_at: value.completed_at.map(DateTime::to_system_time),
        })
    }
}

/// Hole map keys are stringified since BSON documents only allow string keys.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoScoreDocument {
    #[serde(rename = "_id")]
    pub id: String,
    game_id: String,
    player_id: String,
    player_name: String,
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    hole_scores: BTreeMap<u8, i64>,
    total: i64,
    updated_at: DateTime,
}

impl From<PlayerScoreEntity> for MongoScoreDocument {
    fn from(value: PlayerScoreEntity) -> Self {
        Self {
            id: score_doc_id(value.game_id, &value.player_id),
            game_id: value.game_id.to_string(),
            player_id: value.player_id,
            player_name: value.player_name,
            hole_scores: value
                .hole_scores
                .into_iter()
                .map(|(hole, strokes)| (hole, i64::from(strokes)))
                .collect(),
            total: value.total.into(),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoScoreDocument> for PlayerScoreEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoScoreDocument) -> MongoResult<Self> {
        let hole_scores = value
            .hole_scores
            .iter()
            .map(|(hole, strokes)| Ok((*hole, narrow(&value.id, "hole_scores", *strokes)?)))
            .collect::<MongoResult<BTreeMap<u8, u32>>>()?;
        Ok(Self {
            game_id: parse_uuid(&value.id, &value.game_id)?,
            total: narrow(&value.id, "total", value.total)?,
            hole_scores,
            player_id: value.player_id,
            player_name: value.player_name,
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoChatDocument {
    #[serde(rename = "_id")]
    pub id: String,
    channel: String,
    text: String,
    sender_id: String,
    display_name: String,
    role: UserRole,
    sent_at: DateTime,
}

impl From<ChatMessageEntity> for MongoChatDocument {
    fn from(value: ChatMessageEntity) -> Self {
        Self {
            id: value.id.to_string(),
            channel: value.channel,
            text: value.text,
            sender_id: value.sender_id,
            display_name: value.display_name,
            role: value.role,
            sent_at: DateTime::from_system_time(value.sent_at),
        }
    }
}

impl TryFrom<MongoChatDocument> for ChatMessageEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoChatDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_uuid(&value.id, &value.id)?,
            channel: value.channel,
            text: value.text,
            sender_id: value.sender_id,
            display_name: value.display_name,
            role: value.role,
            sent_at: value.sent_at.to_system_time(),
        })
    }
}

pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{
    ChatMessageEntity, GameEntity, GameFilter, PlayerScoreEntity, TeamEntity, UserEntity,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for profiles, teams, games, score records
/// and chat messages.
///
/// Writes are plain upserts: the last write to reach the backend wins.
pub trait GolfStore: Send + Sync {
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_user(&self, id: String) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;
    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    fn find_team_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Games matching `filter`, oldest first.
    fn list_games(&self, filter: GameFilter) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;

    fn save_player_score(&self, score: PlayerScoreEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_player_score(
        &self,
        game_id: Uuid,
        player_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerScoreEntity>>>;
    /// Every record of a game, ordered by player id.
    fn find_player_scores(
        &self,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerScoreEntity>>>;

    fn append_chat_message(&self, message: ChatMessageEntity)
    -> BoxFuture<'static, StorageResult<()>>;
    /// The newest `limit` messages of `channel`, returned oldest first.
    fn list_chat_messages(
        &self,
        channel: String,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<ChatMessageEntity>>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

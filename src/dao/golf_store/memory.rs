//! Process-local [`GolfStore`] used by tests and by `STORAGE_BACKEND=memory`.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{BoxFuture, ready};
use uuid::Uuid;

use crate::dao::{
    golf_store::GolfStore,
    models::{ChatMessageEntity, GameEntity, GameFilter, PlayerScoreEntity, TeamEntity, UserEntity},
    storage::StorageResult,
};

#[derive(Clone, Default)]
pub struct MemoryGolfStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    users: DashMap<String, UserEntity>,
    teams: DashMap<Uuid, TeamEntity>,
    games: DashMap<Uuid, GameEntity>,
    scores: DashMap<(Uuid, String), PlayerScoreEntity>,
    chat: DashMap<String, Vec<ChatMessageEntity>>,
}

impl MemoryGolfStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GolfStore for MemoryGolfStore {
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.users.insert(user.id.clone(), user);
        Box::pin(ready(Ok(())))
    }

    fn find_user(&self, id: String) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let user = self.inner.users.get(&id).map(|entry| entry.clone());
        Box::pin(ready(Ok(user)))
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.teams.insert(team.id, team);
        Box::pin(ready(Ok(())))
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.teams.remove(&id);
        Box::pin(ready(Ok(())))
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let team = self.inner.teams.get(&id).map(|entry| entry.clone());
        Box::pin(ready(Ok(team)))
    }

    fn find_team_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let team = self
            .inner
            .teams
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.clone());
        Box::pin(ready(Ok(team)))
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let mut teams = self
            .inner
            .teams
            .iter()
            .map(|entry| entry.clone())
            .collect::<Vec<_>>();
        teams.sort_by_key(|team| team.created_at);
        Box::pin(ready(Ok(teams)))
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.games.insert(game.id, game);
        Box::pin(ready(Ok(())))
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let game = self.inner.games.get(&id).map(|entry| entry.clone());
        Box::pin(ready(Ok(game)))
    }

    fn list_games(&self, filter: GameFilter) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let mut games = self
            .inner
            .games
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.clone())
            .collect::<Vec<_>>();
        games.sort_by_key(|game| game.created_at);
        Box::pin(ready(Ok(games)))
    }

    fn save_player_score(&self, score: PlayerScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner
            .scores
            .insert((score.game_id, score.player_id.clone()), score);
        Box::pin(ready(Ok(())))
    }

    fn find_player_score(
        &self,
        game_id: Uuid,
        player_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerScoreEntity>>> {
        let score = self
            .inner
            .scores
            .get(&(game_id, player_id))
            .map(|entry| entry.clone());
        Box::pin(ready(Ok(score)))
    }

    fn find_player_scores(
        &self,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerScoreEntity>>> {
        let mut scores = self
            .inner
            .scores
            .iter()
            .filter(|entry| entry.key().0 == game_id)
            .map(|entry| entry.clone())
            .collect::<Vec<_>>();
        scores.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        Box::pin(ready(Ok(scores)))
    }

    fn append_chat_message(
        &self,
        message: ChatMessageEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.inner
            .chat
            .entry(message.channel.clone())
            .or_default()
            .push(message);
        Box::pin(ready(Ok(())))
    }

    fn list_chat_messages(
        &self,
        channel: String,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<ChatMessageEntity>>> {
        let messages = self
            .inner
            .chat
            .get(&channel)
            .map(|entry| {
                let mut messages = entry.clone();
                messages.sort_by_key(|message| message.sent_at);
                let skip = messages.len().saturating_sub(limit);
                messages.split_off(skip)
            })
            .unwrap_or_default();
        Box::pin(ready(Ok(messages)))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(ready(Ok(())))
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(ready(Ok(())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::UserRole;
    use std::time::{Duration, SystemTime};

    fn message(channel: &str, text: &str, sent_at: SystemTime) -> ChatMessageEntity {
        ChatMessageEntity {
            id: Uuid::new_v4(),
            channel: channel.into(),
            text: text.into(),
            sender_id: "uid".into(),
            display_name: "Ada".into(),
            role: UserRole::Spectator,
            sent_at,
        }
    }

    #[tokio::test]
    async fn chat_returns_newest_messages_oldest_first() {
        let store = MemoryGolfStore::new();
        let start = SystemTime::now();
        for (offset, text) in ["one", "two", "three"].iter().enumerate() {
            let sent_at = start + Duration::from_secs(offset as u64);
            store
                .append_chat_message(message("global", text, sent_at))
                .await
                .unwrap();
        }
        store
            .append_chat_message(message("other", "elsewhere", start))
            .await
            .unwrap();

        let texts = store
            .list_chat_messages("global".into(), 2)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn games_are_filtered_and_ordered() {
        let store = MemoryGolfStore::new();
        let team_id = Uuid::new_v4();
        let start = SystemTime::now();
        let first = GameEntity::new(team_id, 9, start);
        let mut second = GameEntity::new(team_id, 18, start + Duration::from_secs(1));
        second.complete(start + Duration::from_secs(2));
        let other = GameEntity::new(Uuid::new_v4(), 9, start + Duration::from_secs(3));

        for game in [second.clone(), other.clone(), first.clone()] {
            store.save_game(game).await.unwrap();
        }

        let all = store.list_games(GameFilter::default()).await.unwrap();
        let ids = all.iter().map(|g| g.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![first.id, second.id, other.id]);

        let active = store.list_games(GameFilter::active()).await.unwrap();
        assert_eq!(active.len(), 2);

        let team_games = store
            .list_games(GameFilter {
                active: None,
                team_id: Some(team_id),
            })
            .await
            .unwrap();
        assert_eq!(team_games.len(), 2);
    }

    #[tokio::test]
    async fn score_records_are_keyed_by_game_and_player() {
        let store = MemoryGolfStore::new();
        let game_id = Uuid::new_v4();
        let mut record = PlayerScoreEntity::new(game_id, "player2".into(), "Bo".into());
        record.set_hole(1, Some(5), SystemTime::now());
        store.save_player_score(record.clone()).await.unwrap();
        store
            .save_player_score(PlayerScoreEntity::new(game_id, "player1".into(), "Ada".into()))
            .await
            .unwrap();

        let found = store
            .find_player_score(game_id, "player2".into())
            .await
            .unwrap();
        assert_eq!(found, Some(record));

        let all = store.find_player_scores(game_id).await.unwrap();
        let ids = all.iter().map(|r| r.player_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["player1", "player2"]);
        assert!(store.find_player_scores(Uuid::new_v4()).await.unwrap().is_empty());
    }
}

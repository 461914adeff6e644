use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoChatDocument, MongoGameDocument, MongoScoreDocument, MongoTeamDocument,
        MongoUserDocument, score_doc_id,
    },
};
use crate::dao::{
    golf_store::GolfStore,
    models::{ChatMessageEntity, GameEntity, GameFilter, PlayerScoreEntity, TeamEntity, UserEntity},
    storage::StorageResult,
};

const USER_COLLECTION_NAME: &str = "users";
const TEAM_COLLECTION_NAME: &str = "teams";
const GAME_COLLECTION_NAME: &str = "games";
const SCORE_COLLECTION_NAME: &str = "scores";
const CHAT_COLLECTION_NAME: &str = "chat_messages";

/// [`GolfStore`] backed by MongoDB, one collection per entity.
#[derive(Clone)]
pub struct MongoGolfStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoGolfStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let indexes: [(&'static str, &'static str, Document, bool); 4] = [
            (TEAM_COLLECTION_NAME, "name", doc! {"name": 1}, true),
            (
                GAME_COLLECTION_NAME,
                "active,created_at",
                doc! {"active": 1, "created_at": 1},
                false,
            ),
            (
                SCORE_COLLECTION_NAME,
                "game_id,player_id",
                doc! {"game_id": 1, "player_id": 1},
                true,
            ),
            (
                CHAT_COLLECTION_NAME,
                "channel,sent_at",
                doc! {"channel": 1, "sent_at": -1},
                false,
            ),
        ];

        let database = self.database().await;
        for (collection, index, keys, unique) in indexes {
            let model = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(Some(format!("{collection}_{}_idx", index.replace(',', "_"))))
                        .unique(Some(unique))
                        .build(),
                )
                .build();

            database
                .collection::<Document>(collection)
                .create_index(model)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection,
                    index,
                    source,
                })?;
        }

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        let guard = self.inner.state.read().await;
        guard.database.collection::<T>(name)
    }

    async fn upsert<T>(&self, name: &'static str, id: String, document: T) -> MongoResult<()>
    where
        T: Serialize + Send + Sync,
    {
        self.collection::<T>(name)
            .await
            .replace_one(doc! {"_id": id.as_str()}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::from_write(name, id, source))?;
        Ok(())
    }

    async fn delete(&self, name: &'static str, id: String) -> MongoResult<()> {
        self.collection::<Document>(name)
            .await
            .delete_one(doc! {"_id": id.as_str()})
            .await
            .map_err(|source| MongoDaoError::Delete {
                collection: name,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_one<T>(&self, name: &'static str, filter: Document) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        self.collection::<T>(name)
            .await
            .find_one(filter)
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: name,
                source,
            })
    }

    async fn find_many<T>(
        &self,
        name: &'static str,
        filter: Document,
        sort: Document,
        limit: Option<i64>,
    ) -> MongoResult<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        let collection = self.collection::<T>(name).await;
        let mut find = collection.find(filter).sort(sort);
        if let Some(limit) = limit {
            find = find.limit(limit);
        }

        find.await
            .map_err(|source| MongoDaoError::Read {
                collection: name,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: name,
                source,
            })
    }

    async fn list_games(&self, filter: GameFilter) -> MongoResult<Vec<GameEntity>> {
        let mut query = Document::new();
        if let Some(active) = filter.active {
            query.insert("active", active);
        }
        if let Some(team_id) = filter.team_id {
            query.insert("team_id", team_id.to_string());
        }

        let documents: Vec<MongoGameDocument> = self
            .find_many(GAME_COLLECTION_NAME, query, doc! {"created_at": 1}, None)
            .await?;
        documents.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_chat_messages(
        &self,
        channel: String,
        limit: usize,
    ) -> MongoResult<Vec<ChatMessageEntity>> {
        // MongoDB reads a zero limit as "unbounded".
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let documents: Vec<MongoChatDocument> = self
            .find_many(
                CHAT_COLLECTION_NAME,
                doc! {"channel": channel},
                doc! {"sent_at": -1},
                Some(limit),
            )
            .await?;

        let mut messages = documents
            .into_iter()
            .map(ChatMessageEntity::try_from)
            .collect::<MongoResult<Vec<_>>>()?;
        messages.reverse();
        Ok(messages)
    }
}

impl GolfStore for MongoGolfStore {
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let document = MongoUserDocument::from(user);
            store
                .upsert(USER_COLLECTION_NAME, document.id.clone(), document)
                .await
                .map_err(Into::into)
        })
    }

    fn find_user(&self, id: String) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document: Option<MongoUserDocument> =
                store.find_one(USER_COLLECTION_NAME, doc! {"_id": id}).await?;
            Ok(document.map(UserEntity::try_from).transpose()?)
        })
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let document = MongoTeamDocument::from(team);
            store
                .upsert(TEAM_COLLECTION_NAME, document.id.clone(), document)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete(TEAM_COLLECTION_NAME, id.to_string())
                .await
                .map_err(Into::into)
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document: Option<MongoTeamDocument> = store
                .find_one(TEAM_COLLECTION_NAME, doc! {"_id": id.to_string()})
                .await?;
            Ok(document.map(TeamEntity::try_from).transpose()?)
        })
    }

    fn find_team_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document: Option<MongoTeamDocument> = store
                .find_one(TEAM_COLLECTION_NAME, doc! {"name": name})
                .await?;
            Ok(document.map(TeamEntity::try_from).transpose()?)
        })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let documents: Vec<MongoTeamDocument> = store
                .find_many(TEAM_COLLECTION_NAME, doc! {}, doc! {"created_at": 1}, None)
                .await?;
            Ok(documents
                .into_iter()
                .map(TeamEntity::try_from)
                .collect::<MongoResult<Vec<_>>>()?)
        })
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let document = MongoGameDocument::from(game);
            store
                .upsert(GAME_COLLECTION_NAME, document.id.clone(), document)
                .await
                .map_err(Into::into)
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document: Option<MongoGameDocument> = store
                .find_one(GAME_COLLECTION_NAME, doc! {"_id": id.to_string()})
                .await?;
            Ok(document.map(GameEntity::try_from).transpose()?)
        })
    }

    fn list_games(&self, filter: GameFilter) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games(filter).await.map_err(Into::into) })
    }

    fn save_player_score(&self, score: PlayerScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let document = MongoScoreDocument::from(score);
            store
                .upsert(SCORE_COLLECTION_NAME, document.id.clone(), document)
                .await
                .map_err(Into::into)
        })
    }

    fn find_player_score(
        &self,
        game_id: Uuid,
        player_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document: Option<MongoScoreDocument> = store
                .find_one(
                    SCORE_COLLECTION_NAME,
                    doc! {"_id": score_doc_id(game_id, &player_id)},
                )
                .await?;
            Ok(document.map(PlayerScoreEntity::try_from).transpose()?)
        })
    }

    fn find_player_scores(
        &self,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let documents: Vec<MongoScoreDocument> = store
                .find_many(
                    SCORE_COLLECTION_NAME,
                    doc! {"game_id": game_id.to_string()},
                    doc! {"player_id": 1},
                    None,
                )
                .await?;
            Ok(documents
                .into_iter()
                .map(PlayerScoreEntity::try_from)
                .collect::<MongoResult<Vec<_>>>()?)
        })
    }

    fn append_chat_message(
        &self,
        message: ChatMessageEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let document = MongoChatDocument::from(message);
            store
                .upsert(CHAT_COLLECTION_NAME, document.id.clone(), document)
                .await
                .map_err(Into::into)
        })
    }

    fn list_chat_messages(
        &self,
        channel: String,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<ChatMessageEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_chat_messages(channel, limit)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}

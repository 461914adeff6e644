mod config;
mod connection;
mod error;
mod models;
pub mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoGolfStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::CorruptedDocument { id, reason } => StorageError::corrupted(id, reason),
            duplicate @ MongoDaoError::DuplicateKey { .. } => {
                StorageError::conflict(duplicate.to_string())
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}

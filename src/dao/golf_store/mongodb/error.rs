use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to write `{id}` to collection `{collection}`")]
    Write {
        collection: &'static str,
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("`{id}` collides with a unique index on collection `{collection}`")]
    DuplicateKey { collection: &'static str, id: String },
    #[error("failed to delete `{id}` from collection `{collection}`")]
    Delete {
        collection: &'static str,
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to read from collection `{collection}`")]
    Read {
        collection: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("document `{id}` is corrupted: {reason}")]
    CorruptedDocument { id: String, reason: String },
}

impl MongoDaoError {
    /// Classify a failed write, separating unique-index violations from other failures.
    pub fn from_write(collection: &'static str, id: String, source: MongoError) -> Self {
        if is_duplicate_key(&source) {
            MongoDaoError::DuplicateKey { collection, id }
        } else {
            MongoDaoError::Write {
                collection,
                id,
                source,
            }
        }
    }
}

fn is_duplicate_key(error: &MongoError) -> bool {
    match &*error.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

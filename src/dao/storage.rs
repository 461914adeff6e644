use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Backend-specific description of the failure.
        message: String,
        /// Underlying driver error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The write collides with a unique constraint held by another document.
    #[error("storage conflict: {message}")]
    Conflict {
        /// Description of the colliding value.
        message: String,
    },
    /// A stored document could not be mapped back into a model.
    #[error("corrupted document `{id}`: {reason}")]
    Corrupted {
        /// Identifier of the offending document.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a unique-constraint conflict.
    pub fn conflict(message: impl Into<String>) -> Self {
        StorageError::Conflict {
            message: message.into(),
        }
    }

    /// Construct a corrupted-document error.
    pub fn corrupted(id: impl Into<String>, reason: impl Into<String>) -> Self {
        StorageError::Corrupted {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

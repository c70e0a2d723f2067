use std::{error::Error, fmt};
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Match store call that failed, for log lines and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    SaveTeams,
    FindTeams,
    HealthCheck,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreOperation::SaveTeams => "save_teams",
            StoreOperation::FindTeams => "find_teams",
            StoreOperation::HealthCheck => "health_check",
        })
    }
}

/// Error raised by match stores regardless of where the compositions live.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or answered with a failure.
    #[error("match store unavailable during {operation}: {message}")]
    Unavailable {
        operation: StoreOperation,
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The store holds as many matches as it is allowed to and `match_id` is not one of them.
    #[error("match store is full ({limit} matches); cannot keep teams of a new match")]
    CapacityExceeded { limit: usize },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(
        operation: StoreOperation,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Unavailable {
            operation,
            message: message.into(),
            source: Box::new(source),
        }
    }
}

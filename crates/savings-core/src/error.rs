use thiserror::Error;
use uuid::Uuid;

pub type CoreResult<T> = Result<T, CoreError>;

/// Coarse failure categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    PersistenceFailure,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Goal not found: {0}")]
    GoalNotFound(Uuid),
    #[error("Contribution {contribution_id} not found in goal {goal_id}")]
    ContributionNotFound { goal_id: Uuid, contribution_id: Uuid },
    #[error("Storage error: {0}")]
    Persistence(String),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl CoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidInput(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            CoreError::GoalNotFound(_) | CoreError::ContributionNotFound { .. } => {
                ErrorKind::NotFound
            }
            CoreError::Persistence(_) | CoreError::Serde(_) => ErrorKind::PersistenceFailure,
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}

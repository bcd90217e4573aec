use savings_config::ConfigError;
use savings_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Failures surfaced by the host layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Goal limit reached: at most {0} goals can be tracked")]
    GoalLimitReached(usize),
}

impl AppError {
    /// Ledger error category, when the failure came from the ledger itself.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Core(err) => Some(err.kind()),
            AppError::GoalLimitReached(_) => Some(ErrorKind::InvalidInput),
            AppError::Config(_) | AppError::Io(_) => None,
        }
    }
}

use thiserror::Error;

use insight_engine::InsightError;
use stats_collector::StoreError;

/// Conditions reported to callers of the service layer
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("no data available")]
    DatasetEmpty,

    #[error("player '{0}' not found")]
    PlayerNotFound(String),

    #[error("team '{0}' not found")]
    TeamNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("dataset store failed: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<InsightError> for ServiceError {
    fn from(err: InsightError) -> Self {
        match err {
            InsightError::EmptyDataset => ServiceError::DatasetEmpty,
            InsightError::PlayerNotFound(name) => ServiceError::PlayerNotFound(name),
            InsightError::TeamNotFound(team) => ServiceError::TeamNotFound(team),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

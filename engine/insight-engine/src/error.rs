use thiserror::Error;

/// Reported conditions for insight requests. None of these are crashes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsightError {
    #[error("no data available")]
    EmptyDataset,

    #[error("player '{0}' not found")]
    PlayerNotFound(String),

    #[error("team '{0}' not found")]
    TeamNotFound(String),
}

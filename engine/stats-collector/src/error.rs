//! Error types for the stats collector

use thiserror::Error;

/// Terminal outcome of a rate-limited request that did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("access forbidden (403), provider may have blocked the request")]
    Forbidden,

    #[error("request failed with status {0}")]
    BadStatus(u16),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("malformed response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Short machine-friendly name used in attempt logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Forbidden => "forbidden",
            FetchError::BadStatus(429) => "rate_limited",
            FetchError::BadStatus(_) => "bad_status",
            FetchError::Timeout => "timeout",
            FetchError::Connection(_) => "connection",
            FetchError::Decode(_) => "decode",
        }
    }

    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::BadStatus(_) | FetchError::Timeout)
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::BadStatus(429))
    }

    /// Classify a non-200 status
    pub fn from_status(status: u16) -> Self {
        match status {
            403 => FetchError::Forbidden,
            other => FetchError::BadStatus(other),
        }
    }
}

/// Errors raised while persisting the canonical dataset
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, FetchError>;

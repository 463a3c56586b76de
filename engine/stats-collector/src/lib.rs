//! NBA statistics collector
//!
//! Fetches one season of per-player statistics from a fixed cascade of live
//! providers (NBA Stats API, Basketball Reference, ESPN), normalizes them into
//! a canonical schema and falls back to deterministic synthetic data when
//! every provider comes back empty.

pub mod collector;
pub mod config;
pub mod error;
pub mod http;
pub mod providers;
pub mod store;
pub mod synthetic;
pub mod types;

pub use collector::StatsCollector;
pub use config::{CascadeConfig, CollectorConfig, EndpointConfig, EspnConfig, HttpConfig};
pub use error::{FetchError, StoreError};
pub use http::{HttpTransport, RateLimitedClient};
pub use providers::StatsProvider;
pub use store::DatasetStore;
pub use synthetic::SyntheticProfile;
pub use types::*;

//! Live statistics providers
//!
//! Every provider maps its own response shape into the canonical schema and
//! reports any failure as an empty dataset. The cascade only looks at
//! emptiness, so errors are logged here and never propagated.

pub mod basketball_reference;
pub mod espn;
pub mod nba_stats;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{DataSource, Dataset, Season};

pub use basketball_reference::BasketballReferenceProvider;
pub use espn::EspnProvider;
pub use nba_stats::NbaStatsProvider;

/// Uniform contract for a live data source
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Which cascade slot this provider fills
    fn source(&self) -> DataSource;

    /// Cheap reachability check run before the full fetch
    async fn probe(&self) -> bool {
        true
    }

    /// Fetch one season; empty on any problem
    async fn fetch(&self, season: Season) -> Dataset;
}

/// Read a JSON scalar as a number; strings are parsed, anything else is 0
pub(crate) fn json_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => crate::types::parse_number(s),
        _ => 0.0,
    }
}

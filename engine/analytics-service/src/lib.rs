//! NBA analytics service
//!
//! The service layer over the stats collector and insight engine: it owns
//! the published dataset, serialises collections, and exposes lookup,
//! scoring, hot takes and analysis to the CLI and any web front end.

use anyhow::{Context, Result};
use std::path::Path;

pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use config::{AnalyticsConfig, HotTakesConfig, LoggingConfig};
pub use error::ServiceError;
pub use logging::initialize_logging;
pub use service::{AnalyticsService, Collection, HealthReport, PlayerReport};

/// Load configuration from an optional file and the environment
pub fn load_configuration(path: Option<&Path>) -> Result<AnalyticsConfig> {
    config::load_config(path).context("Failed to load service configuration")
}

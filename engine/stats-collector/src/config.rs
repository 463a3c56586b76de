use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::synthetic::SyntheticProfile;
use crate::types::Season;

/// Configuration for the acquisition cascade
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CollectorConfig {
    /// Season to collect (e.g. "2023-24")
    pub season: Season,

    /// Rate limiting and retry policy shared by every provider
    pub http: HttpConfig,

    /// Provider base URLs
    pub endpoints: EndpointConfig,

    /// ESPN listing pagination
    pub espn: EspnConfig,

    /// Cascade behaviour
    pub cascade: CascadeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Base delay before each attempt, multiplied by the attempt number
    pub request_delay_ms: u64,

    /// Per-attempt timeout
    pub timeout_secs: u64,

    /// Maximum attempts per request
    pub max_retries: u32,

    /// Timeout for the single-shot connectivity probe
    pub probe_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub nba_stats_base: String,
    pub basketball_reference_base: String,
    pub espn_api_base: String,
    /// Lightweight URL hit before the heavy stats request
    pub probe_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EspnConfig {
    /// Athletes requested per page
    pub page_limit: u32,

    /// Upper bound on pages walked
    pub max_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Skip the primary fetch entirely when the connectivity probe fails
    pub skip_primary_on_failed_probe: bool,

    /// Profile returned for explicit sample-mode requests
    pub sample_profile: SyntheticProfile,

    /// Profile used when every live provider comes back empty
    pub fallback_profile: SyntheticProfile,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { request_delay_ms: 2000, timeout_secs: 15, max_retries: 3, probe_timeout_secs: 5 }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            nba_stats_base: "https://stats.nba.com/stats".to_string(),
            basketball_reference_base: "https://www.basketball-reference.com".to_string(),
            espn_api_base: "https://site.api.espn.com/apis/site/v2/sports/basketball/nba"
                .to_string(),
            probe_url: "https://stats.nba.com".to_string(),
        }
    }
}

impl Default for EspnConfig {
    fn default() -> Self {
        Self { page_limit: 1000, max_pages: 5 }
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            skip_primary_on_failed_probe: false,
            sample_profile: SyntheticProfile::Basic,
            fallback_profile: SyntheticProfile::Tiered,
        }
    }
}

impl HttpConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl CollectorConfig {
    /// Apply `NBA_SEASON`, `NBA_REQUEST_DELAY_MS` and `NBA_MAX_RETRIES` overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(season) = std::env::var("NBA_SEASON") {
            match season.parse() {
                Ok(parsed) => self.season = parsed,
                Err(e) => tracing::warn!("Ignoring NBA_SEASON override: {}", e),
            }
        }

        if let Ok(delay) = std::env::var("NBA_REQUEST_DELAY_MS") {
            self.http.request_delay_ms = delay.parse().unwrap_or(self.http.request_delay_ms);
        }

        if let Ok(retries) = std::env::var("NBA_MAX_RETRIES") {
            self.http.max_retries = retries.parse().unwrap_or(self.http.max_retries);
        }
    }
}

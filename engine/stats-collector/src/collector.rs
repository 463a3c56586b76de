//! Acquisition cascade: Primary, Secondary, Tertiary, then synthetic data

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{CascadeConfig, CollectorConfig};
use crate::http::RateLimitedClient;
use crate::providers::{
    BasketballReferenceProvider, EspnProvider, NbaStatsProvider, StatsProvider,
};
use crate::synthetic;
use crate::types::{Column, DataSource, Dataset, ProviderResult, Season};

/// Drives the fixed provider order and always yields a non-empty dataset
pub struct StatsCollector {
    season: Season,
    cascade: CascadeConfig,
    primary: Arc<dyn StatsProvider>,
    secondary: Arc<dyn StatsProvider>,
    tertiary: Arc<dyn StatsProvider>,
}

impl StatsCollector {
    /// Build the live providers over one shared rate-limited client
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let client = RateLimitedClient::new(config.http.clone())?;
        let endpoints = &config.endpoints;

        Ok(Self::with_providers(
            config.season,
            config.cascade.clone(),
            Arc::new(NbaStatsProvider::new(
                client.clone(),
                endpoints.nba_stats_base.clone(),
                endpoints.probe_url.clone(),
            )),
            Arc::new(BasketballReferenceProvider::new(
                client.clone(),
                endpoints.basketball_reference_base.clone(),
            )),
            Arc::new(EspnProvider::new(client, endpoints.espn_api_base.clone(), config.espn.clone())),
        ))
    }

    pub fn with_providers(
        season: Season,
        cascade: CascadeConfig,
        primary: Arc<dyn StatsProvider>,
        secondary: Arc<dyn StatsProvider>,
        tertiary: Arc<dyn StatsProvider>,
    ) -> Self {
        Self { season, cascade, primary, secondary, tertiary }
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// Run the cascade. Sample mode skips every live provider.
    pub async fn collect(&self, use_sample: bool) -> ProviderResult {
        if use_sample {
            info!("Using sample data");
            let result = ProviderResult {
                rows: synthetic::generate(self.cascade.sample_profile),
                source: DataSource::Synthetic,
            };
            log_summary(&result);
            return result;
        }

        info!("Collecting {} NBA data from live sources", self.season);
        let result = match self.collect_live().await {
            Some(result) => result,
            None => {
                warn!("All live data sources failed, falling back to synthetic data");
                ProviderResult {
                    rows: synthetic::generate(self.cascade.fallback_profile),
                    source: DataSource::Synthetic,
                }
            }
        };

        log_summary(&result);
        result
    }

    async fn collect_live(&self) -> Option<ProviderResult> {
        let reachable = self.primary.probe().await;
        let skip_primary = !reachable && self.cascade.skip_primary_on_failed_probe;

        for provider in [&self.primary, &self.secondary, &self.tertiary] {
            let source = provider.source();
            if source == DataSource::Primary && skip_primary {
                warn!("{} is not reachable, skipping", source);
                continue;
            }

            info!("Attempting {}...", source);
            let rows = provider.fetch(self.season).await;
            if rows.is_empty() {
                warn!("{} returned no data", source);
                continue;
            }

            info!("Retrieved {} players from {}", rows.len(), source);
            return Some(ProviderResult { rows, source });
        }

        None
    }
}

fn log_summary(result: &ProviderResult) {
    info!(
        players = result.rows.len(),
        source = %result.source,
        "Final data summary"
    );

    let top: Vec<String> = top_scorers(&result.rows, 3);
    if !top.is_empty() {
        info!("Top scorers: {}", top.join(", "));
    }
}

fn top_scorers(dataset: &Dataset, n: usize) -> Vec<String> {
    dataset
        .top_by(Column::Points, n)
        .into_iter()
        .map(|row| format!("{} ({:.1} PPG)", row.player_name, row.points))
        .collect()
}

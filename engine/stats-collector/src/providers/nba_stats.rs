use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use super::{json_number, StatsProvider};
use crate::http::RateLimitedClient;
use crate::types::{Column, DataSource, Dataset, PlayerRow, Season};

/// stats.nba.com league dashboard (per-game, base measures)
pub struct NbaStatsProvider {
    client: RateLimitedClient,
    base_url: String,
    probe_url: String,
}

impl NbaStatsProvider {
    pub fn new(
        client: RateLimitedClient,
        base_url: impl Into<String>,
        probe_url: impl Into<String>,
    ) -> Self {
        Self { client, base_url: base_url.into(), probe_url: probe_url.into() }
    }

    fn dashboard_url(&self) -> String {
        format!("{}/leaguedashplayerstats", self.base_url.trim_end_matches('/'))
    }
}

/// Fixed filter set the dashboard endpoint insists on
pub fn dashboard_params(season: Season) -> Vec<(String, String)> {
    let season = season.label();
    [
        ("PerMode", "PerGame"),
        ("Season", season.as_str()),
        ("SeasonType", "Regular Season"),
        ("LeagueID", "00"),
        ("MeasureType", "Base"),
        ("PlusMinus", "N"),
        ("PaceAdjust", "N"),
        ("Rank", "N"),
        ("Outcome", ""),
        ("Location", ""),
        ("Month", "0"),
        ("SeasonSegment", ""),
        ("DateFrom", ""),
        ("DateTo", ""),
        ("OpponentTeamID", "0"),
        ("VsConference", ""),
        ("VsDivision", ""),
        ("TeamID", "0"),
        ("Conference", ""),
        ("Division", ""),
        ("GameSegment", ""),
        ("Period", "0"),
        ("ShotClockRange", ""),
        ("LastNGames", "0"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Map the first result set's header/row pairing into canonical rows.
///
/// Returns `None` when the payload does not have the expected structure.
pub fn parse_league_dashboard(payload: &Value) -> Option<Dataset> {
    let result_set = payload.get("resultSets")?.as_array()?.first()?;
    let headers: Vec<Option<Column>> = result_set
        .get("headers")?
        .as_array()?
        .iter()
        .map(|h| h.as_str().and_then(Column::from_header))
        .collect();
    let row_set = result_set.get("rowSet")?.as_array()?;

    let provided: Vec<Column> = headers.iter().flatten().copied().collect();
    let mut rows = Vec::with_capacity(row_set.len());

    for raw in row_set {
        let Some(cells) = raw.as_array() else {
            warn!("Skipping non-array row in result set");
            continue;
        };

        let mut row = PlayerRow::default();
        for (column, cell) in headers.iter().zip(cells) {
            let Some(column) = column else { continue };
            match cell {
                Value::String(text) => row.set_text(*column, text),
                other => row.set_number(*column, json_number(other)),
            }
        }

        if row.player_name.is_empty() {
            continue;
        }
        row.fill_derived(&provided);
        rows.push(row);
    }

    Some(Dataset::new(rows))
}

#[async_trait]
impl StatsProvider for NbaStatsProvider {
    fn source(&self) -> DataSource {
        DataSource::Primary
    }

    async fn probe(&self) -> bool {
        info!("Testing NBA Stats API connectivity...");
        match self.client.probe(&self.probe_url).await {
            Ok(()) => {
                info!("NBA Stats API is reachable");
                true
            }
            Err(e) => {
                warn!("NBA Stats API connectivity probe failed: {}", e);
                false
            }
        }
    }

    async fn fetch(&self, season: Season) -> Dataset {
        info!("Fetching {} per-game stats from NBA Stats API", season);

        let payload = match self.client.get_json(&self.dashboard_url(), &dashboard_params(season)).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("NBA Stats API request failed: {}", e);
                return Dataset::empty();
            }
        };

        match parse_league_dashboard(&payload) {
            Some(dataset) => {
                info!("Retrieved {} player records from NBA Stats API", dataset.len());
                dataset
            }
            None => {
                warn!("NBA Stats API response did not contain a usable result set");
                Dataset::empty()
            }
        }
    }
}

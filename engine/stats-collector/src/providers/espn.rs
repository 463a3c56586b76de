use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{json_number, StatsProvider};
use crate::config::EspnConfig;
use crate::http::RateLimitedClient;
use crate::types::{Column, DataSource, Dataset, PlayerRow, Season};

/// ESPN athletes listing, walked page by page
pub struct EspnProvider {
    client: RateLimitedClient,
    base_url: String,
    paging: EspnConfig,
}

/// One parsed page of the listing
#[derive(Debug, Default)]
pub struct AthletePage {
    pub rows: Vec<PlayerRow>,
    /// Total pages reported by the server, when present
    pub page_count: Option<u32>,
    /// Athletes on the page before filtering
    pub raw_count: usize,
}

impl EspnProvider {
    pub fn new(client: RateLimitedClient, base_url: impl Into<String>, paging: EspnConfig) -> Self {
        Self { client, base_url: base_url.into(), paging }
    }

    fn athletes_url(&self) -> String {
        format!("{}/athletes", self.base_url.trim_end_matches('/'))
    }

    fn page_params(&self, season: Season, page: u32) -> Vec<(String, String)> {
        vec![
            ("season".to_string(), season.end_year().to_string()),
            ("limit".to_string(), self.paging.page_limit.to_string()),
            ("page".to_string(), page.to_string()),
        ]
    }
}

/// Map a `(category, stat)` pair onto a canonical column
fn stat_column(category: &str, stat: &str) -> Option<Column> {
    match (category, stat) {
        ("games", "gamesPlayed") => Some(Column::GamesPlayed),
        ("games", "minutesPerGame") => Some(Column::Minutes),
        ("scoring", "pointsPerGame") => Some(Column::Points),
        ("scoring", "fieldGoalPercentage") => Some(Column::FieldGoalPct),
        ("scoring", "threePointPercentage") => Some(Column::ThreePointPct),
        ("scoring", "freeThrowPercentage") => Some(Column::FreeThrowPct),
        ("rebounds", "reboundsPerGame") => Some(Column::Rebounds),
        ("rebounds", "defensiveReboundsPerGame") => Some(Column::DefensiveRebounds),
        ("assists", "assistsPerGame") => Some(Column::Assists),
        ("steals", "stealsPerGame") => Some(Column::Steals),
        ("blocks", "blocksPerGame") => Some(Column::Blocks),
        ("turnovers", "turnoversPerGame") => Some(Column::Turnovers),
        _ => None,
    }
}

/// ESPN reports every percentage on a 0-100 scale, even below 1%
fn stat_value(column: Column, stat: &Value) -> f64 {
    let value = stat.get("value").map(json_number).unwrap_or(0.0);
    if column.is_percentage() {
        value / 100.0
    } else {
        value
    }
}

fn parse_athlete(athlete: &Value, fallback_id: u32) -> Option<PlayerRow> {
    let categories = athlete
        .get("statistics")?
        .get("splits")?
        .get("categories")
        .and_then(Value::as_array)?;

    let mut row = PlayerRow::default();
    row.set_text(
        Column::PlayerName,
        athlete.get("displayName").and_then(Value::as_str).unwrap_or_default(),
    );
    row.set_text(
        Column::TeamAbbreviation,
        athlete
            .get("team")
            .and_then(|team| team.get("abbreviation"))
            .and_then(Value::as_str)
            .unwrap_or_default(),
    );
    row.set_number(Column::Age, athlete.get("age").map(json_number).unwrap_or(0.0));
    row.player_id = athlete
        .get("id")
        .map(json_number)
        .filter(|id| *id > 0.0)
        .map(|id| id as u32)
        .unwrap_or(fallback_id);

    let mut provided = Vec::new();
    for category in categories {
        let name = category.get("name").and_then(Value::as_str).unwrap_or_default();
        let stats = category.get("stats").and_then(Value::as_array);

        // Older payloads carry games played as the first, unnamed stat
        if name == "games" {
            if let Some(first) = stats.and_then(|s| s.first()) {
                row.set_number(Column::GamesPlayed, first.get("value").map(json_number).unwrap_or(0.0));
                provided.push(Column::GamesPlayed);
            }
        }

        for stat in stats.into_iter().flatten() {
            let stat_name = stat.get("name").and_then(Value::as_str).unwrap_or_default();
            if let Some(column) = stat_column(name, stat_name) {
                row.set_number(column, stat_value(column, stat));
                provided.push(column);
            }
        }
    }

    row.fill_derived(&provided);
    Some(row)
}

/// Parse one listing page.
///
/// Returns `None` when the payload has no `athletes` array. Athletes without
/// games played or points are dropped.
pub fn parse_athletes(payload: &Value, first_id: u32) -> Option<AthletePage> {
    let athletes = payload.get("athletes")?.as_array()?;
    let page_count = payload.get("pageCount").and_then(Value::as_u64).map(|n| n as u32);

    let rows = athletes
        .iter()
        .enumerate()
        .filter_map(|(i, athlete)| parse_athlete(athlete, first_id + i as u32))
        .filter(|row| row.games_played > 0 && row.points > 0.0 && !row.player_name.is_empty())
        .collect();

    Some(AthletePage { rows, page_count, raw_count: athletes.len() })
}

#[async_trait]
impl StatsProvider for EspnProvider {
    fn source(&self) -> DataSource {
        DataSource::Tertiary
    }

    async fn fetch(&self, season: Season) -> Dataset {
        info!("Fetching {} stats from ESPN API", season);
        let url = self.athletes_url();
        let mut rows: Vec<PlayerRow> = Vec::new();
        let mut seen = 0u32;

        for page in 1..=self.paging.max_pages.max(1) {
            let payload = match self.client.get_json(&url, &self.page_params(season, page)).await {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(page, "ESPN API request failed: {}", e);
                    break;
                }
            };

            let Some(parsed) = parse_athletes(&payload, seen + 1) else {
                warn!(page, "No athletes data found in ESPN API response");
                break;
            };

            debug!(page, athletes = parsed.raw_count, kept = parsed.rows.len(), "Parsed ESPN page");
            if parsed.raw_count == 0 {
                break;
            }

            seen += parsed.raw_count as u32;
            rows.extend(parsed.rows);

            if parsed.page_count.is_some_and(|count| page >= count) {
                break;
            }
        }

        if rows.is_empty() {
            warn!("No player data found in ESPN API response");
        } else {
            info!("Retrieved {} players from ESPN API", rows.len());
        }
        Dataset::new(rows)
    }
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use super::StatsProvider;
use crate::http::RateLimitedClient;
use crate::types::{Column, DataSource, Dataset, PlayerRow, Season};

/// Personal fouls assumed when the table has no PF column
pub const DEFAULT_PERSONAL_FOULS: f64 = 2.5;

/// Site headers mapped onto canonical columns; anything else is dropped
const HEADER_MAP: &[(&str, Column)] = &[
    ("Player", Column::PlayerName),
    ("Tm", Column::TeamAbbreviation),
    ("Team", Column::TeamAbbreviation),
    ("Age", Column::Age),
    ("G", Column::GamesPlayed),
    ("MP", Column::Minutes),
    ("PTS", Column::Points),
    ("TRB", Column::Rebounds),
    ("AST", Column::Assists),
    ("STL", Column::Steals),
    ("BLK", Column::Blocks),
    ("TOV", Column::Turnovers),
    ("FG%", Column::FieldGoalPct),
    ("3P%", Column::ThreePointPct),
    ("FT%", Column::FreeThrowPct),
    ("DRB", Column::DefensiveRebounds),
    ("PF", Column::PersonalFouls),
];

/// basketball-reference.com per-game league table
pub struct BasketballReferenceProvider {
    client: RateLimitedClient,
    base_url: String,
}

impl BasketballReferenceProvider {
    pub fn new(client: RateLimitedClient, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    /// Season pages are keyed by the year the season ends
    pub fn season_url(&self, season: Season) -> String {
        format!(
            "{}/leagues/NBA_{}_per_game.html",
            self.base_url.trim_end_matches('/'),
            season.end_year()
        )
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Failed to create selector {}: {}", css, e))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Parse the `per_game_stats` table out of a season page
pub fn parse_per_game_table(html: &str) -> Result<Dataset> {
    let document = Html::parse_document(html);

    let table_selector = selector("table#per_game_stats")?;
    let header_row_selector = selector("thead tr")?;
    let header_cell_selector = selector("th")?;
    let body_row_selector = selector("tbody tr")?;
    let cell_selector = selector("td, th")?;

    let table = document
        .select(&table_selector)
        .next()
        .context("Could not find stats table on Basketball Reference")?;

    let header_row = table.select(&header_row_selector).next().context("Stats table has no header row")?;
    let headers: Vec<Option<Column>> = header_row
        .select(&header_cell_selector)
        .map(|th| {
            let text = cell_text(th);
            HEADER_MAP.iter().find(|(name, _)| *name == text).map(|(_, column)| *column)
        })
        .collect();

    let provided: Vec<Column> = headers.iter().flatten().copied().collect();
    let mut rows = Vec::new();

    for tr in table.select(&body_row_selector) {
        // Repeated header rows inside the body
        if tr.value().classes().any(|class| class == "thead") {
            continue;
        }

        let cells: Vec<String> = tr.select(&cell_selector).map(cell_text).collect();
        if cells.len() <= 1 {
            continue;
        }

        let mut row = PlayerRow::default();
        for (column, text) in headers.iter().zip(&cells) {
            if let Some(column) = column {
                row.set_text(*column, text);
            }
        }

        if row.player_name.is_empty() || row.player_name == "League Average" {
            continue;
        }

        row.player_id = rows.len() as u32 + 1;
        if !provided.contains(&Column::PersonalFouls) {
            row.personal_fouls = DEFAULT_PERSONAL_FOULS;
        }
        row.fill_derived(&provided);
        rows.push(row);
    }

    Ok(Dataset::new(rows))
}

#[async_trait]
impl StatsProvider for BasketballReferenceProvider {
    fn source(&self) -> DataSource {
        DataSource::Secondary
    }

    async fn fetch(&self, season: Season) -> Dataset {
        let url = self.season_url(season);
        info!("Fetching {} stats from Basketball Reference: {}", season, url);

        let html = match self.client.get_text(&url, &[]).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Basketball Reference request failed: {}", e);
                return Dataset::empty();
            }
        };

        match parse_per_game_table(&html) {
            Ok(dataset) => {
                info!("Retrieved {} players from Basketball Reference", dataset.len());
                dataset
            }
            Err(e) => {
                warn!("Error scraping Basketball Reference: {}", e);
                Dataset::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::client_with;
    use crate::http::RawResponse;

    const PAGE: &str = r#"
        <html><body>
        <table id="per_game_stats">
          <thead>
            <tr><th>Rk</th><th>Player</th><th>Age</th><th>Tm</th><th>G</th><th>MP</th>
                <th>FG%</th><th>3P%</th><th>FT%</th><th>TRB</th><th>AST</th><th>STL</th>
                <th>BLK</th><th>TOV</th><th>PTS</th></tr>
          </thead>
          <tbody>
            <tr><th>1</th><td>Joel Embiid</td><td>29</td><td>PHI</td><td>39</td><td>33.6</td>
                <td>.529</td><td>.388</td><td>.883</td><td>11.0</td><td>5.6</td><td>1.2</td>
                <td>1.7</td><td>3.8</td><td>34.7</td></tr>
            <tr class="thead"><th>Rk</th><th>Player</th></tr>
            <tr><th>2</th><td>Luka Doncic</td><td>24</td><td>DAL</td><td>70</td><td>37.5</td>
                <td>.487</td><td></td><td>.786</td><td>9.2</td><td>9.8</td><td>1.4</td>
                <td>0.5</td><td>4.0</td><td>33.9</td></tr>
            <tr><th>3</th><td></td></tr>
            <tr><td></td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_maps_site_headers() {
        let dataset = parse_per_game_table(PAGE).unwrap();
        assert_eq!(dataset.len(), 2);

        let embiid = &dataset.rows()[0];
        assert_eq!(embiid.player_id, 1);
        assert_eq!(embiid.player_name, "Joel Embiid");
        assert_eq!(embiid.team_abbreviation, "PHI");
        assert_eq!(embiid.age, 29);
        assert_eq!(embiid.points, 34.7);
        assert_eq!(embiid.fg_pct, 0.529);
        assert_eq!(embiid.personal_fouls, DEFAULT_PERSONAL_FOULS);
        assert_eq!(embiid.defensive_rebounds, 7.7);
    }

    #[test]
    fn test_blank_cells_become_zero() {
        let dataset = parse_per_game_table(PAGE).unwrap();
        let luka = dataset.lookup("doncic").unwrap();
        assert_eq!(luka.fg3_pct, 0.0);
        assert_eq!(luka.player_id, 2);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let err = parse_per_game_table("<html><table id=\"other\"></table></html>").unwrap_err();
        assert!(err.to_string().contains("Could not find stats table"));
    }

    #[test]
    fn test_season_url_uses_end_year() {
        let (client, _) = client_with(vec![]);
        let provider = BasketballReferenceProvider::new(client, "https://bbref.test/");
        assert_eq!(
            provider.season_url(Season::new(2023)),
            "https://bbref.test/leagues/NBA_2024_per_game.html"
        );
    }

    #[tokio::test]
    async fn test_fetch_scrapes_page() {
        let (client, _) = client_with(vec![Ok(RawResponse::new(200, PAGE))]);
        let provider = BasketballReferenceProvider::new(client, "https://bbref.test");

        let dataset = provider.fetch(Season::new(2023)).await;
        assert_eq!(dataset.player_names(), vec!["Joel Embiid", "Luka Doncic"]);
    }

    #[tokio::test]
    async fn test_fetch_without_table_is_empty() {
        let (client, _) = client_with(vec![Ok(RawResponse::new(200, "<html></html>"))]);
        let provider = BasketballReferenceProvider::new(client, "https://bbref.test");

        assert!(provider.fetch(Season::new(2023)).await.is_empty());
    }
}

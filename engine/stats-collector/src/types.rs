use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// NBA season identified by the calendar year it starts in (e.g. 2023 for "2023-24")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Season {
    start_year: u16,
}

impl Season {
    pub fn new(start_year: u16) -> Self {
        Self { start_year }
    }

    /// Label in the "2023-24" form used by the stats API
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.start_year, (self.start_year + 1) % 100)
    }

    /// Calendar year the season ends in, used by the scrape and REST providers
    pub fn end_year(&self) -> u16 {
        self.start_year + 1
    }
}

impl Default for Season {
    fn default() -> Self {
        Self::new(2023)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) =
            s.trim().split_once('-').ok_or_else(|| format!("Invalid season format: {s}"))?;
        let start_year: u16 = start.parse().map_err(|_| format!("Invalid season year: {s}"))?;
        let end_suffix: u16 = end.parse().map_err(|_| format!("Invalid season suffix: {s}"))?;
        if (start_year + 1) % 100 != end_suffix % 100 {
            return Err(format!("Season years are not consecutive: {s}"));
        }
        Ok(Self::new(start_year))
    }
}

impl TryFrom<String> for Season {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        season.label()
    }
}

/// Where a dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    /// stats.nba.com league dashboard
    Primary,
    /// basketball-reference.com per-game table
    Secondary,
    /// ESPN athletes REST listing
    Tertiary,
    /// Locally generated placeholder data
    Synthetic,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Primary => write!(f, "NBA Stats API"),
            DataSource::Secondary => write!(f, "Basketball Reference"),
            DataSource::Tertiary => write!(f, "ESPN API"),
            DataSource::Synthetic => write!(f, "Synthetic"),
        }
    }
}

/// Columns of the canonical file, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    PlayerId,
    PlayerName,
    TeamAbbreviation,
    Age,
    GamesPlayed,
    Minutes,
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    FieldGoalPct,
    ThreePointPct,
    FreeThrowPct,
    DefensiveRebounds,
    PersonalFouls,
    Efficiency,
}

impl Column {
    pub const ALL: [Column; 18] = [
        Column::PlayerId,
        Column::PlayerName,
        Column::TeamAbbreviation,
        Column::Age,
        Column::GamesPlayed,
        Column::Minutes,
        Column::Points,
        Column::Rebounds,
        Column::Assists,
        Column::Steals,
        Column::Blocks,
        Column::Turnovers,
        Column::FieldGoalPct,
        Column::ThreePointPct,
        Column::FreeThrowPct,
        Column::DefensiveRebounds,
        Column::PersonalFouls,
        Column::Efficiency,
    ];

    /// Header used in the canonical file
    pub fn header(&self) -> &'static str {
        match self {
            Column::PlayerId => "PLAYER_ID",
            Column::PlayerName => "PLAYER_NAME",
            Column::TeamAbbreviation => "TEAM_ABBREVIATION",
            Column::Age => "AGE",
            Column::GamesPlayed => "GP",
            Column::Minutes => "MIN",
            Column::Points => "PTS",
            Column::Rebounds => "REB",
            Column::Assists => "AST",
            Column::Steals => "STL",
            Column::Blocks => "BLK",
            Column::Turnovers => "TOV",
            Column::FieldGoalPct => "FG_PCT",
            Column::ThreePointPct => "FG3_PCT",
            Column::FreeThrowPct => "FT_PCT",
            Column::DefensiveRebounds => "DREB",
            Column::PersonalFouls => "PF",
            Column::Efficiency => "EFF",
        }
    }

    /// Resolve a canonical header name; unknown columns yield `None`
    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.header() == header)
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, Column::FieldGoalPct | Column::ThreePointPct | Column::FreeThrowPct)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Column::PlayerName | Column::TeamAbbreviation)
    }
}

/// One player-season observation in the canonical schema.
///
/// Numeric fields are never missing: absent or unparseable source values
/// become 0 so downstream arithmetic is total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRow {
    #[serde(rename = "PLAYER_ID", deserialize_with = "lenient::count")]
    pub player_id: u32,
    #[serde(rename = "PLAYER_NAME")]
    pub player_name: String,
    #[serde(rename = "TEAM_ABBREVIATION")]
    pub team_abbreviation: String,
    #[serde(rename = "AGE", deserialize_with = "lenient::count")]
    pub age: u32,
    #[serde(rename = "GP", deserialize_with = "lenient::count")]
    pub games_played: u32,
    #[serde(rename = "MIN", deserialize_with = "lenient::number")]
    pub minutes: f64,
    #[serde(rename = "PTS", deserialize_with = "lenient::number")]
    pub points: f64,
    #[serde(rename = "REB", deserialize_with = "lenient::number")]
    pub rebounds: f64,
    #[serde(rename = "AST", deserialize_with = "lenient::number")]
    pub assists: f64,
    #[serde(rename = "STL", deserialize_with = "lenient::number")]
    pub steals: f64,
    #[serde(rename = "BLK", deserialize_with = "lenient::number")]
    pub blocks: f64,
    #[serde(rename = "TOV", deserialize_with = "lenient::number")]
    pub turnovers: f64,
    #[serde(rename = "FG_PCT", deserialize_with = "lenient::number")]
    pub fg_pct: f64,
    #[serde(rename = "FG3_PCT", deserialize_with = "lenient::number")]
    pub fg3_pct: f64,
    #[serde(rename = "FT_PCT", deserialize_with = "lenient::number")]
    pub ft_pct: f64,
    #[serde(rename = "DREB", deserialize_with = "lenient::number")]
    pub defensive_rebounds: f64,
    #[serde(rename = "PF", deserialize_with = "lenient::number")]
    pub personal_fouls: f64,
    #[serde(rename = "EFF", deserialize_with = "lenient::number")]
    pub efficiency: f64,
}

impl Default for PlayerRow {
    fn default() -> Self {
        Self {
            player_id: 0,
            player_name: String::new(),
            team_abbreviation: UNKNOWN_TEAM.to_string(),
            age: 0,
            games_played: 0,
            minutes: 0.0,
            points: 0.0,
            rebounds: 0.0,
            assists: 0.0,
            steals: 0.0,
            blocks: 0.0,
            turnovers: 0.0,
            fg_pct: 0.0,
            fg3_pct: 0.0,
            ft_pct: 0.0,
            defensive_rebounds: 0.0,
            personal_fouls: 0.0,
            efficiency: 0.0,
        }
    }
}

pub const UNKNOWN_TEAM: &str = "Unknown";

impl PlayerRow {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self { player_name: player_name.into(), ..Self::default() }
    }

    /// Numeric view of a column; text columns read as 0
    pub fn value(&self, column: Column) -> f64 {
        let raw = match column {
            Column::PlayerId => self.player_id as f64,
            Column::PlayerName | Column::TeamAbbreviation => 0.0,
            Column::Age => self.age as f64,
            Column::GamesPlayed => self.games_played as f64,
            Column::Minutes => self.minutes,
            Column::Points => self.points,
            Column::Rebounds => self.rebounds,
            Column::Assists => self.assists,
            Column::Steals => self.steals,
            Column::Blocks => self.blocks,
            Column::Turnovers => self.turnovers,
            Column::FieldGoalPct => self.fg_pct,
            Column::ThreePointPct => self.fg3_pct,
            Column::FreeThrowPct => self.ft_pct,
            Column::DefensiveRebounds => self.defensive_rebounds,
            Column::PersonalFouls => self.personal_fouls,
            Column::Efficiency => self.efficiency,
        };
        finite_or_zero(raw)
    }

    /// Set a numeric column, normalising the value into the column's domain
    pub fn set_number(&mut self, column: Column, value: f64) {
        let value = finite_or_zero(value);
        let count = value.max(0.0).round() as u32;
        let volume = value.max(0.0);
        match column {
            Column::PlayerId => self.player_id = count,
            Column::PlayerName | Column::TeamAbbreviation => {}
            Column::Age => self.age = count,
            Column::GamesPlayed => self.games_played = count,
            Column::Minutes => self.minutes = volume,
            Column::Points => self.points = volume,
            Column::Rebounds => self.rebounds = volume,
            Column::Assists => self.assists = volume,
            Column::Steals => self.steals = volume,
            Column::Blocks => self.blocks = volume,
            Column::Turnovers => self.turnovers = volume,
            Column::FieldGoalPct => self.fg_pct = normalize_pct(value),
            Column::ThreePointPct => self.fg3_pct = normalize_pct(value),
            Column::FreeThrowPct => self.ft_pct = normalize_pct(value),
            Column::DefensiveRebounds => self.defensive_rebounds = volume,
            Column::PersonalFouls => self.personal_fouls = volume,
            Column::Efficiency => self.efficiency = value,
        }
    }

    /// Set a column from source text; numeric columns coerce, falling back to 0
    pub fn set_text(&mut self, column: Column, text: &str) {
        let text = text.trim();
        match column {
            Column::PlayerName => self.player_name = text.to_string(),
            Column::TeamAbbreviation => {
                self.team_abbreviation =
                    if text.is_empty() { UNKNOWN_TEAM.to_string() } else { text.to_string() };
            }
            _ => self.set_number(column, parse_number(text)),
        }
    }

    /// Fill derived columns the source did not provide
    pub fn fill_derived(&mut self, provided: &[Column]) {
        if !provided.contains(&Column::DefensiveRebounds) {
            self.defensive_rebounds = round_to(self.rebounds * 0.7, 2);
        }
        if !provided.contains(&Column::Efficiency) {
            self.efficiency = round_to(approximate_efficiency(self), 2);
        }
    }
}

/// `PTS + 1.2*REB + 1.5*AST + 2*STL + 2*BLK - TOV`
pub fn approximate_efficiency(row: &PlayerRow) -> f64 {
    row.points + row.rebounds * 1.2 + row.assists * 1.5 + row.steals * 2.0 + row.blocks * 2.0
        - row.turnovers
}

/// Parse a numeric cell; blanks, dashes and garbage become 0
pub fn parse_number(text: &str) -> f64 {
    let cleaned = text.trim().trim_end_matches('%');
    cleaned.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

/// Percentages reported on a 0-100 scale are brought into [0, 1]
pub fn normalize_pct(value: f64) -> f64 {
    let value = finite_or_zero(value);
    let value = if value > 1.0 { value / 100.0 } else { value };
    value.clamp(0.0, 1.0)
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Ordered collection of canonical rows.
///
/// Keyed logically by player name; duplicates are allowed and lookups take
/// the first match. A dataset is never edited in place once published.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<PlayerRow>,
}

impl Dataset {
    pub fn new(rows: Vec<PlayerRow>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[PlayerRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRow> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<PlayerRow> {
        self.rows
    }

    /// Case-insensitive substring match on player name, first in dataset order
    pub fn lookup(&self, name: &str) -> Option<&PlayerRow> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.rows.iter().find(|row| row.player_name.to_lowercase().contains(&needle))
    }

    /// Rows whose team abbreviation contains `team` (case-insensitive)
    pub fn team_rows(&self, team: &str) -> Vec<&PlayerRow> {
        let needle = team.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.rows
            .iter()
            .filter(|row| row.team_abbreviation.to_lowercase().contains(&needle))
            .collect()
    }

    /// Top `n` rows by a column, descending; ties keep dataset order
    pub fn top_by(&self, column: Column, n: usize) -> Vec<&PlayerRow> {
        let mut ranked: Vec<&PlayerRow> = self.rows.iter().collect();
        ranked.sort_by(|a, b| {
            b.value(column).partial_cmp(&a.value(column)).unwrap_or(Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }

    /// Mean of a column over all rows; 0 for an empty dataset
    pub fn mean(&self, column: Column) -> f64 {
        mean_of(self.rows.iter(), column)
    }

    pub fn player_names(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.player_name.clone()).collect()
    }
}

impl FromIterator<PlayerRow> for Dataset {
    fn from_iter<I: IntoIterator<Item = PlayerRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Mean of a column over any row selection; 0 when the selection is empty
pub fn mean_of<'a>(rows: impl Iterator<Item = &'a PlayerRow>, column: Column) -> f64 {
    let (sum, count) = rows.fold((0.0, 0usize), |(sum, count), row| (sum + row.value(column), count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Rows produced by one cascade stage
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResult {
    pub rows: Dataset,
    pub source: DataSource,
}

/// Lenient numeric deserializers for the canonical file
mod lenient {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, a numeric string, or an empty cell")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(super::finite_or_zero(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(super::parse_number(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<f64, D::Error> {
            d.deserialize_any(NumberVisitor)
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        d.deserialize_any(NumberVisitor)
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let value = d.deserialize_any(NumberVisitor)?;
        Ok(value.max(0.0).round() as u32)
    }
}

//! Generated analysis for a player, a team, or the whole league

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use stats_collector::types::{mean_of, Column, Dataset, PlayerRow};

use crate::error::InsightError;
use crate::generator::InsightGenerator;
use crate::scores::PlayerScores;

/// Text returned in place of a failed completion
pub const ANALYSIS_UNAVAILABLE: &str = "Analysis unavailable";

const PLAYER_MAX_TOKENS: u32 = 600;
const TEAM_MAX_TOKENS: u32 = 500;
const LEAGUE_MAX_TOKENS: u32 = 500;
const SUMMARY_MAX_TOKENS: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum AnalysisTarget {
    Player(String),
    Team(String),
    League,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysis_type", rename_all = "snake_case")]
pub enum AnalysisReport {
    Player {
        player_name: String,
        team: String,
        stats: PlayerRow,
        analysis: String,
    },
    Team {
        team: String,
        player_count: usize,
        team_averages: BTreeMap<String, f64>,
        analysis: String,
    },
    #[serde(rename = "league_wide")]
    League {
        league_averages: BTreeMap<String, f64>,
        analysis: String,
    },
}

impl AnalysisReport {
    pub fn analysis(&self) -> &str {
        match self {
            AnalysisReport::Player { analysis, .. }
            | AnalysisReport::Team { analysis, .. }
            | AnalysisReport::League { analysis, .. } => analysis,
        }
    }
}

/// Mean of every numeric column except the identifier, keyed by header
pub fn column_averages(rows: &[&PlayerRow]) -> BTreeMap<String, f64> {
    Column::ALL
        .iter()
        .filter(|column| !column.is_text() && **column != Column::PlayerId)
        .map(|column| (column.header().to_string(), mean_of(rows.iter().copied(), *column)))
        .collect()
}

fn average(averages: &BTreeMap<String, f64>, column: Column) -> f64 {
    averages.get(column.header()).copied().unwrap_or(0.0)
}

fn player_prompt(row: &PlayerRow) -> String {
    format!(
        r#"
Analyze this NBA player's performance and provide insights:

Player: {}
Team: {}
Games: {}
Minutes: {:.1} per game
Points: {:.1} per game
Rebounds: {:.1} per game
Assists: {:.1} per game
Steals: {:.1} per game
Blocks: {:.1} per game
FG%: {:.3}
3P%: {:.3}
FT%: {:.3}

Provide a detailed analysis covering:
1. Strengths and weaknesses
2. Efficiency analysis
3. Role and impact on team
4. Areas for improvement
5. Comparison to league averages

Write in a professional but engaging tone.
"#,
        row.player_name,
        row.team_abbreviation,
        row.games_played,
        row.minutes,
        row.points,
        row.rebounds,
        row.assists,
        row.steals,
        row.blocks,
        row.fg_pct,
        row.fg3_pct,
        row.ft_pct,
    )
}

fn team_prompt(team: &str, player_count: usize, averages: &BTreeMap<String, f64>) -> String {
    format!(
        r#"
Analyze this NBA team's performance:

Team: {}
Players: {}
Average Points: {:.1} per game
Average Rebounds: {:.1} per game
Average Assists: {:.1} per game
Average FG%: {:.3}
Average 3P%: {:.3}

Provide analysis covering:
1. Team strengths and weaknesses
2. Playing style assessment
3. Key players' contributions
4. Areas for improvement
5. Overall team efficiency

Write in a professional tone.
"#,
        team,
        player_count,
        average(averages, Column::Points),
        average(averages, Column::Rebounds),
        average(averages, Column::Assists),
        average(averages, Column::FieldGoalPct),
        average(averages, Column::ThreePointPct),
    )
}

fn league_prompt(averages: &BTreeMap<String, f64>) -> String {
    format!(
        r#"
Analyze current NBA league trends based on these averages:

League Averages:
- Points per game: {:.1}
- Rebounds per game: {:.1}
- Assists per game: {:.1}
- Field Goal %: {:.3}
- Three Point %: {:.3}
- Free Throw %: {:.3}

Provide analysis covering:
1. Current league trends
2. Offensive vs defensive balance
3. Three-point shooting impact
4. Pace of play observations
5. Notable statistical patterns

Write in a professional tone.
"#,
        average(averages, Column::Points),
        average(averages, Column::Rebounds),
        average(averages, Column::Assists),
        average(averages, Column::FieldGoalPct),
        average(averages, Column::ThreePointPct),
        average(averages, Column::FreeThrowPct),
    )
}

fn summary_prompt(row: &PlayerRow, scores: &PlayerScores) -> String {
    format!(
        r#"
Provide a brief 2-3 sentence analysis of this NBA player:

Name: {}
Offensive Score: {}
Defensive Score: {}
Points: {:.1} PPG
Assists: {:.1} APG
Rebounds: {:.1} RPG

Focus on their playing style and impact.
"#,
        row.player_name,
        scores.offensive_score,
        scores.defensive_score,
        row.points,
        row.assists,
        row.rebounds,
    )
}

impl InsightGenerator {
    async fn analysis_text(&self, prompt: &str, max_tokens: u32) -> String {
        self.complete(prompt, max_tokens).await.unwrap_or_else(|| ANALYSIS_UNAVAILABLE.to_string())
    }

    /// Figures for the target plus generated commentary
    pub async fn analyze(
        &self,
        dataset: &Dataset,
        target: &AnalysisTarget,
    ) -> Result<AnalysisReport, InsightError> {
        if dataset.is_empty() {
            return Err(InsightError::EmptyDataset);
        }

        match target {
            AnalysisTarget::Player(name) => {
                let row = dataset
                    .lookup(name)
                    .ok_or_else(|| InsightError::PlayerNotFound(name.clone()))?;
                let analysis = self.analysis_text(&player_prompt(row), PLAYER_MAX_TOKENS).await;
                Ok(AnalysisReport::Player {
                    player_name: row.player_name.clone(),
                    team: row.team_abbreviation.clone(),
                    stats: row.clone(),
                    analysis,
                })
            }
            AnalysisTarget::Team(team) => {
                let rows = dataset.team_rows(team);
                if rows.is_empty() {
                    return Err(InsightError::TeamNotFound(team.clone()));
                }
                let averages = column_averages(&rows);
                let analysis =
                    self.analysis_text(&team_prompt(team, rows.len(), &averages), TEAM_MAX_TOKENS).await;
                Ok(AnalysisReport::Team {
                    team: team.clone(),
                    player_count: rows.len(),
                    team_averages: averages,
                    analysis,
                })
            }
            AnalysisTarget::League => {
                let rows: Vec<&PlayerRow> = dataset.iter().collect();
                let averages = column_averages(&rows);
                let analysis = self.analysis_text(&league_prompt(&averages), LEAGUE_MAX_TOKENS).await;
                Ok(AnalysisReport::League { league_averages: averages, analysis })
            }
        }
    }

    /// Two or three sentences on one player, used by player lookup
    pub async fn player_summary(&self, row: &PlayerRow, scores: &PlayerScores) -> String {
        self.analysis_text(&summary_prompt(row, scores), SUMMARY_MAX_TOKENS).await
    }
}

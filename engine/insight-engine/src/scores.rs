//! Offensive and defensive composite scores
//!
//! Pure, total functions over one canonical row. Missing values are already
//! zero in the canonical schema and non-finite values read as zero, so every
//! score is defined for every row.

use serde::{Deserialize, Serialize};
use std::fmt;

use stats_collector::types::{round_to, Column, PlayerRow};

/// Qualitative band for a composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Elite,
    Excellent,
    Good,
    Average,
    #[serde(rename = "Below Average")]
    BelowAverage,
}

impl Rating {
    /// Bands with inclusive lower bounds 25 / 20 / 15 / 10
    pub fn offensive(score: f64) -> Self {
        Self::banded(score, [25.0, 20.0, 15.0, 10.0])
    }

    /// Bands with inclusive lower bounds 8 / 6 / 4 / 2
    pub fn defensive(score: f64) -> Self {
        Self::banded(score, [8.0, 6.0, 4.0, 2.0])
    }

    fn banded(score: f64, bounds: [f64; 4]) -> Self {
        if score >= bounds[0] {
            Rating::Elite
        } else if score >= bounds[1] {
            Rating::Excellent
        } else if score >= bounds[2] {
            Rating::Good
        } else if score >= bounds[3] {
            Rating::Average
        } else {
            Rating::BelowAverage
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Elite => "Elite",
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::BelowAverage => "Below Average",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `0.30*PTS + 0.20*FG% + 0.15*3P% + 0.10*FT% + 0.15*AST - 0.10*TOV`,
/// percentages on a 0-100 scale, clamped at 0 and rounded to 2 decimals
pub fn offensive_score(row: &PlayerRow) -> f64 {
    let score = row.value(Column::Points) * 0.3
        + row.value(Column::FieldGoalPct) * 100.0 * 0.2
        + row.value(Column::ThreePointPct) * 100.0 * 0.15
        + row.value(Column::FreeThrowPct) * 100.0 * 0.1
        + row.value(Column::Assists) * 0.15
        - row.value(Column::Turnovers) * 0.1;
    round_to(score.max(0.0), 2)
}

/// `2*STL + 2*BLK + 0.5*DREB - 0.5*PF`, clamped at 0 and rounded to 2 decimals
pub fn defensive_score(row: &PlayerRow) -> f64 {
    let score = row.value(Column::Steals) * 2.0
        + row.value(Column::Blocks) * 2.0
        + row.value(Column::DefensiveRebounds) * 0.5
        - row.value(Column::PersonalFouls) * 0.5;
    round_to(score.max(0.0), 2)
}

/// Both scores and their ratings for one row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerScores {
    pub offensive_score: f64,
    pub defensive_score: f64,
    pub offensive_rating: Rating,
    pub defensive_rating: Rating,
}

impl PlayerScores {
    pub fn for_row(row: &PlayerRow) -> Self {
        let offensive = offensive_score(row);
        let defensive = defensive_score(row);
        Self {
            offensive_score: offensive,
            defensive_score: defensive,
            offensive_rating: Rating::offensive(offensive),
            defensive_rating: Rating::defensive(defensive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> PlayerRow {
        PlayerRow {
            points: 30.0,
            fg_pct: 0.50,
            fg3_pct: 0.40,
            ft_pct: 0.90,
            assists: 8.0,
            turnovers: 3.0,
            ..PlayerRow::new("Test Scorer")
        }
    }

    #[test]
    fn test_offensive_score_worked_example() {
        let score = offensive_score(&scorer());
        assert_eq!(score, 34.9);
        assert_eq!(Rating::offensive(score), Rating::Elite);
    }

    #[test]
    fn test_defensive_score() {
        let row = PlayerRow {
            steals: 1.5,
            blocks: 2.0,
            defensive_rebounds: 8.0,
            personal_fouls: 3.0,
            ..PlayerRow::new("Rim Protector")
        };
        // 3 + 4 + 4 - 1.5
        assert_eq!(defensive_score(&row), 9.5);
        assert_eq!(Rating::defensive(9.5), Rating::Elite);
    }

    #[test]
    fn test_scores_clamp_at_zero() {
        let row = PlayerRow { turnovers: 5.0, personal_fouls: 6.0, ..PlayerRow::new("Liability") };
        assert_eq!(offensive_score(&row), 0.0);
        assert_eq!(defensive_score(&row), 0.0);
    }

    #[test]
    fn test_non_finite_inputs_read_as_zero() {
        let row = PlayerRow { points: f64::NAN, assists: f64::INFINITY, ..PlayerRow::new("Broken") };
        assert_eq!(offensive_score(&row), 0.0);
    }

    #[test]
    fn test_rating_bands_are_inclusive() {
        assert_eq!(Rating::offensive(25.0), Rating::Elite);
        assert_eq!(Rating::offensive(24.99), Rating::Excellent);
        assert_eq!(Rating::offensive(15.0), Rating::Good);
        assert_eq!(Rating::offensive(10.0), Rating::Average);
        assert_eq!(Rating::offensive(9.99), Rating::BelowAverage);

        assert_eq!(Rating::defensive(6.0), Rating::Excellent);
        assert_eq!(Rating::defensive(4.0), Rating::Good);
        assert_eq!(Rating::defensive(2.0), Rating::Average);
        assert_eq!(Rating::defensive(1.99), Rating::BelowAverage);
    }

    #[test]
    fn test_rating_serializes_display_text() {
        assert_eq!(serde_json::to_string(&Rating::BelowAverage).unwrap(), "\"Below Average\"");
        assert_eq!(Rating::BelowAverage.to_string(), "Below Average");
    }

    #[test]
    fn test_player_scores_bundle() {
        let scores = PlayerScores::for_row(&scorer());
        assert_eq!(scores.offensive_score, 34.9);
        assert_eq!(scores.defensive_score, 0.0);
        assert_eq!(scores.defensive_rating, Rating::BelowAverage);
    }
}

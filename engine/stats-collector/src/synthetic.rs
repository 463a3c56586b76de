//! Deterministic placeholder datasets
//!
//! Used for explicit sample mode and as the terminal fallback of the
//! acquisition cascade. Generation is pure and cannot fail.

use serde::{Deserialize, Serialize};

use crate::types::{round_to, Dataset, PlayerRow};

/// Value distribution used for generated rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticProfile {
    /// Uniform modular bands across every player
    Basic,
    /// Three tiers (stars, starters, role players) with distinct scoring bands
    Tiered,
}

const BASIC_ROSTER: [(&str, &str); 50] = [
    ("LeBron James", "LAL"),
    ("Kevin Durant", "PHX"),
    ("Stephen Curry", "GSW"),
    ("Giannis Antetokounmpo", "MIL"),
    ("Nikola Jokic", "DEN"),
    ("Joel Embiid", "PHI"),
    ("Luka Doncic", "DAL"),
    ("Damian Lillard", "MIL"),
    ("Jayson Tatum", "BOS"),
    ("Devin Booker", "PHX"),
    ("Anthony Davis", "LAL"),
    ("Jimmy Butler", "MIA"),
    ("Kawhi Leonard", "LAC"),
    ("Paul George", "LAC"),
    ("Russell Westbrook", "LAC"),
    ("Chris Paul", "GSW"),
    ("Kyrie Irving", "DAL"),
    ("Bradley Beal", "PHX"),
    ("Donovan Mitchell", "CLE"),
    ("Zion Williamson", "NOP"),
    ("Ja Morant", "MEM"),
    ("Trae Young", "ATL"),
    ("De'Aaron Fox", "SAC"),
    ("Shai Gilgeous-Alexander", "OKC"),
    ("Tyrese Haliburton", "IND"),
    ("Bam Adebayo", "MIA"),
    ("Julius Randle", "NYK"),
    ("Pascal Siakam", "TOR"),
    ("Domantas Sabonis", "SAC"),
    ("Rudy Gobert", "MIN"),
    ("Karl-Anthony Towns", "MIN"),
    ("Anthony Edwards", "MIN"),
    ("Cade Cunningham", "DET"),
    ("Jalen Green", "HOU"),
    ("Scottie Barnes", "TOR"),
    ("Franz Wagner", "ORL"),
    ("Evan Mobley", "CLE"),
    ("Josh Giddey", "OKC"),
    ("Jalen Suggs", "ORL"),
    ("Jonathan Kuminga", "GSW"),
    ("Keegan Murray", "SAC"),
    ("Paolo Banchero", "ORL"),
    ("Jabari Smith Jr.", "HOU"),
    ("Chet Holmgren", "OKC"),
    ("Victor Wembanyama", "SAS"),
    ("Scoot Henderson", "POR"),
    ("Brandon Miller", "CHA"),
    ("Amen Thompson", "HOU"),
    ("Ausar Thompson", "DET"),
    ("Cam Whitmore", "DET"),
];

const TIERED_ROSTER: [(&str, &str); 50] = [
    ("Nikola Jokic", "DEN"),
    ("Joel Embiid", "PHI"),
    ("Giannis Antetokounmpo", "MIL"),
    ("Luka Doncic", "DAL"),
    ("Shai Gilgeous-Alexander", "OKC"),
    ("Kevin Durant", "PHX"),
    ("Stephen Curry", "GSW"),
    ("LeBron James", "LAL"),
    ("Damian Lillard", "MIL"),
    ("Anthony Davis", "LAL"),
    ("Jayson Tatum", "BOS"),
    ("Devin Booker", "PHX"),
    ("Jimmy Butler", "MIA"),
    ("Kawhi Leonard", "LAC"),
    ("Paul George", "LAC"),
    ("Russell Westbrook", "LAC"),
    ("Chris Paul", "GSW"),
    ("Kyrie Irving", "DAL"),
    ("Bradley Beal", "PHX"),
    ("Donovan Mitchell", "CLE"),
    ("Zion Williamson", "NOP"),
    ("Ja Morant", "MEM"),
    ("Trae Young", "ATL"),
    ("De'Aaron Fox", "SAC"),
    ("Tyrese Haliburton", "IND"),
    ("Bam Adebayo", "MIA"),
    ("Julius Randle", "NYK"),
    ("Pascal Siakam", "TOR"),
    ("Domantas Sabonis", "SAC"),
    ("Rudy Gobert", "MIN"),
    ("Karl-Anthony Towns", "MIN"),
    ("Anthony Edwards", "MIN"),
    ("Cade Cunningham", "DET"),
    ("Jalen Green", "HOU"),
    ("Scottie Barnes", "TOR"),
    ("Franz Wagner", "ORL"),
    ("Evan Mobley", "CLE"),
    ("Josh Giddey", "OKC"),
    ("Jalen Suggs", "ORL"),
    ("Jonathan Kuminga", "GSW"),
    ("Keegan Murray", "SAC"),
    ("Paolo Banchero", "ORL"),
    ("Jabari Smith Jr.", "HOU"),
    ("Chet Holmgren", "OKC"),
    ("Victor Wembanyama", "SAS"),
    ("Scoot Henderson", "POR"),
    ("Brandon Miller", "CHA"),
    ("Amen Thompson", "HOU"),
    ("Ausar Thompson", "DET"),
    ("Cam Whitmore", "DET"),
];

/// Generate the 50-player dataset for a profile
pub fn generate(profile: SyntheticProfile) -> Dataset {
    match profile {
        SyntheticProfile::Basic => BASIC_ROSTER
            .iter()
            .enumerate()
            .map(|(i, (name, team))| basic_row(i, name, team))
            .collect(),
        SyntheticProfile::Tiered => TIERED_ROSTER
            .iter()
            .enumerate()
            .map(|(i, (name, team))| tiered_row(i, name, team))
            .collect(),
    }
}

fn band(i: usize, modulus: usize) -> f64 {
    (i % modulus) as f64
}

fn basic_row(i: usize, name: &str, team: &str) -> PlayerRow {
    PlayerRow {
        player_id: i as u32 + 1,
        player_name: name.to_string(),
        team_abbreviation: team.to_string(),
        age: 25 + (i % 15) as u32,
        games_played: 60 + (i % 20) as u32,
        minutes: 30.0 + band(i, 10),
        points: 15.0 + band(i, 20),
        rebounds: 5.0 + band(i, 8),
        assists: 3.0 + band(i, 8),
        steals: 0.5 + band(i, 2),
        blocks: 0.3 + band(i, 2),
        turnovers: 2.0 + band(i, 3),
        fg_pct: round_to(0.40 + band(i, 20) * 0.01, 2),
        fg3_pct: round_to(0.30 + band(i, 20) * 0.01, 2),
        ft_pct: round_to(0.70 + band(i, 20) * 0.01, 2),
        defensive_rebounds: 3.0 + band(i, 6),
        personal_fouls: 2.0 + band(i, 3),
        efficiency: 15.0 + band(i, 15),
    }
}

fn tiered_row(i: usize, name: &str, team: &str) -> PlayerRow {
    let (points, assists, rebounds, fg_pct, fg3_pct) = if i < 10 {
        (
            25.0 + band(i, 8),
            5.0 + band(i, 6),
            8.0 + band(i, 5),
            0.48 + band(i, 8) * 0.01,
            0.35 + band(i, 10) * 0.01,
        )
    } else if i < 25 {
        (
            18.0 + band(i, 12),
            3.0 + band(i, 8),
            5.0 + band(i, 8),
            0.44 + band(i, 12) * 0.01,
            0.32 + band(i, 15) * 0.01,
        )
    } else {
        (
            12.0 + band(i, 15),
            2.0 + band(i, 6),
            3.0 + band(i, 8),
            0.42 + band(i, 15) * 0.01,
            0.30 + band(i, 20) * 0.01,
        )
    };

    PlayerRow {
        player_id: i as u32 + 1,
        player_name: name.to_string(),
        team_abbreviation: team.to_string(),
        age: 22 + (i % 18) as u32,
        games_played: 55 + (i % 25) as u32,
        minutes: 28.0 + band(i, 12),
        points,
        rebounds,
        assists,
        steals: round_to(0.8 + band(i, 3) * 0.2, 2),
        blocks: round_to(0.3 + band(i, 4) * 0.2, 2),
        turnovers: round_to(1.5 + band(i, 4) * 0.5, 2),
        fg_pct: round_to(fg_pct, 2),
        fg3_pct: round_to(fg3_pct, 2),
        ft_pct: round_to(0.75 + band(i, 20) * 0.01, 2),
        defensive_rebounds: round_to(rebounds * 0.7, 2),
        personal_fouls: 2.0 + band(i, 4),
        efficiency: 15.0 + band(i, 20),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    #[test]
    fn test_profiles_produce_fifty_unique_players() {
        for profile in [SyntheticProfile::Basic, SyntheticProfile::Tiered] {
            let dataset = generate(profile);
            assert_eq!(dataset.len(), 50);

            let mut names = dataset.player_names();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), 50, "{profile:?} has duplicate names");
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate(SyntheticProfile::Tiered), generate(SyntheticProfile::Tiered));
        assert_eq!(generate(SyntheticProfile::Basic), generate(SyntheticProfile::Basic));
    }

    #[test]
    fn test_tiered_stars_outscore_role_players() {
        let dataset = generate(SyntheticProfile::Tiered);
        let rows = dataset.rows();

        let stars = rows[..10].iter().map(|r| r.points).fold(f64::INFINITY, f64::min);
        assert!(stars >= 25.0);
        assert_eq!(rows[0].player_name, "Nikola Jokic");
        assert_eq!(rows[0].defensive_rebounds, 5.6);
    }

    #[test]
    fn test_values_stay_in_domain() {
        for profile in [SyntheticProfile::Basic, SyntheticProfile::Tiered] {
            for row in generate(profile).iter() {
                for column in [Column::FieldGoalPct, Column::ThreePointPct, Column::FreeThrowPct] {
                    let pct = row.value(column);
                    assert!((0.0..=1.0).contains(&pct), "{} {:?} = {}", row.player_name, column, pct);
                }
                assert!(row.points > 0.0);
                assert!(row.games_played > 0);
            }
        }
    }

    #[test]
    fn test_basic_first_row() {
        let dataset = generate(SyntheticProfile::Basic);
        let first = &dataset.rows()[0];

        assert_eq!(first.player_id, 1);
        assert_eq!(first.player_name, "LeBron James");
        assert_eq!(first.team_abbreviation, "LAL");
        assert_eq!(first.points, 15.0);
        assert_eq!(first.fg_pct, 0.4);
    }
}

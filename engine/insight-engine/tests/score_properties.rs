//! Property tests for the composite scores
//!
//! 1. Both scores are never negative
//! 2. Offensive score never decreases as PTS, AST or a percentage grows
//! 3. Offensive score never increases as TOV grows

use insight_engine::scores::{defensive_score, offensive_score};
use proptest::prelude::*;
use stats_collector::PlayerRow;

fn arb_volume() -> impl Strategy<Value = f64> {
    (0.0..60.0_f64).prop_map(|v| (v * 10.0).round() / 10.0)
}

fn arb_pct() -> impl Strategy<Value = f64> {
    (0.0..=1.0_f64).prop_map(|p| (p * 1000.0).round() / 1000.0)
}

fn arb_row() -> impl Strategy<Value = PlayerRow> {
    (
        (arb_volume(), arb_volume(), arb_volume(), arb_volume()),
        (arb_volume(), arb_volume(), arb_volume(), arb_volume()),
        (arb_pct(), arb_pct(), arb_pct()),
    )
        .prop_map(|((pts, ast, tov, stl), (blk, dreb, pf, reb), (fg, fg3, ft))| PlayerRow {
            points: pts,
            assists: ast,
            turnovers: tov,
            steals: stl,
            blocks: blk,
            defensive_rebounds: dreb,
            personal_fouls: pf,
            rebounds: reb,
            fg_pct: fg,
            fg3_pct: fg3,
            ft_pct: ft,
            ..PlayerRow::new("Generated")
        })
}

proptest! {
    #[test]
    fn scores_are_never_negative(row in arb_row()) {
        prop_assert!(offensive_score(&row) >= 0.0);
        prop_assert!(defensive_score(&row) >= 0.0);
    }

    #[test]
    fn offensive_score_non_decreasing_in_counting_stats(row in arb_row(), bump in 0.0..20.0_f64) {
        let base = offensive_score(&row);

        let more_points = PlayerRow { points: row.points + bump, ..row.clone() };
        prop_assert!(offensive_score(&more_points) >= base);

        let more_assists = PlayerRow { assists: row.assists + bump, ..row.clone() };
        prop_assert!(offensive_score(&more_assists) >= base);
    }

    #[test]
    fn offensive_score_non_decreasing_in_percentages(row in arb_row(), bump in 0.0..1.0_f64) {
        let base = offensive_score(&row);

        let better_fg = PlayerRow { fg_pct: (row.fg_pct + bump).min(1.0), ..row.clone() };
        prop_assert!(offensive_score(&better_fg) >= base);

        let better_fg3 = PlayerRow { fg3_pct: (row.fg3_pct + bump).min(1.0), ..row.clone() };
        prop_assert!(offensive_score(&better_fg3) >= base);

        let better_ft = PlayerRow { ft_pct: (row.ft_pct + bump).min(1.0), ..row.clone() };
        prop_assert!(offensive_score(&better_ft) >= base);
    }

    #[test]
    fn offensive_score_non_increasing_in_turnovers(row in arb_row(), bump in 0.0..20.0_f64) {
        let base = offensive_score(&row);
        let sloppier = PlayerRow { turnovers: row.turnovers + bump, ..row.clone() };
        prop_assert!(offensive_score(&sloppier) <= base);
    }
}

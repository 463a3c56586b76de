//! Rule-based hot takes used when the completion capability is unavailable

use stats_collector::types::{Column, Dataset, PlayerRow};

use crate::parser::HotTake;

/// Number of distinct templates before the sequence repeats
pub const TEMPLATE_COUNT: usize = 5;

fn placeholder() -> HotTake {
    HotTake::new(
        "Sample hot take - data unavailable",
        "This is a placeholder hot take generated when data analysis is unavailable.",
    )
}

/// Category leader, if the category has any non-zero value
fn leader(dataset: &Dataset, column: Column) -> Option<&PlayerRow> {
    dataset.top_by(column, 1).into_iter().next().filter(|row| row.value(column) > 0.0)
}

fn template(dataset: &Dataset, index: usize) -> HotTake {
    match index % TEMPLATE_COUNT {
        0 => leader(dataset, Column::Points).map_or_else(placeholder, |p| {
            HotTake::new(
                format!("{} is overrated as a scorer", p.player_name),
                format!(
                    "Despite averaging {:.1} PPG, {} has a mediocre {:.3} field goal percentage, showing they're inefficient despite high volume.",
                    p.points, p.player_name, p.fg_pct
                ),
            )
        }),
        1 => leader(dataset, Column::Assists).map_or_else(placeholder, |p| {
            HotTake::new(
                format!("{} is the best playmaker in the league", p.player_name),
                format!(
                    "{} leads with {:.1} assists per game while maintaining a solid {:.3} shooting percentage, proving elite playmaking ability.",
                    p.player_name, p.assists, p.fg_pct
                ),
            )
        }),
        2 => leader(dataset, Column::Rebounds).map_or_else(placeholder, |p| {
            HotTake::new(
                format!("{} is underappreciated", p.player_name),
                format!(
                    "{} averages {:.1} rebounds per game with {:.1} PPG, showing they're a complete player who doesn't get enough recognition.",
                    p.player_name, p.rebounds, p.points
                ),
            )
        }),
        3 => leader(dataset, Column::Efficiency).map_or_else(placeholder, |p| {
            HotTake::new(
                format!("{} is the most efficient player", p.player_name),
                format!(
                    "With an efficiency rating of {:.1}, {} proves that raw stats don't tell the full story - they're getting the most out of every possession.",
                    p.efficiency, p.player_name
                ),
            )
        }),
        _ => HotTake::new(
            "High-volume scorers are hurting their teams",
            "Players averaging over 25 PPG often have FG% below 0.450, showing that high volume scoring doesn't necessarily translate to team success or efficiency.",
        ),
    }
}

/// `n` takes from the fixed templates, cycling after the fifth
pub fn rule_based_takes(dataset: &Dataset, n: usize) -> Vec<HotTake> {
    (0..n).map(|i| template(dataset, i)).collect()
}

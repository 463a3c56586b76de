//! Bounded textual digest of a dataset and the hot-take prompt built on it

use stats_collector::types::{Column, Dataset};

/// Leaders listed per category in the digest
const DIGEST_LEADERS: usize = 5;

pub const TAKE_MARKER: &str = "HOT TAKE:";
pub const RATIONALE_MARKER: &str = "RATIONALE:";

/// Top scorers, top assisters and league shooting averages
pub fn data_digest(dataset: &Dataset) -> String {
    if dataset.is_empty() {
        return "No data available".to_string();
    }

    let mut lines = vec![format!("Total players: {}", dataset.len())];

    lines.push(format!("Top {} scorers:", DIGEST_LEADERS));
    for row in dataset.top_by(Column::Points, DIGEST_LEADERS) {
        lines.push(format!("- {} ({}): {:.1} PPG", row.player_name, row.team_abbreviation, row.points));
    }

    lines.push(format!("Top {} assist leaders:", DIGEST_LEADERS));
    for row in dataset.top_by(Column::Assists, DIGEST_LEADERS) {
        lines.push(format!("- {} ({}): {:.1} APG", row.player_name, row.team_abbreviation, row.assists));
    }

    lines.push(format!("League average FG%: {:.3}", dataset.mean(Column::FieldGoalPct)));
    lines.push(format!("League average 3P%: {:.3}", dataset.mean(Column::ThreePointPct)));

    lines.join("\n")
}

/// Prompt asking for `n` numbered take/rationale blocks grounded in the digest
pub fn hot_take_prompt(digest: &str, n: usize) -> String {
    let blocks: Vec<String> = (1..=n)
        .map(|i| {
            format!(
                "{i}. {TAKE_MARKER} [Short, vague, controversial statement - max 15 words]\n   {RATIONALE_MARKER} [Detailed explanation with specific stats from the data]"
            )
        })
        .collect();

    format!(
        r#"
You are an NBA analyst known for controversial but data-supported hot takes.
Based on the following NBA player statistics, generate {n} hot takes that:
1. Are controversial and few people would agree with
2. Are supported ONLY by the data provided below
3. Include specific statistics from the data to back up the claim
4. Are written in a bold, confident tone
5. DO NOT reference statistics that are not in the data (like TS%, efficiency ratings, etc.)

Available NBA Player Statistics:
{digest}

IMPORTANT RULES:
- Only use statistics that are actually listed above
- Do not make up rankings or percentages
- Do not reference "league leaders" unless they're clearly the highest in the data
- Focus on the actual numbers provided
- Be specific with the statistics you reference

Generate {n} hot takes in this EXACT format:
{blocks}

The HOT TAKE should be brief and shocking. The RATIONALE should provide the detailed statistical backing.
Focus on surprising insights that go against popular opinion but are backed by the actual numbers provided.
"#,
        blocks = blocks.join("\n\n"),
    )
}

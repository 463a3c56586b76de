//! Structured-text parser for numbered HOT TAKE / RATIONALE blocks
//!
//! The response is folded line by line through a small state machine:
//!
//! - `Seeking`: no record open yet, or the previous record was just committed
//! - `InTake`: a record is open and the next rationale marker is expected
//! - `InRationale`: a rationale is open and plain lines continue it
//!
//! A numbered line (`3.` at line start) commits the open record if it has
//! both fields and opens a new one. Incomplete records are dropped.

use serde::{Deserialize, Serialize};
use tracing::warn;

use stats_collector::types::Dataset;

use crate::fallback::rule_based_takes;
use crate::summary::{RATIONALE_MARKER, TAKE_MARKER};

/// A short controversial statement and the statistics behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotTake {
    #[serde(rename = "hot_take")]
    pub statement: String,
    pub rationale: String,
}

impl HotTake {
    pub fn new(statement: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self { statement: statement.into(), rationale: rationale.into() }
    }
}

#[derive(Debug, Default)]
struct Draft {
    statement: Option<String>,
    rationale: Option<String>,
}

impl Draft {
    fn into_take(self) -> Option<HotTake> {
        Some(HotTake { statement: self.statement?, rationale: self.rationale? })
    }

    fn is_complete(&self) -> bool {
        self.statement.is_some() && self.rationale.is_some()
    }
}

enum State {
    Seeking,
    InTake(Draft),
    InRationale(Draft),
}

impl State {
    fn into_draft(self) -> Option<Draft> {
        match self {
            State::Seeking => None,
            State::InTake(draft) | State::InRationale(draft) => Some(draft),
        }
    }
}

/// Strip a leading `<digits>.` and return the remainder of the line
fn strip_number(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.').map(str::trim)
}

fn commit(state: State, takes: &mut Vec<HotTake>) {
    if let Some(take) = state.into_draft().and_then(Draft::into_take) {
        takes.push(take);
    }
}

fn step(state: State, line: &str, takes: &mut Vec<HotTake>) -> State {
    if let Some(rest) = strip_number(line) {
        commit(state, takes);
        let opened = State::InTake(Draft::default());
        return if rest.is_empty() { opened } else { step(opened, rest, takes) };
    }

    if let Some(statement) = line.strip_prefix(TAKE_MARKER) {
        // An unnumbered take after a complete record starts a new one
        let mut draft = match state.into_draft() {
            Some(draft) if draft.is_complete() => {
                commit(State::InTake(draft), takes);
                Draft::default()
            }
            Some(draft) => draft,
            None => Draft::default(),
        };
        draft.statement = Some(statement.trim().to_string());
        return State::InTake(draft);
    }

    if let Some(rationale) = line.strip_prefix(RATIONALE_MARKER) {
        let mut draft = state.into_draft().unwrap_or_default();
        draft.rationale = Some(rationale.trim().to_string());
        return State::InRationale(draft);
    }

    match state {
        State::InRationale(mut draft) if !line.is_empty() => {
            if let Some(rationale) = draft.rationale.as_mut() {
                if !rationale.is_empty() {
                    rationale.push(' ');
                }
                rationale.push_str(line);
            }
            State::InRationale(draft)
        }
        other => other,
    }
}

/// Every complete record in the response, in order
pub fn parse_records(text: &str) -> Vec<HotTake> {
    let mut takes = Vec::new();
    let last = text.lines().map(str::trim).fold(State::Seeking, |state, line| step(state, line, &mut takes));
    commit(last, &mut takes);
    takes
}

/// Exactly `n` takes: parsed records first, padded with rule-based takes
pub fn parse(text: &str, n: usize, dataset: &Dataset) -> Vec<HotTake> {
    let mut takes = parse_records(text);

    if takes.len() < n {
        warn!("Only parsed {} hot takes, creating fallbacks", takes.len());
        takes.extend(rule_based_takes(dataset, n - takes.len()));
    }

    takes.truncate(n);
    takes
}

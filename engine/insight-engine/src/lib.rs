//! NBA insight engine
//!
//! Composite offensive/defensive scores, generated hot takes with a
//! rule-based fallback, and free-form analysis for players, teams and the
//! league. Text generation goes through the [`TextCompletion`] seam.

pub mod analysis;
pub mod completion;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod parser;
pub mod scores;
pub mod summary;

pub use analysis::{AnalysisReport, AnalysisTarget, ANALYSIS_UNAVAILABLE};
pub use completion::{CompletionConfig, OllamaClient, TextCompletion};
pub use error::InsightError;
pub use generator::{HotTakesReport, InsightGenerator, TakeSource, RULE_BASED_MODEL};
pub use parser::HotTake;
pub use scores::{defensive_score, offensive_score, PlayerScores, Rating};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use stats_collector::types::Dataset;

use crate::completion::TextCompletion;
use crate::error::InsightError;
use crate::fallback::rule_based_takes;
use crate::parser::{self, HotTake};
use crate::summary::{data_digest, hot_take_prompt};

/// Reported as `model_used` when the completion capability gave nothing back
pub const RULE_BASED_MODEL: &str = "rule-based (LLM unavailable)";

/// Token budget for a full hot-take response
pub const HOT_TAKES_MAX_TOKENS: u32 = 1000;

/// Where the takes in a report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TakeSource {
    Model,
    RuleBased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotTakesReport {
    #[serde(rename = "hot_takes")]
    pub takes: Vec<HotTake>,
    pub model_used: String,
    pub source: TakeSource,
    #[serde(rename = "total_players_analyzed")]
    pub players_analyzed: usize,
}

/// Builds prompts from dataset aggregates and turns completions into typed output
#[derive(Clone)]
pub struct InsightGenerator {
    completion: Arc<dyn TextCompletion>,
}

impl InsightGenerator {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }

    pub fn model_name(&self) -> &str {
        self.completion.model_name()
    }

    /// Completion text, or `None` for the empty-string failure signal
    pub(crate) async fn complete(&self, prompt: &str, max_tokens: u32) -> Option<String> {
        let text = self.completion.complete(prompt, max_tokens).await;
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Generate `n` hot takes. Never fails for a non-empty dataset.
    pub async fn hot_takes(&self, dataset: &Dataset, n: usize) -> Result<HotTakesReport, InsightError> {
        if dataset.is_empty() {
            return Err(InsightError::EmptyDataset);
        }

        info!("Generating {} hot takes over {} players", n, dataset.len());
        let prompt = hot_take_prompt(&data_digest(dataset), n);

        let report = match self.complete(&prompt, HOT_TAKES_MAX_TOKENS).await {
            Some(response) => HotTakesReport {
                takes: parser::parse(&response, n, dataset),
                model_used: self.model_name().to_string(),
                source: TakeSource::Model,
                players_analyzed: dataset.len(),
            },
            None => {
                warn!("LLM failed, using rule-based hot takes");
                HotTakesReport {
                    takes: rule_based_takes(dataset, n),
                    model_used: RULE_BASED_MODEL.to_string(),
                    source: TakeSource::RuleBased,
                    players_analyzed: dataset.len(),
                }
            }
        };

        Ok(report)
    }
}

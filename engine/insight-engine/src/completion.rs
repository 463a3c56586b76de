//! Text-completion capability backed by a local Ollama server

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

/// Opaque, fallible text generation. The empty string is the only failure signal.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> String;

    /// Name of the model answering requests
    fn model_name(&self) -> &str;
}

/// Connection and sampling settings for the completion server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub host: String,
    pub model: String,
    /// Tried in order when `model` is not installed
    pub fallback_models: Vec<String>,
    pub temperature: f64,
    pub top_p: f64,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "llama2:7b".to_string(),
            fallback_models: vec![
                "llama2:7b".to_string(),
                "mistral:7b".to_string(),
                "phi:2.7b".to_string(),
            ],
            temperature: 0.7,
            top_p: 0.9,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Pick the configured model if installed, else the first installed fallback.
///
/// Returns `None` when neither is available.
pub fn choose_model(configured: &str, fallbacks: &[String], installed: &[String]) -> Option<String> {
    if installed.iter().any(|name| name == configured) {
        return Some(configured.to_string());
    }
    fallbacks.iter().find(|fallback| installed.contains(fallback)).cloned()
}

/// Ollama `/api/generate` client
pub struct OllamaClient {
    client: Client,
    config: CompletionConfig,
    model: String,
}

impl OllamaClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let model = config.model.clone();
        Ok(Self { client, config, model })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.host.trim_end_matches('/'), path)
    }

    async fn installed_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.endpoint("api/tags"))
            .send()
            .await
            .context("Failed to list installed models")?;

        if !response.status().is_success() {
            anyhow::bail!("Model listing failed with status: {}", response.status());
        }

        let tags: TagsResponse = response.json().await.context("Failed to parse model listing")?;
        Ok(tags.models.into_iter().map(|tag| tag.name).collect())
    }

    /// Switch to an installed fallback when the configured model is missing.
    ///
    /// An unreachable server keeps the configured model.
    pub async fn resolve_model(&mut self) -> &str {
        let listing = self.installed_models().await;
        self.apply_listing(listing)
    }

    fn apply_listing(&mut self, listing: Result<Vec<String>>) -> &str {
        match listing {
            Ok(installed) => {
                if !installed.contains(&self.model) {
                    warn!("Model {} not found. Available models: {:?}", self.model, installed);
                    info!("To install {}, run: ollama pull {}", self.model, self.model);
                }
                match choose_model(&self.config.model, &self.config.fallback_models, &installed) {
                    Some(model) if model != self.model => {
                        info!("Using fallback model: {}", model);
                        self.model = model;
                    }
                    Some(_) => {}
                    None => warn!("No fallback model installed, keeping {}", self.model),
                }
            }
            Err(e) => {
                error!("Could not connect to Ollama: {:#}", e);
                info!("Make sure Ollama is installed and running at {}", self.config.host);
            }
        }
        &self.model
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: max_tokens,
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        };

        let response = self
            .client
            .post(self.endpoint("api/generate"))
            .json(&request)
            .send()
            .await
            .context("Failed to call completion server")?;

        if !response.status().is_success() {
            anyhow::bail!("Completion request failed with status: {}", response.status());
        }

        let body: GenerateResponse =
            response.json().await.context("Failed to parse completion response")?;
        Ok(body.response)
    }
}

#[async_trait]
impl TextCompletion for OllamaClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> String {
        text_or_empty(self.generate(prompt, max_tokens).await)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Collapse a failed generation into the empty-string signal
fn text_or_empty(result: Result<String>) -> String {
    result.unwrap_or_else(|e| {
        error!("Error calling local LLM: {:#}", e);
        String::new()
    })
}

//! Service configuration management

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use insight_engine::CompletionConfig;
use stats_collector::CollectorConfig;

/// Prefix for layered environment overrides, e.g. `NBA_ANALYTICS__LOGGING__LEVEL`
pub const ENV_PREFIX: &str = "NBA_ANALYTICS";

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Canonical CSV file the dataset is persisted to
    pub data_path: PathBuf,

    /// Acquisition cascade configuration
    pub collector: CollectorConfig,

    /// Text-completion server configuration
    pub completion: CompletionConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Hot-take request bounds
    pub hot_takes: HotTakesConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotTakesConfig {
    /// Takes generated when the caller does not ask for a count
    pub default_count: usize,

    /// Largest count a caller may ask for
    pub max_count: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/nba_combined_latest.csv"),
            collector: CollectorConfig::default(),
            completion: CompletionConfig::default(),
            logging: LoggingConfig::default(),
            hot_takes: HotTakesConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl Default for HotTakesConfig {
    fn default() -> Self {
        Self { default_count: 5, max_count: 10 }
    }
}

/// Load configuration from defaults, an optional TOML file and the environment
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    dotenv::dotenv().ok();

    let mut config = layered_config(path, Environment::with_prefix(ENV_PREFIX))?;

    config.collector.apply_env_overrides();
    apply_legacy_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config)?;

    Ok(config)
}

/// Defaults, then the file (if any), then the environment source
fn layered_config(path: Option<&Path>, environment: Environment) -> Result<AnalyticsConfig> {
    let mut builder = Config::builder().add_source(
        Config::try_from(&AnalyticsConfig::default()).context("Failed to serialize defaults")?,
    );

    if let Some(path) = path {
        tracing::debug!("Loading configuration from file: {:?}", path);
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
    }

    builder
        .add_source(environment.prefix_separator("__").separator("__"))
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Single-variable overrides kept for existing deployments
fn apply_legacy_overrides(config: &mut AnalyticsConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(path) = var("DATA_PATH") {
        config.data_path = PathBuf::from(path);
    }

    if let Some(model) = var("LLM_MODEL_NAME") {
        config.completion.model = model;
    }

    if let Some(host) = var("OLLAMA_HOST") {
        config.completion.host = host;
    }
}

/// Validate configuration
fn validate_config(config: &AnalyticsConfig) -> Result<()> {
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => anyhow::bail!("Invalid log level: {}", config.logging.level),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => anyhow::bail!("Invalid log format: {}", config.logging.format),
    }

    if config.collector.http.max_retries == 0 {
        anyhow::bail!("max_retries must be at least 1");
    }

    let bounds = &config.hot_takes;
    if bounds.max_count == 0 || !(1..=bounds.max_count).contains(&bounds.default_count) {
        anyhow::bail!(
            "Invalid hot take bounds: default {} with max {}",
            bounds.default_count,
            bounds.max_count
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = layered_config(None, env(&[])).unwrap();

        assert_eq!(config.data_path, PathBuf::from("data/nba_combined_latest.csv"));
        assert_eq!(config.completion.model, "llama2:7b");
        assert_eq!(config.collector.http.max_retries, 3);
        assert_eq!(config.collector.season.label(), "2023-24");
        assert_eq!(config.hot_takes.default_count, 5);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file(
            r#"
data_path = "/tmp/stats.csv"

[collector]
season = "2022-23"

[collector.http]
request_delay_ms = 10

[completion]
model = "mistral:7b"

[logging]
format = "json"
"#,
        );

        let config = layered_config(Some(file.path()), env(&[])).unwrap();

        assert_eq!(config.data_path, PathBuf::from("/tmp/stats.csv"));
        assert_eq!(config.collector.season.label(), "2022-23");
        assert_eq!(config.collector.http.request_delay_ms, 10);
        // untouched keys keep their defaults
        assert_eq!(config.collector.http.timeout_secs, 15);
        assert_eq!(config.completion.model, "mistral:7b");
        assert_eq!(config.completion.host, "http://localhost:11434");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = toml_file("[logging]\nlevel = \"debug\"\n");
        let config = layered_config(
            Some(file.path()),
            env(&[
                ("NBA_ANALYTICS__LOGGING__LEVEL", "warn"),
                ("NBA_ANALYTICS__HOT_TAKES__MAX_COUNT", "20"),
            ]),
        )
        .unwrap();

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.hot_takes.max_count, 20);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = layered_config(Some(Path::new("/nonexistent/analytics.toml")), env(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_legacy_overrides() {
        let mut config = AnalyticsConfig::default();
        let vars: HashMap<&str, &str> = [
            ("DATA_PATH", "/srv/nba.csv"),
            ("LLM_MODEL_NAME", "phi:2.7b"),
            ("OLLAMA_HOST", "http://gpu-box:11434"),
        ]
        .into_iter()
        .collect();

        apply_legacy_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.data_path, PathBuf::from("/srv/nba.csv"));
        assert_eq!(config.completion.model, "phi:2.7b");
        assert_eq!(config.completion.host, "http://gpu-box:11434");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AnalyticsConfig::default();
        config.logging.level = "loud".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AnalyticsConfig::default();
        config.logging.format = "xml".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AnalyticsConfig::default();
        config.collector.http.max_retries = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AnalyticsConfig::default();
        config.hot_takes.default_count = 11;
        assert!(validate_config(&config).is_err());
    }
}

//! Service state and the operations exposed to the web layer and CLI

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use insight_engine::{
    AnalysisReport, AnalysisTarget, HotTakesReport, InsightGenerator, OllamaClient, PlayerScores,
};
use stats_collector::{DataSource, Dataset, DatasetStore, PlayerRow, StatsCollector};

use crate::config::{AnalyticsConfig, HotTakesConfig};
use crate::error::{Result, ServiceError};

/// Published dataset plus when it was published
#[derive(Debug, Clone, Default)]
struct Snapshot {
    dataset: Arc<Dataset>,
    published_at: Option<DateTime<Utc>>,
}

/// Outcome of one collection run
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub source: DataSource,
    pub total_players: usize,
    #[serde(skip)]
    pub dataset: Arc<Dataset>,
}

/// Row, scores and a short generated analysis for one player
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub player_name: String,
    pub stats: PlayerRow,
    #[serde(flatten)]
    pub scores: PlayerScores,
    pub analysis: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub data_loaded: bool,
    pub total_players: usize,
    pub season: String,
    pub model: String,
    pub data_path: String,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Owns the published dataset and every component that reads or replaces it
pub struct AnalyticsService {
    store: DatasetStore,
    collector: StatsCollector,
    generator: InsightGenerator,
    hot_takes: HotTakesConfig,
    snapshot: RwLock<Snapshot>,
    /// Held for the whole of a collection so runs never overlap
    collecting: Mutex<()>,
}

impl AnalyticsService {
    /// Build the live collector and completion client from configuration
    pub async fn new(config: &AnalyticsConfig) -> Result<Self> {
        let collector = StatsCollector::new(&config.collector)
            .map_err(|e| ServiceError::Config(format!("{e:#}")))?;

        let mut completion = OllamaClient::new(config.completion.clone())
            .map_err(|e| ServiceError::Config(format!("{e:#}")))?;
        let model = completion.resolve_model().await;
        info!("Using completion model {}", model);

        Ok(Self::with_components(
            DatasetStore::new(&config.data_path),
            collector,
            InsightGenerator::new(Arc::new(completion)),
            config.hot_takes.clone(),
        ))
    }

    pub fn with_components(
        store: DatasetStore,
        collector: StatsCollector,
        generator: InsightGenerator,
        hot_takes: HotTakesConfig,
    ) -> Self {
        Self {
            store,
            collector,
            generator,
            hot_takes,
            snapshot: RwLock::new(Snapshot::default()),
            collecting: Mutex::new(()),
        }
    }

    /// Load the stored dataset, collecting live data when the store is empty
    pub async fn initialize(&self) -> Result<Arc<Dataset>> {
        let dataset = self.load().await;
        if !dataset.is_empty() {
            return Ok(dataset);
        }

        info!("No stored data, running initial collection");
        Ok(self.collect(false).await?.dataset)
    }

    /// Run the acquisition cascade, save the result and publish it
    pub async fn collect(&self, use_sample: bool) -> Result<Collection> {
        let _guard = self.collecting.lock().await;

        let result = self.collector.collect(use_sample).await;
        self.store.save(&result.rows)?;

        let dataset = self.publish(result.rows).await;
        Ok(Collection { source: result.source, total_players: dataset.len(), dataset })
    }

    /// Replace the published dataset with the stored one
    pub async fn load(&self) -> Arc<Dataset> {
        let dataset = self.store.load();
        if dataset.is_empty() {
            warn!("Store at {} is empty", self.store.path().display());
        }
        self.publish(dataset).await
    }

    pub fn save(&self, dataset: &Dataset) -> Result<()> {
        self.store.save(dataset)?;
        Ok(())
    }

    async fn publish(&self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        let mut snapshot = self.snapshot.write().await;
        *snapshot = Snapshot { dataset: dataset.clone(), published_at: Some(Utc::now()) };
        dataset
    }

    /// Currently published dataset
    pub async fn dataset(&self) -> Arc<Dataset> {
        self.snapshot.read().await.dataset.clone()
    }

    async fn non_empty_dataset(&self) -> Result<Arc<Dataset>> {
        let dataset = self.dataset().await;
        if dataset.is_empty() {
            return Err(ServiceError::DatasetEmpty);
        }
        Ok(dataset)
    }

    /// First player whose name contains `name`, ignoring case
    pub async fn lookup(&self, name: &str) -> Result<PlayerReport> {
        let dataset = self.non_empty_dataset().await?;
        let row = dataset.lookup(name).ok_or_else(|| ServiceError::PlayerNotFound(name.to_string()))?;

        let scores = self.scores(row);
        let analysis = self.generator.player_summary(row, &scores).await;

        Ok(PlayerReport { player_name: row.player_name.clone(), stats: row.clone(), scores, analysis })
    }

    pub fn scores(&self, row: &PlayerRow) -> PlayerScores {
        PlayerScores::for_row(row)
    }

    /// `count` hot takes, or the configured default when `None`
    pub async fn hot_takes(&self, count: Option<usize>) -> Result<HotTakesReport> {
        let n = count.unwrap_or(self.hot_takes.default_count);
        if !(1..=self.hot_takes.max_count).contains(&n) {
            return Err(ServiceError::InvalidRequest(format!(
                "hot take count must be between 1 and {}, got {}",
                self.hot_takes.max_count, n
            )));
        }

        let dataset = self.non_empty_dataset().await?;
        Ok(self.generator.hot_takes(&dataset, n).await?)
    }

    /// Every player name in dataset order
    pub async fn players(&self) -> Result<Vec<String>> {
        Ok(self.non_empty_dataset().await?.player_names())
    }

    pub async fn analyze(&self, target: &AnalysisTarget) -> Result<AnalysisReport> {
        let dataset = self.non_empty_dataset().await?;
        Ok(self.generator.analyze(&dataset, target).await?)
    }

    pub async fn health(&self) -> HealthReport {
        let snapshot = self.snapshot.read().await.clone();
        HealthReport {
            status: "healthy",
            data_loaded: !snapshot.dataset.is_empty(),
            total_players: snapshot.dataset.len(),
            season: self.collector.season().label(),
            model: self.generator.model_name().to_string(),
            data_path: self.store.path().display().to_string(),
            loaded_at: snapshot.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use insight_engine::{TakeSource, TextCompletion, ANALYSIS_UNAVAILABLE, RULE_BASED_MODEL};
    use stats_collector::{CascadeConfig, Season, StatsProvider};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FixedProvider {
        source: DataSource,
        rows: Dataset,
        fetches: AtomicUsize,
    }

    impl FixedProvider {
        fn new(source: DataSource, rows: Vec<PlayerRow>) -> Arc<Self> {
            Arc::new(Self { source, rows: Dataset::new(rows), fetches: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl StatsProvider for FixedProvider {
        fn source(&self) -> DataSource {
            self.source
        }

        async fn fetch(&self, _season: Season) -> Dataset {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.rows.clone()
        }
    }

    struct CannedCompletion {
        replies: std::sync::Mutex<VecDeque<String>>,
    }

    impl CannedCompletion {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: std::sync::Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl TextCompletion for CannedCompletion {
        async fn complete(&self, _prompt: &str, _max_tokens: u32) -> String {
            self.replies.lock().unwrap().pop_front().unwrap_or_default()
        }

        fn model_name(&self) -> &str {
            "canned:1b"
        }
    }

    fn live_rows() -> Vec<PlayerRow> {
        vec![
            PlayerRow {
                team_abbreviation: "DEN".into(),
                points: 26.4,
                rebounds: 12.4,
                assists: 9.0,
                fg_pct: 0.583,
                ..PlayerRow::new("Nikola Jokic")
            },
            PlayerRow {
                team_abbreviation: "BOS".into(),
                points: 26.9,
                rebounds: 8.1,
                assists: 4.9,
                fg_pct: 0.471,
                ..PlayerRow::new("Jayson Tatum")
            },
        ]
    }

    struct Harness {
        service: AnalyticsService,
        secondary: Arc<FixedProvider>,
        _dir: TempDir,
    }

    fn harness(secondary_rows: Vec<PlayerRow>, replies: &[&str]) -> Harness {
        let dir = TempDir::new().unwrap();
        let secondary = FixedProvider::new(DataSource::Secondary, secondary_rows);
        let collector = StatsCollector::with_providers(
            Season::default(),
            CascadeConfig::default(),
            FixedProvider::new(DataSource::Primary, vec![]),
            secondary.clone(),
            FixedProvider::new(DataSource::Tertiary, vec![]),
        );
        let service = AnalyticsService::with_components(
            DatasetStore::new(dir.path().join("data").join("nba.csv")),
            collector,
            InsightGenerator::new(CannedCompletion::new(replies)),
            HotTakesConfig::default(),
        );
        Harness { service, secondary, _dir: dir }
    }

    #[tokio::test]
    async fn test_initialize_collects_when_store_is_empty() {
        let h = harness(live_rows(), &[]);

        let dataset = h.service.initialize().await.unwrap();

        assert_eq!(dataset.player_names(), vec!["Nikola Jokic", "Jayson Tatum"]);
        assert_eq!(h.secondary.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(h.service.store.load().len(), 2);
    }

    #[tokio::test]
    async fn test_initialize_prefers_stored_data() {
        let h = harness(live_rows(), &[]);
        h.service.save(&Dataset::new(vec![PlayerRow::new("Stored Player")])).unwrap();

        let dataset = h.service.initialize().await.unwrap();

        assert_eq!(dataset.player_names(), vec!["Stored Player"]);
        assert_eq!(h.secondary.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_collect_sample_publishes_synthetic_data() {
        let h = harness(live_rows(), &[]);

        let collection = h.service.collect(true).await.unwrap();

        assert_eq!(collection.source, DataSource::Synthetic);
        assert_eq!(collection.total_players, 50);
        assert_eq!(h.service.dataset().await.len(), 50);
        assert_eq!(h.secondary.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_readers_see_previous_dataset_until_swap() {
        let h = harness(live_rows(), &[]);
        h.service.collect(true).await.unwrap();
        let before = h.service.dataset().await;

        h.service.collect(false).await.unwrap();

        assert_eq!(before.len(), 50);
        assert_eq!(h.service.dataset().await.len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_reports_scores_and_analysis() {
        let h = harness(live_rows(), &["A do-everything center."]);
        h.service.collect(false).await.unwrap();

        let report = h.service.lookup("jokic").await.unwrap();

        assert_eq!(report.player_name, "Nikola Jokic");
        assert_eq!(report.scores, PlayerScores::for_row(&report.stats));
        assert_eq!(report.analysis, "A do-everything center.");

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("offensive_score").is_some());
        assert_eq!(json["stats"]["TEAM_ABBREVIATION"], "DEN");
    }

    #[tokio::test]
    async fn test_lookup_conditions() {
        let h = harness(live_rows(), &[]);
        assert!(matches!(h.service.lookup("jokic").await, Err(ServiceError::DatasetEmpty)));

        h.service.collect(false).await.unwrap();
        assert!(matches!(
            h.service.lookup("Wembanyama").await,
            Err(ServiceError::PlayerNotFound(name)) if name == "Wembanyama"
        ));

        let report = h.service.lookup("tatum").await.unwrap();
        assert_eq!(report.analysis, ANALYSIS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_hot_takes_bounds() {
        let h = harness(live_rows(), &[]);
        h.service.collect(false).await.unwrap();

        assert!(matches!(h.service.hot_takes(Some(0)).await, Err(ServiceError::InvalidRequest(_))));
        assert!(matches!(h.service.hot_takes(Some(11)).await, Err(ServiceError::InvalidRequest(_))));

        let report = h.service.hot_takes(None).await.unwrap();
        assert_eq!(report.takes.len(), 5);
        assert_eq!(report.source, TakeSource::RuleBased);
        assert_eq!(report.model_used, RULE_BASED_MODEL);
        assert_eq!(report.players_analyzed, 2);
    }

    #[tokio::test]
    async fn test_hot_takes_from_model() {
        let h = harness(
            live_rows(),
            &["1. HOT TAKE: Jokic is a scorer first\nRATIONALE: 26.4 PPG on 0.583 shooting."],
        );
        h.service.collect(false).await.unwrap();

        let report = h.service.hot_takes(Some(1)).await.unwrap();

        assert_eq!(report.source, TakeSource::Model);
        assert_eq!(report.model_used, "canned:1b");
        assert_eq!(report.takes[0].statement, "Jokic is a scorer first");
    }

    #[tokio::test]
    async fn test_hot_takes_need_data() {
        let h = harness(vec![], &[]);
        assert!(matches!(h.service.hot_takes(Some(3)).await, Err(ServiceError::DatasetEmpty)));
    }

    #[tokio::test]
    async fn test_players_and_team_analysis() {
        let h = harness(live_rows(), &["Boston moves the ball."]);
        assert!(matches!(h.service.players().await, Err(ServiceError::DatasetEmpty)));

        h.service.collect(false).await.unwrap();
        assert_eq!(h.service.players().await.unwrap(), vec!["Nikola Jokic", "Jayson Tatum"]);

        let report = h.service.analyze(&AnalysisTarget::Team("bos".into())).await.unwrap();
        assert_eq!(report.analysis(), "Boston moves the ball.");

        assert!(matches!(
            h.service.analyze(&AnalysisTarget::Team("NYK".into())).await,
            Err(ServiceError::TeamNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(live_rows(), &[]);

        let health = h.service.health().await;
        assert!(!health.data_loaded);
        assert_eq!(health.loaded_at, None);
        assert_eq!(health.model, "canned:1b");
        assert!(health.data_path.ends_with("nba.csv"));
        assert_eq!(health.season, "2023-24");

        h.service.collect(false).await.unwrap();
        let health = h.service.health().await;
        assert!(health.data_loaded);
        assert_eq!(health.total_players, 2);
        assert!(health.loaded_at.is_some());
    }

    /// Slow provider that records how many fetches overlap
    struct SlowProvider {
        rows: Dataset,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl StatsProvider for SlowProvider {
        fn source(&self) -> DataSource {
            DataSource::Primary
        }

        async fn fetch(&self, _season: Season) -> Dataset {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.rows.clone()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_collections_are_serialized() {
        let dir = TempDir::new().unwrap();
        let primary = Arc::new(SlowProvider {
            rows: Dataset::new(live_rows()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let collector = StatsCollector::with_providers(
            Season::default(),
            CascadeConfig::default(),
            primary.clone(),
            FixedProvider::new(DataSource::Secondary, vec![]),
            FixedProvider::new(DataSource::Tertiary, vec![]),
        );
        let service = Arc::new(AnalyticsService::with_components(
            DatasetStore::new(dir.path().join("nba.csv")),
            collector,
            InsightGenerator::new(CannedCompletion::new(&[])),
            HotTakesConfig::default(),
        ));

        let runs: Vec<_> = (0..3)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.collect(false).await.map(|c| c.total_players) })
            })
            .collect();
        for run in runs {
            assert_eq!(run.await.unwrap().unwrap(), 2);
        }

        assert_eq!(primary.peak.load(Ordering::SeqCst), 1);
        assert_eq!(primary.in_flight.load(Ordering::SeqCst), 0);
    }
}

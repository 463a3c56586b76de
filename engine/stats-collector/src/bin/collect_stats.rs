use clap::Parser;
use stats_collector::{CollectorConfig, DatasetStore, StatsCollector};
use tracing::info;

#[derive(Parser)]
#[command(name = "collect-stats")]
#[command(about = "Collect one season of NBA player stats into the canonical CSV file")]
struct Args {
    /// Skip live providers and write synthetic sample data
    #[arg(long)]
    sample: bool,

    /// Season to collect, e.g. 2023-24
    #[arg(long)]
    season: Option<String>,

    /// Output file
    #[arg(short, long, default_value = "data/nba_combined_latest.csv")]
    output: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut config = CollectorConfig::default();
    config.apply_env_overrides();
    if let Some(season) = args.season {
        config.season = season.parse().map_err(anyhow::Error::msg)?;
    }

    info!("Starting NBA stats collection for {}", config.season);

    let collector = StatsCollector::new(&config)?;
    let result = collector.collect(args.sample).await;

    DatasetStore::new(&args.output).save(&result.rows)?;
    info!("Collected {} players from {}", result.rows.len(), result.source);

    Ok(())
}

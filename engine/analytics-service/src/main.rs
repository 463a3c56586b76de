//! NBA analytics command line
//!
//! Every subcommand prints its result as JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use analytics_service::{initialize_logging, load_configuration, AnalyticsService};
use insight_engine::AnalysisTarget;

#[derive(Parser)]
#[command(name = "nba-analytics")]
#[command(about = "Collect NBA player stats, score players and generate hot takes")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the acquisition cascade and save the result
    Collect {
        /// Skip live providers and use synthetic sample data
        #[arg(long)]
        sample: bool,
    },
    /// Stats, scores and a short analysis for one player
    Lookup {
        /// Case-insensitive substring of the player's name
        name: String,
    },
    /// Generate hot takes from the current dataset
    HotTakes {
        /// Number of takes
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// List every player in the dataset
    Players,
    /// Analysis of a player, a team, or the whole league
    Analyze {
        #[arg(long, conflicts_with = "team")]
        player: Option<String>,

        #[arg(long)]
        team: Option<String>,
    },
    /// Report dataset and model status
    Health,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_configuration(cli.config.as_deref())?;
    initialize_logging(&config.logging)?;

    info!("Starting NBA analytics v{}", env!("CARGO_PKG_VERSION"));

    let service = AnalyticsService::new(&config).await?;

    match cli.command {
        Command::Collect { sample } => {
            let collection = service.collect(sample).await?;
            info!("Collected {} players from {}", collection.total_players, collection.source);
            print_json(&collection)?;
        }
        Command::Lookup { name } => {
            service.initialize().await?;
            print_json(&service.lookup(&name).await?)?;
        }
        Command::HotTakes { count } => {
            service.initialize().await?;
            print_json(&service.hot_takes(count).await?)?;
        }
        Command::Players => {
            service.initialize().await?;
            print_json(&service.players().await?)?;
        }
        Command::Analyze { player, team } => {
            let target = match (player, team) {
                (Some(name), _) => AnalysisTarget::Player(name),
                (None, Some(team)) => AnalysisTarget::Team(team),
                (None, None) => AnalysisTarget::League,
            };
            service.initialize().await?;
            print_json(&service.analyze(&target).await?)?;
        }
        Command::Health => {
            service.load().await;
            print_json(&service.health().await)?;
        }
    }

    Ok(())
}

//! itl-scout - roster scouting tool
//!
//! Fetches the champion pool and matchup pool of all five players of a team
//! and prints one player's collection.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use itl_common::config::{default_config_path, load_toml_config};
use itl_scout::client::{build_http_client, fetch_catalog};
use itl_scout::config::{Overrides, ScoutConfig};
use itl_scout::{Category, Enricher, MobalyticsClient, Queue, Region, Role, Roster};

/// Command-line arguments for itl-scout
#[derive(Parser, Debug)]
#[command(name = "itl-scout")]
#[command(about = "Fetch champion and matchup pools for a five-player roster")]
#[command(version)]
struct Args {
    /// Summoner names in role order: top jungle mid adc support
    #[arg(required = true, num_args = 5, value_names = ["TOP", "JUNGLE", "MID", "ADC", "SUPPORT"])]
    names: Vec<String>,

    /// Server region
    #[arg(short, long, default_value = "NA")]
    region: Region,

    /// Config file (default: <config dir>/itl/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persisted-query hash of the champion pool query
    #[arg(long)]
    champions_hash: Option<String>,

    /// Persisted-query hash of the matchup pool query
    #[arg(long)]
    matchups_hash: Option<String>,

    /// Rows requested per pool
    #[arg(long)]
    max_games: Option<u32>,

    /// Fetches in flight at once
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// Only count games from this queue
    #[arg(long)]
    queue: Option<Queue>,

    /// Only count games on this champion (name or slug)
    #[arg(long)]
    champion: Option<String>,

    /// Role whose collection is printed
    #[arg(long, default_value = "support")]
    show: Role,

    /// Collection printed for that role
    #[arg(long, default_value = "pool")]
    category: Category,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let loaded = match &config_path {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => None,
    };
    let found = loaded.is_some();
    let toml_config = loaded.unwrap_or_default();

    itl_common::logging::init(&toml_config.logging)?;

    info!("Starting itl-scout");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    match (&config_path, found) {
        (Some(path), true) => info!(path = %path.display(), "Loaded config file"),
        (Some(path), false) => warn!(path = %path.display(), "Config file not found, using defaults"),
        (None, _) => warn!("No config directory on this platform, using defaults"),
    }

    let overrides = Overrides {
        champions_hash: args.champions_hash.clone(),
        matchups_hash: args.matchups_hash.clone(),
        max_games: args.max_games,
        max_concurrency: args.max_concurrency,
    };
    let config = ScoutConfig::resolve(&overrides, &toml_config)?;

    let roster = Roster::new(args.region, args.names.as_slice())?;

    let http = build_http_client(config.client.request_timeout)?;
    let catalog = fetch_catalog(&http)
        .await
        .context("Failed to load champion catalog")?;
    let client = MobalyticsClient::new(http, config.client.clone(), Arc::new(catalog));

    let mut enricher = Enricher::new(Arc::new(client), config.max_concurrency);
    if let Some(timeout) = config.task_timeout {
        enricher = enricher.with_task_timeout(timeout);
    }
    if let Some(queue) = args.queue {
        enricher = enricher.with_queue(queue);
    }
    if let Some(champion) = args.champion.clone() {
        enricher = enricher.with_champion(champion);
    }

    let complete = enricher.enrich(&roster).await;

    let entity = roster.entity(args.show);
    match entity.collection(args.category) {
        Some(summaries) => {
            info!(
                summoner = entity.name(),
                role = %args.show,
                category = %args.category,
                count = summaries.len(),
                "Printing collection"
            );
            for summary in summaries {
                println!("{summary}");
            }
        }
        None => info!(
            summoner = entity.name(),
            role = %args.show,
            category = %args.category,
            "Collection was not fetched"
        ),
    }

    if !complete {
        let missing: Vec<String> = roster
            .missing()
            .into_iter()
            .map(|(role, category)| format!("{role}.{category}"))
            .collect();
        anyhow::bail!("Roster not fully enriched (missing: {})", missing.join(", "));
    }

    Ok(())
}

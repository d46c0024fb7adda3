//! Command handling for the Swarmscrape CLI.

use std::path::Path;
use std::time::Duration;

use anyhow::bail;
use clap::Args;
use swarmscrape_core::{
    InfohashInput, ScrapeCoordinator, ScrapeEntry, ScraperConfig, TrackerResult,
};

/// Arguments for a scrape run.
#[derive(Args)]
pub struct ScrapeArgs {
    /// Infohash or comma-separated infohashes, or a path to a file of
    /// newline-separated infohashes
    #[arg(short, long)]
    pub infohash: String,

    /// Tracker URL such as udp://tracker.opentrackr.org:1337/announce
    /// (repeatable); the public tracker list is fetched when omitted
    #[arg(short, long)]
    pub tracker: Vec<String>,

    /// Per-tracker timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Output results as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Runs one scrape cycle and prints the results.
pub async fn run_scrape(args: ScrapeArgs) -> anyhow::Result<()> {
    let mut config = ScraperConfig::from_env();
    config.network.scrape_timeout = Duration::from_secs(args.timeout);

    let input = infohash_input(&args.infohash).await?;
    let trackers = if args.tracker.is_empty() {
        None
    } else {
        Some(args.tracker)
    };

    let coordinator = ScrapeCoordinator::new(config);
    let results = coordinator.scrape(trackers, input).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        render_results(&results);
    }

    Ok(())
}

/// Resolves the `--infohash` value: a readable file is treated as a list
/// of newline-separated infohashes, anything else as the infohash string
/// itself.
async fn infohash_input(raw: &str) -> anyhow::Result<InfohashInput> {
    if Path::new(raw).is_file() {
        let content = tokio::fs::read_to_string(raw).await?;
        let hashes: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        if hashes.is_empty() {
            bail!("No infohashes found in {raw}");
        }
        return Ok(InfohashInput::Many(hashes));
    }

    if raw.trim().is_empty() {
        bail!("No infohashes supplied");
    }
    Ok(InfohashInput::from(raw))
}

fn render_results(results: &[TrackerResult]) {
    if results.is_empty() {
        println!("No trackers responded.");
        return;
    }

    for result in results {
        println!("{}", result.tracker);
        if let Some(error) = &result.error {
            println!("  error: {error}");
        }
        for entry in &result.results {
            match entry {
                ScrapeEntry::Stats {
                    infohash,
                    seeders,
                    completed,
                    leechers,
                } => println!(
                    "  {infohash}  seeders: {seeders}  completed: {completed}  leechers: {leechers}"
                ),
                ScrapeEntry::Error { infohash, error } => {
                    println!("  {infohash}  error: {error}");
                }
            }
        }
    }
}

//! Swarmscrape CLI - Command-line interface
//!
//! Provides command-line access to UDP tracker scraping.

mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "swarmscrape")]
#[command(about = "Scrape swarm statistics from UDP BitTorrent trackers")]
struct Cli {
    #[command(flatten)]
    args: commands::ScrapeArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    commands::run_scrape(cli.args).await?;

    Ok(())
}

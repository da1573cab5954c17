use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use realtor_agent_scraper::config::{ConfigManager, FileConfigManager};
use realtor_agent_scraper::{AgentScraper, ChromiumLauncher};

/// Scrape Realtor.com agent data.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The URL of the real estate agents page to scrape.
    origin_link: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = FileConfigManager::from_env()
        .load_config()
        .context("Failed to load configuration")?;

    let launcher = ChromiumLauncher::new(config.browser.clone());
    let scraper = AgentScraper::new(launcher, &config)?;

    let summary = scraper
        .run(&args.origin_link)
        .await
        .with_context(|| format!("Scrape of {} failed", args.origin_link))?;

    tracing::info!(
        "Done: {} agents reported, {} rows written",
        summary.total_found,
        summary.records_written
    );
    Ok(())
}

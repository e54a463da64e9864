//! `coverme-scrape` - fetch one job posting and print the scrape result as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use coverme_browser::ChromiumLauncher;
use coverme_core::{AppConfig, JobLink};
use coverme_scraper::ScrapePipeline;
use std::path::PathBuf;
use tracing::info;

/// Scrape a job posting for cover letter generation.
#[derive(Debug, Parser)]
#[command(name = "coverme-scrape", version, about)]
struct Cli {
    /// Job posting URL, or "general" for a general cover letter
    job_link: String,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "COVERME_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,coverme=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    info!("Starting coverme-scrape v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_with_env(cli.config.as_deref()).context("failed to load config")?;
    let link = JobLink::parse(&cli.job_link)?;

    let pipeline = ScrapePipeline::new(ChromiumLauncher::new(config.browser), config.scraper);

    let Some(result) = pipeline.scrape_job_link(&link).await else {
        eprintln!("General cover letter requested; no job posting to scrape.");
        return Ok(());
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("failed to serialize scrape result")?;
    println!("{json}");

    Ok(())
}

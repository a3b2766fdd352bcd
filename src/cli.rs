//! CLI commands for footballower-api.
//!
//! Supports the API server plus one-shot scrapes printed to stdout.

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::scraper::{self, PageClient};
use crate::teams;

#[derive(Parser)]
#[command(name = "footballower-api")]
#[command(version, about = "Premier League standings and fixtures API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },

    /// Fetch the league table once and print it as JSON
    Standings {
        /// Standings page URL override
        #[arg(long)]
        url: Option<String>,
    },

    /// Fetch a team page once and print recent results and the next fixture
    Matches {
        /// Team page URL
        #[arg(value_name = "URL")]
        url: String,
    },
}

/// Fetch and print the merged league table.
pub async fn run_standings(url: Option<String>) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let client = PageClient::new(&config.scraper)?;
    let index = teams::profile_index();
    let url = url.unwrap_or(config.scraper.standings_url);

    eprintln!("Fetching standings from {}", url);
    let table = scraper::fetch_standings(&client, &url, &index).await;
    eprintln!("{} rows", table.len());

    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

/// Fetch and print one team page.
pub async fn run_matches(url: String) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let client = PageClient::new(&config.scraper)?;

    eprintln!("Fetching team page {}", url);
    let report = scraper::fetch_team_page(&client, &url).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

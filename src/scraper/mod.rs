//! Web scraper module for premierleague.com and fctables.com.
//!
//! Provides HTTP fetching, HTML parsing, and the standings merge pipeline.
//! Nothing here is cached or persisted; every call fetches fresh.

pub mod client;
pub mod parsers;

pub use client::PageClient;
pub use parsers::{FixtureReport, StandingsParser, TeamPageParser};

use anyhow::Result;

use crate::teams::{merge_standings, ProfileIndex, TableStanding};

/// League table page scraped by `fetch_standings`.
pub const DEFAULT_STANDINGS_URL: &str = "https://www.premierleague.com/tables";

/// Fetch and parse the league table, merged with the static team profiles.
///
/// Never fails: any fetch or parse error is logged and an empty table is
/// returned, indistinguishable from a table with no rows.
pub async fn fetch_standings(
    client: &PageClient,
    url: &str,
    index: &ProfileIndex,
) -> Vec<TableStanding> {
    match standings(client, url, index).await {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("standings scrape failed: {:#}", e);
            Vec::new()
        }
    }
}

async fn standings(
    client: &PageClient,
    url: &str,
    index: &ProfileIndex,
) -> Result<Vec<TableStanding>> {
    let html = client.fetch_page(url).await?;
    let rows = StandingsParser::parse(&html)?;
    Ok(merge_standings(rows, index))
}

/// Fetch and parse a team page: recent results plus the next fixture.
///
/// Unlike the standings path, failures propagate so the caller can report
/// them distinctly from an empty result.
pub async fn fetch_team_page(client: &PageClient, url: &str) -> Result<FixtureReport> {
    let html = client.fetch_page(url).await?;
    TeamPageParser::parse(&html)
}

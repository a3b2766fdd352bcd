//! League table parser for premierleague.com.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::teams::canonical_team_name;

/// One row of the league table, rank and points as rendered by the page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StandingsRow {
    pub team: String,
    pub rank: String,
    pub points: String,
}

/// Parser for the league standings page
pub struct StandingsParser;

impl StandingsParser {
    /// Parse standings rows from HTML, in document order.
    ///
    /// Only the Premier League tbody of the shared table layout is read;
    /// the other competitions on the page use different tbody classes.
    /// Rows without a team name are header artifacts and are skipped.
    pub fn parse(html: &str) -> Result<Vec<StandingsRow>> {
        let document = Html::parse_document(html);

        let row_selector = Selector::parse("tbody.league-table__tbody.isPL tr").unwrap();
        let team_selector = Selector::parse(".team .long").unwrap();
        let rank_selector = Selector::parse(".league-table__value").unwrap();
        let points_selector = Selector::parse(".points").unwrap();

        let mut rows = Vec::new();
        for row in document.select(&row_selector) {
            let team = Self::cell_text(&row, &team_selector);
            if team.is_empty() {
                continue;
            }

            rows.push(StandingsRow {
                team: canonical_team_name(&team),
                rank: Self::cell_text(&row, &rank_selector),
                points: Self::cell_text(&row, &points_selector),
            });
        }

        Ok(rows)
    }

    fn cell_text(row: &ElementRef, selector: &Selector) -> String {
        row.select(selector)
            .next()
            .map(|elem| elem.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }
}

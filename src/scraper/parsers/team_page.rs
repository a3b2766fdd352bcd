//! Team page parser for fctables.com.
//!
//! Extracts the last-matches box and the next fixture from the
//! head-to-head box.

use anyhow::Result;
use chrono::DateTime;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::teams::canonical_team_name;

/// Most recent results kept from the last-matches box.
pub const MAX_RECENT_MATCHES: usize = 5;

/// Position of the next-fixture entry among the head-to-head status rows;
/// the seven entries before it are past meetings.
const NEXT_FIXTURE_STATUS_ENTRY: usize = 7;

/// Child span indexes inside the score element. Span 1 holds the dash
/// between the two scores, not a score.
const HOME_SCORE_SPAN: usize = 0;
const AWAY_SCORE_SPAN: usize = 2;

/// Opponent cells rendered by the fixture box: home then away.
const FIXTURE_TEAM_CELLS: usize = 2;

/// One finished match from the last-matches box.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentMatch {
    pub home_team: String,
    pub away_team: String,
    pub home_score: String,
    pub away_score: String,
}

/// Kickoff of the next fixture: formatted date plus the raw text as
/// rendered by the page.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KickoffDate {
    pub date: String,
    pub date_text: String,
}

/// The next fixture's opponents (home, away, as rendered) and kickoff.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingFixture {
    pub next_match: Vec<String>,
    pub match_date: Option<KickoffDate>,
}

/// Parsed team page.
///
/// `upcoming_fixture` is populated only when fewer than five recent
/// matches were found, mirroring the source page's combined list that
/// caps at six entries.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixtureReport {
    pub recent_matches: Vec<RecentMatch>,
    pub upcoming_fixture: Option<UpcomingFixture>,
}

/// Parser for team profile pages
pub struct TeamPageParser;

impl TeamPageParser {
    /// Parse recent results and the next fixture from HTML.
    ///
    /// Missing containers degrade to empty fields; this never fails on
    /// markup shape alone.
    pub fn parse(html: &str) -> Result<FixtureReport> {
        let document = Html::parse_document(html);

        let recent_matches = Self::parse_recent_matches(&document);
        let upcoming_fixture = if recent_matches.len() < MAX_RECENT_MATCHES {
            Some(UpcomingFixture {
                next_match: Self::parse_opponents(&document),
                match_date: Self::parse_kickoff(&document),
            })
        } else {
            None
        };

        Ok(FixtureReport {
            recent_matches,
            upcoming_fixture,
        })
    }

    fn parse_recent_matches(document: &Html) -> Vec<RecentMatch> {
        let container_selector = Selector::parse("div.box_last_matches").unwrap();
        let game_selector = Selector::parse("div.game").unwrap();
        let home_selector = Selector::parse("span.home").unwrap();
        let away_selector = Selector::parse("span.away").unwrap();
        let score_selector = Selector::parse("span.score.text-center").unwrap();
        let span_selector = Selector::parse("span").unwrap();

        let mut matches = Vec::new();
        let Some(container) = document.select(&container_selector).next() else {
            return matches;
        };

        for game in container.select(&game_selector).take(MAX_RECENT_MATCHES) {
            let (home_score, away_score) = match game.select(&score_selector).next() {
                Some(score) => {
                    let spans: Vec<ElementRef> = score.select(&span_selector).collect();
                    (
                        Self::span_text(&spans, HOME_SCORE_SPAN),
                        Self::span_text(&spans, AWAY_SCORE_SPAN),
                    )
                }
                None => (String::new(), String::new()),
            };

            matches.push(RecentMatch {
                home_team: Self::first_text(&game, &home_selector),
                away_team: Self::first_text(&game, &away_selector),
                home_score,
                away_score,
            });
        }

        matches
    }

    fn parse_kickoff(document: &Html) -> Option<KickoffDate> {
        let container_selector = Selector::parse("div.small_box_h2h").unwrap();
        let status_selector = Selector::parse("div.status").unwrap();
        let date_selector = Selector::parse("div.date").unwrap();

        let container = document.select(&container_selector).next()?;
        let status = container
            .select(&status_selector)
            .nth(NEXT_FIXTURE_STATUS_ENTRY)?;
        let date_div = status.select(&date_selector).next()?;

        let date_text = date_div.text().collect::<String>().trim().to_string();
        let unix: i64 = date_div.value().attr("data-unixtime")?.trim().parse().ok()?;

        Some(KickoffDate {
            date: Self::format_kickoff(unix)?,
            date_text,
        })
    }

    /// Render a Unix timestamp as "DD Mon YYYY, HH:MM" in UTC.
    fn format_kickoff(unix: i64) -> Option<String> {
        DateTime::from_timestamp(unix, 0).map(|dt| dt.format("%d %b %Y, %H:%M").to_string())
    }

    fn parse_opponents(document: &Html) -> Vec<String> {
        let container_selector = Selector::parse("div.game_box").unwrap();
        let cell_selector = Selector::parse("div.col-xs-5").unwrap();
        let anchor_selector = Selector::parse("a").unwrap();

        let mut opponents = Vec::new();
        let Some(container) = document.select(&container_selector).next() else {
            return opponents;
        };

        for cell in container.select(&cell_selector).take(FIXTURE_TEAM_CELLS) {
            // The cell holds a crest link and a name link; the name is the
            // last anchor.
            let Some(anchor) = cell.select(&anchor_selector).last() else {
                continue;
            };
            let name = anchor.text().collect::<String>();
            opponents.push(canonical_team_name(&name));
        }

        opponents
    }

    fn span_text(spans: &[ElementRef], index: usize) -> String {
        spans
            .get(index)
            .map(|elem| elem.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    fn first_text(elem: &ElementRef, selector: &Selector) -> String {
        elem.select(selector)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_div(home: &str, away: &str, home_score: &str, away_score: &str) -> String {
        format!(
            r#"<div class="game">
                 <span class="home">{}</span>
                 <span class="score text-center"><span>{}</span><span>-</span><span>{}</span></span>
                 <span class="away">{}</span>
               </div>"#,
            home, home_score, away_score, away
        )
    }

    fn h2h_box(status_count: usize, unixtime: Option<&str>) -> String {
        let mut statuses = String::new();
        for i in 0..status_count {
            if i == 7 {
                let attr = unixtime
                    .map(|t| format!(r#" data-unixtime="{}""#, t))
                    .unwrap_or_default();
                statuses.push_str(&format!(
                    r#"<div class="status"><div class="date"{}>15/12/2024</div></div>"#,
                    attr
                ));
            } else {
                statuses.push_str(r#"<div class="status"><div class="date">old</div></div>"#);
            }
        }
        format!(r#"<div class="small_box_h2h">{}</div>"#, statuses)
    }

    fn fixture_box(home: &str, away: &str) -> String {
        format!(
            r#"<div class="game_box">
                 <div class="col-xs-5"><a href="/crest">img</a><a href="/team">{}</a></div>
                 <div class="col-xs-2">vs</div>
                 <div class="col-xs-5"><a href="/crest">img</a><a href="/team">{}</a></div>
               </div>"#,
            home, away
        )
    }

    fn page(games: usize, statuses: usize, unixtime: Option<&str>) -> String {
        let mut matches = String::new();
        for i in 0..games {
            matches.push_str(&game_div(
                &format!("Home {}", i),
                &format!("Away {}", i),
                "2",
                "1",
            ));
        }
        format!(
            r#"<html><body>
               <div class="box_last_matches">{}</div>
               {}
               {}
               </body></html>"#,
            matches,
            h2h_box(statuses, unixtime),
            fixture_box("Arsenal", "Tottenham"),
        )
    }

    #[test]
    fn test_five_matches_suppress_upcoming_fixture() {
        let report = TeamPageParser::parse(&page(5, 8, Some("1734280200"))).unwrap();

        assert_eq!(report.recent_matches.len(), 5);
        assert!(report.upcoming_fixture.is_none());
    }

    #[test]
    fn test_extra_matches_are_ignored() {
        let report = TeamPageParser::parse(&page(7, 8, Some("1734280200"))).unwrap();

        assert_eq!(report.recent_matches.len(), MAX_RECENT_MATCHES);
        assert_eq!(report.recent_matches[4].home_team, "Home 4");
    }

    #[test]
    fn test_scores_skip_separator_span() {
        let report = TeamPageParser::parse(&page(1, 0, None)).unwrap();

        let m = &report.recent_matches[0];
        assert_eq!(m.home_score, "2");
        assert_eq!(m.away_score, "1");
    }

    #[test]
    fn test_fewer_matches_append_upcoming_fixture() {
        let report = TeamPageParser::parse(&page(3, 8, Some("1734280200"))).unwrap();

        assert_eq!(report.recent_matches.len(), 3);
        let fixture = report.upcoming_fixture.expect("fixture expected");
        assert_eq!(
            fixture.next_match,
            vec!["Arsenal FC".to_string(), "Tottenham Hotspur FC".to_string()]
        );
    }

    #[test]
    fn test_kickoff_formatting_is_deterministic() {
        let report = TeamPageParser::parse(&page(0, 8, Some("1734280200"))).unwrap();

        let date = report
            .upcoming_fixture
            .unwrap()
            .match_date
            .expect("kickoff expected");
        assert_eq!(date.date, "15 Dec 2024, 16:30");
        assert_eq!(date.date_text, "15/12/2024");
    }

    #[test]
    fn test_short_status_list_yields_no_kickoff() {
        let report = TeamPageParser::parse(&page(0, 5, Some("1734280200"))).unwrap();

        let fixture = report.upcoming_fixture.unwrap();
        assert!(fixture.match_date.is_none());
        assert_eq!(fixture.next_match.len(), 2);
    }

    #[test]
    fn test_missing_unixtime_yields_no_kickoff() {
        let report = TeamPageParser::parse(&page(0, 8, None)).unwrap();
        assert!(report.upcoming_fixture.unwrap().match_date.is_none());
    }

    #[test]
    fn test_empty_document_degrades() {
        let report = TeamPageParser::parse("<html></html>").unwrap();

        assert!(report.recent_matches.is_empty());
        let fixture = report.upcoming_fixture.unwrap();
        assert!(fixture.next_match.is_empty());
        assert!(fixture.match_date.is_none());
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = TeamPageParser::parse(&page(1, 8, Some("1734280200"))).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["recentMatches"][0]["homeTeam"], "Home 0");
        assert_eq!(json["recentMatches"][0]["awayScore"], "1");
        assert_eq!(
            json["upcomingFixture"]["matchDate"]["dateText"],
            "15/12/2024"
        );
    }
}

//! HTML parsers for the scraped pages.

pub mod standings;
pub mod team_page;

pub use standings::{StandingsParser, StandingsRow};
pub use team_page::{FixtureReport, KickoffDate, RecentMatch, TeamPageParser, UpcomingFixture};

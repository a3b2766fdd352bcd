//! Static Premier League team reference data.
//!
//! Hand-curated profiles keyed by canonical club name, the canonical-name
//! function applied to every scraped source, and the standings merge.

use serde::Serialize;
use std::collections::HashMap;

use crate::scraper::parsers::standings::StandingsRow;

/// Static profile for one club. Immutable for the process lifetime.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamProfile {
    pub name: &'static str,
    pub profile_url: &'static str,
    pub coach: &'static str,
    pub competitions: &'static [&'static str],
    pub id: u32,
    pub crest_url: &'static str,
}

/// A standings row together with its matched profile, when one exists.
///
/// Serializes flat: profile fields sit beside the row fields, and rows
/// without a profile serialize as the bare row.
#[derive(Debug, Serialize, PartialEq)]
pub struct TableStanding {
    #[serde(flatten)]
    pub row: StandingsRow,
    #[serde(flatten)]
    pub profile: Option<&'static TeamProfile>,
}

/// Name index over the static profiles.
pub type ProfileIndex = HashMap<&'static str, &'static TeamProfile>;

/// Suffix the canonical naming convention appends to club names.
const CLUB_SUFFIX: &str = " FC";

/// Known-malformed scraped names and their canonical counterparts.
///
/// The team pages abbreviate some club names in ways the standings page and
/// the profile table do not.
pub const TEAM_NAME_ALIASES: &[(&str, &str)] = &[
    ("Tottenham FC", "Tottenham Hotspur FC"),
    ("Brighton FC", "Brighton and Hove Albion FC"),
    ("Ipswich FC", "Ipswich Town FC"),
    ("West Ham FC", "West Ham United FC"),
    ("Leicester FC", "Leicester City FC"),
];

/// Canonicalize a scraped team name.
///
/// Trims, appends the " FC" suffix when missing, then resolves known
/// aliases. Applied uniformly at ingestion from every scraped source.
pub fn canonical_team_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let suffixed = if trimmed.ends_with("FC") {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, CLUB_SUFFIX)
    };

    match TEAM_NAME_ALIASES.iter().find(|(wrong, _)| *wrong == suffixed) {
        Some((_, canonical)) => (*canonical).to_string(),
        None => suffixed,
    }
}

/// Build the name index once at startup. First entry wins on duplicates.
pub fn profile_index() -> ProfileIndex {
    let mut index = ProfileIndex::new();
    for profile in PREMIER_LEAGUE_TEAMS {
        index.entry(profile.name).or_insert(profile);
    }
    index
}

/// Join standings rows against the profile index by exact name.
///
/// One output row per input row, in order; unmatched rows pass through
/// without a profile.
pub fn merge_standings(rows: Vec<StandingsRow>, index: &ProfileIndex) -> Vec<TableStanding> {
    rows.into_iter()
        .map(|row| {
            let profile = index.get(row.team.as_str()).copied();
            TableStanding { row, profile }
        })
        .collect()
}

/// The 20 clubs of the current season.
pub const PREMIER_LEAGUE_TEAMS: &[TeamProfile] = &[
    TeamProfile {
        name: "Manchester City FC",
        profile_url: "https://www.fctables.com/teams/manchester-city-189570/",
        coach: "Pep Guardiola",
        competitions: &["Premier League", "UEFA Champions League"],
        id: 65,
        crest_url: "https://crests.football-data.org/65.png",
    },
    TeamProfile {
        name: "Liverpool FC",
        profile_url: "https://www.fctables.com/teams/liverpool-189071/",
        coach: "Arne Slot",
        competitions: &["Premier League", "UEFA Champions League"],
        id: 64,
        crest_url: "https://crests.football-data.org/64.png",
    },
    TeamProfile {
        name: "Arsenal FC",
        profile_url: "https://www.fctables.com/teams/arsenal-180231/",
        coach: "Mikel Arteta",
        competitions: &["Premier League", "UEFA Champions League"],
        id: 57,
        crest_url: "https://crests.football-data.org/57.png",
    },
    TeamProfile {
        name: "Chelsea FC",
        profile_url: "https://www.fctables.com/teams/chelsea-182666/",
        coach: "Mauricio Pochettino",
        competitions: &["Premier League", "UEFA Europa Conference League"],
        id: 61,
        crest_url: "https://crests.football-data.org/61.png",
    },
    TeamProfile {
        name: "Manchester United FC",
        profile_url: "https://www.fctables.com/teams/manchester-united-189577/",
        coach: "Erik ten Hag",
        competitions: &["Premier League", "UEFA Europa League"],
        id: 66,
        crest_url: "https://crests.football-data.org/66.png",
    },
    TeamProfile {
        name: "Tottenham Hotspur FC",
        profile_url: "https://www.fctables.com/teams/tottenham-195775/",
        coach: "Angelos Postecoglou",
        competitions: &["Premier League", "UEFA Europa League"],
        id: 73,
        crest_url: "https://crests.football-data.org/73.png",
    },
    TeamProfile {
        name: "West Ham United FC",
        profile_url: "https://www.fctables.com/teams/west-ham-197305/",
        coach: "David Moyes",
        competitions: &["Premier League"],
        id: 563,
        crest_url: "https://crests.football-data.org/563.png",
    },
    TeamProfile {
        name: "Everton FC",
        profile_url: "https://www.fctables.com/teams/everton-184479/",
        coach: "Sean Dyche",
        competitions: &["Premier League"],
        id: 62,
        crest_url: "https://crests.football-data.org/62.png",
    },
    TeamProfile {
        name: "Leicester City FC",
        profile_url: "https://www.fctables.com/teams/leicester-188852/",
        coach: "Steve Cooper",
        competitions: &["Premier League"],
        id: 338,
        crest_url: "https://crests.football-data.org/338.png",
    },
    TeamProfile {
        name: "Aston Villa FC",
        profile_url: "https://www.fctables.com/teams/aston-villa-180502/",
        coach: "Unai Emery",
        competitions: &["Premier League", "UEFA Champions League"],
        id: 58,
        crest_url: "https://crests.football-data.org/58.png",
    },
    TeamProfile {
        name: "Brighton and Hove Albion FC",
        profile_url: "https://www.fctables.com/teams/brighton-181730/",
        coach: "Roberto De Zerbi",
        competitions: &["Premier League"],
        id: 397,
        crest_url: "https://crests.football-data.org/397.png",
    },
    TeamProfile {
        name: "Newcastle United FC",
        profile_url: "https://www.fctables.com/teams/newcastle-united-190686/",
        coach: "Eddie Howe",
        competitions: &["Premier League"],
        id: 67,
        crest_url: "https://crests.football-data.org/67.png",
    },
    TeamProfile {
        name: "Wolverhampton Wanderers FC",
        profile_url: "https://www.fctables.com/teams/wolverhampton-197476/",
        coach: "Gary O'Neil",
        competitions: &["Premier League"],
        id: 76,
        crest_url: "https://crests.football-data.org/76.png",
    },
    TeamProfile {
        name: "Nottingham Forest FC",
        profile_url: "https://www.fctables.com/teams/nottingham-forest-190924/",
        coach: "Steve Cooper",
        competitions: &["Premier League"],
        id: 351,
        crest_url: "https://crests.football-data.org/351.png",
    },
    TeamProfile {
        name: "Ipswich Town FC",
        profile_url: "https://www.fctables.com/teams/ipswich-187495/",
        coach: "Kieran McKenna",
        competitions: &["Premier League"],
        id: 349,
        crest_url: "https://crests.football-data.org/349.png",
    },
    TeamProfile {
        name: "Southampton FC",
        profile_url: "https://www.fctables.com/teams/southampton-194444/",
        coach: "Russell Martin",
        competitions: &["Premier League"],
        id: 340,
        crest_url: "https://crests.football-data.org/340.png",
    },
    TeamProfile {
        name: "Brentford FC",
        profile_url: "https://www.fctables.com/teams/brentford-181700/",
        coach: "Thomas Frank",
        competitions: &["Premier League"],
        id: 402,
        crest_url: "https://crests.football-data.org/402.png",
    },
    TeamProfile {
        name: "Bournemouth FC",
        profile_url: "https://www.fctables.com/teams/bournemouth-179321/",
        coach: "Andoni Iraola",
        competitions: &["Premier League"],
        id: 1044,
        crest_url: "https://crests.football-data.org/bournemouth.png",
    },
    TeamProfile {
        name: "Fulham FC",
        profile_url: "https://www.fctables.com/teams/fulham-185904/",
        coach: "Marco Silva",
        competitions: &["Premier League"],
        id: 63,
        crest_url: "https://crests.football-data.org/63.png",
    },
    TeamProfile {
        name: "Crystal Palace FC",
        profile_url: "https://www.fctables.com/teams/crystal-palace-183166/",
        coach: "Roy Hodgson",
        competitions: &["Premier League"],
        id: 354,
        crest_url: "https://crests.football-data.org/354.png",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn row(team: &str, rank: &str, points: &str) -> StandingsRow {
        StandingsRow {
            team: team.to_string(),
            rank: rank.to_string(),
            points: points.to_string(),
        }
    }

    #[test]
    fn test_canonical_name_appends_suffix() {
        assert_eq!(canonical_team_name("Arsenal"), "Arsenal FC");
        assert_eq!(canonical_team_name("  Fulham  "), "Fulham FC");
    }

    #[test]
    fn test_canonical_name_keeps_existing_suffix() {
        assert_eq!(canonical_team_name("Everton FC"), "Everton FC");
    }

    #[test]
    fn test_canonical_name_resolves_all_aliases() {
        for (wrong, correct) in TEAM_NAME_ALIASES {
            let bare = wrong.strip_suffix(" FC").unwrap();
            assert_eq!(canonical_team_name(bare), *correct);
            assert_eq!(canonical_team_name(wrong), *correct);
        }
    }

    #[test]
    fn test_canonical_name_passes_unknown_through() {
        assert_eq!(canonical_team_name("Real Madrid"), "Real Madrid FC");
    }

    #[test]
    fn test_profile_index_covers_all_teams() {
        let index = profile_index();
        assert_eq!(index.len(), PREMIER_LEAGUE_TEAMS.len());
        assert!(index.contains_key("Arsenal FC"));
        assert!(index.contains_key("Wolverhampton Wanderers FC"));
    }

    #[test]
    fn test_merge_preserves_length_and_order() {
        let index = profile_index();
        let rows = vec![
            row("Arsenal FC", "1", "45"),
            row("Phantom Rovers FC", "2", "44"),
            row("Chelsea FC", "3", "41"),
        ];
        let merged = merge_standings(rows.clone(), &index);

        assert_eq!(merged.len(), rows.len());
        assert_eq!(merged[0].row, rows[0]);
        assert_eq!(merged[1].row, rows[1]);
        assert_eq!(merged[2].row, rows[2]);
    }

    #[test]
    fn test_merge_attaches_matching_profile() {
        let index = profile_index();
        let merged = merge_standings(vec![row("Arsenal FC", "3", "45")], &index);

        let profile = merged[0].profile.expect("Arsenal should match");
        assert_eq!(profile.coach, "Mikel Arteta");
        assert_eq!(profile.id, 57);
        assert_eq!(profile.crest_url, "https://crests.football-data.org/57.png");
    }

    #[test]
    fn test_merge_passes_unmatched_row_through() {
        let index = profile_index();
        let merged = merge_standings(vec![row("Phantom Rovers FC", "21", "0")], &index);

        assert!(merged[0].profile.is_none());
        assert_eq!(merged[0].row, row("Phantom Rovers FC", "21", "0"));
    }

    #[test]
    fn test_merged_row_serializes_flat() {
        let index = profile_index();
        let merged = merge_standings(vec![row("Arsenal FC", "3", "45")], &index);
        let json = serde_json::to_value(&merged[0]).unwrap();

        assert_eq!(json["team"], "Arsenal FC");
        assert_eq!(json["rank"], "3");
        assert_eq!(json["points"], "45");
        assert_eq!(json["name"], "Arsenal FC");
        assert_eq!(json["coach"], "Mikel Arteta");
        assert_eq!(json["id"], 57);
        assert_eq!(json["profileUrl"], "https://www.fctables.com/teams/arsenal-180231/");
    }

    #[test]
    fn test_unmatched_row_serializes_bare() {
        let index = profile_index();
        let merged = merge_standings(vec![row("Phantom Rovers FC", "21", "0")], &index);
        let json = serde_json::to_value(&merged[0]).unwrap();

        assert_eq!(json["team"], "Phantom Rovers FC");
        assert!(json.get("coach").is_none());
        assert!(json.get("id").is_none());
    }
}

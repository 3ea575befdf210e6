//! CompCore
//!
//! The computational core of a robotics competition management suite: it
//! evaluates a declarative "compstate" (arenas, teams, a league match plan,
//! a timetable with delays, per-match score sheets and a knockout plan) into
//! a single immutable model answering "what is happening now?" and "what
//! happens next?".
//!
//! # Quick Start
//!
//! ```rust
//! use compcore::prelude::*;
//! use compcore::compstate::{
//!     ArenaRecord, ArenasFile, InMemoryCompstate, LeagueFile, PeriodRecord, ScheduleFile,
//!     TeamRecord, TeamsFile,
//! };
//! use std::collections::BTreeMap;
//!
//! fn main() -> compcore::Result<()> {
//!     let arenas = ArenasFile {
//!         arenas: BTreeMap::from([(
//!             ArenaId::new("main"),
//!             ArenaRecord {
//!                 display_name: "Main Arena".to_string(),
//!                 colour: None,
//!             },
//!         )]),
//!         teams_per_arena: 4,
//!     };
//!
//!     let teams = TeamsFile {
//!         teams: ["AAA", "BBB", "CCC", "DDD"]
//!             .iter()
//!             .map(|id| {
//!                 (
//!                     TeamId::new(*id),
//!                     TeamRecord {
//!                         name: format!("Team {id}"),
//!                         rookie: false,
//!                         dropped_out_after: None,
//!                     },
//!                 )
//!             })
//!             .collect(),
//!     };
//!
//!     let schedule = ScheduleFile {
//!         match_slot_length_seconds: 300,
//!         match_period_gap_seconds: 180,
//!         match_periods: vec![PeriodRecord {
//!             description: "League".to_string(),
//!             start_time: "2024-04-06T10:00:00+00:00".parse().unwrap(),
//!             end_time: "2024-04-06T11:00:00+00:00".parse().unwrap(),
//!             max_end_time: None,
//!             match_type: MatchType::League,
//!         }],
//!         delays: Vec::new(),
//!     };
//!
//!     let league = LeagueFile {
//!         matches: BTreeMap::from([(
//!             0,
//!             BTreeMap::from([(
//!                 ArenaId::new("main"),
//!                 vec![
//!                     Some(TeamId::new("AAA")),
//!                     Some(TeamId::new("BBB")),
//!                     Some(TeamId::new("CCC")),
//!                     Some(TeamId::new("DDD")),
//!                 ],
//!             )]),
//!         )]),
//!     };
//!
//!     let compstate = InMemoryCompstate::new(arenas, teams, schedule, league);
//!     let competition = Competition::load(&compstate, &GamePointsScorer)?;
//!
//!     let now: DateTime<FixedOffset> = "2024-04-06T10:02:00+00:00".parse().unwrap();
//!     let state = competition.state_at(now);
//!     assert_eq!(state.current_matches.len(), 1);
//!     assert_eq!(state.current_matches[0].display_name, "Match 0");
//!     Ok(())
//! }
//! ```

pub mod awards;
pub mod competition;
pub mod compstate;
pub mod error;
pub mod knockout;
pub mod matches;
pub mod schedule;
pub mod scoring;
pub mod teams;

// Re-export commonly used types
pub use awards::{AwardKind, Awards};
pub use competition::{Competition, CompetitionState};
#[cfg(feature = "yaml")]
pub use compstate::YamlCompstate;
pub use compstate::{CompstateSource, InMemoryCompstate};
pub use error::{CompError, Result};
pub use knockout::{KnockoutBracket, KnockoutRound, SlotSource};
pub use matches::{Arena, ArenaId, Match, MatchNumber, MatchType, TeamId};
pub use schedule::{Delay, MatchPeriod, MatchPeriodClock, ScheduleBinder, ScheduleConfig};
pub use scoring::{
    GamePointsScorer, RawScoresheet, ScoreReport, Scorer, Standing, Standings, SubprocessScorer,
    TieBreak, TieBreakChain,
};
pub use teams::{Team, TeamRegistry};

/// Prelude module for convenient imports
pub mod prelude;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compstate::{
        ArenaRecord, ArenasFile, LeagueFile, PeriodRecord, ScheduleFile, ScoreEntry, ScoreFile,
        ScoresRecord, TeamRecord, TeamsFile,
    };
    use chrono::{DateTime, FixedOffset};
    use std::collections::BTreeMap;

    #[test]
    fn basic_evaluation_flow() -> Result<()> {
        let arenas = ArenasFile {
            arenas: BTreeMap::from([(
                ArenaId::new("main"),
                ArenaRecord {
                    display_name: "Main Arena".to_string(),
                    colour: None,
                },
            )]),
            teams_per_arena: 4,
        };
        let teams = TeamsFile {
            teams: ["AAA", "BBB", "CCC", "DDD"]
                .iter()
                .map(|id| {
                    (
                        TeamId::new(*id),
                        TeamRecord {
                            name: format!("Team {id}"),
                            rookie: false,
                            dropped_out_after: None,
                        },
                    )
                })
                .collect(),
        };
        let schedule = ScheduleFile {
            match_slot_length_seconds: 300,
            match_period_gap_seconds: 180,
            match_periods: vec![PeriodRecord {
                description: "League".to_string(),
                start_time: "2024-04-06T10:00:00+00:00".parse().unwrap(),
                end_time: "2024-04-06T11:00:00+00:00".parse().unwrap(),
                max_end_time: None,
                match_type: MatchType::League,
            }],
            delays: Vec::new(),
        };
        let league = LeagueFile {
            matches: BTreeMap::from([(
                0,
                BTreeMap::from([(
                    ArenaId::new("main"),
                    vec![
                        Some(TeamId::new("AAA")),
                        Some(TeamId::new("BBB")),
                        Some(TeamId::new("CCC")),
                        Some(TeamId::new("DDD")),
                    ],
                )]),
            )]),
        };

        let mut compstate = InMemoryCompstate::new(arenas, teams, schedule, league);
        compstate.league_scores = vec![ScoreEntry {
            arena: ArenaId::new("main"),
            num: 0,
            file: ScoreFile {
                scores: ScoresRecord {
                    game: [
                        (TeamId::new("AAA"), 10.0),
                        (TeamId::new("BBB"), 8.0),
                        (TeamId::new("CCC"), 8.0),
                        (TeamId::new("DDD"), 2.0),
                    ]
                    .into_iter()
                    .collect(),
                    disqualified: Vec::new(),
                    present: None,
                },
            },
        }];

        let competition = Competition::load(&compstate, &GamePointsScorer)?;

        assert!(competition.standings().is_finalised());
        assert_eq!(competition.position_of(&TeamId::new("AAA")), Some(1));
        assert_eq!(competition.position_of(&TeamId::new("BBB")), Some(2));
        assert_eq!(competition.position_of(&TeamId::new("CCC")), Some(2));
        assert_eq!(competition.position_of(&TeamId::new("DDD")), Some(4));

        let now: DateTime<FixedOffset> = "2024-04-06T10:06:00+00:00".parse().unwrap();
        assert!(competition.matches_at(now).is_empty());
        assert!(competition.next_match_slot(now).is_none());

        Ok(())
    }
}

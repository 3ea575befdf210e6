//! Prelude module with commonly used types and traits
//!
//! Import this module to get all the essential types for using CompCore:
//!
//! ```rust
//! use compcore::prelude::*;
//! ```

pub use crate::{
    awards::{AwardKind, Awards},
    competition::{Competition, CompetitionState},
    compstate::{CompstateSource, InMemoryCompstate},
    error::{CompError, Result},
    knockout::{KnockoutBracket, KnockoutRound, SlotSource},
    matches::{Arena, ArenaId, Match, MatchNumber, MatchType, TeamId},
    schedule::{Delay, MatchPeriod, MatchPeriodClock, ScheduleBinder, ScheduleConfig},
    scoring::{
        GamePointsScorer, RawScoresheet, ScoreReport, Scorer, Standing, Standings,
        SubprocessScorer, TieBreak, TieBreakChain,
    },
    teams::{Team, TeamRegistry},
};

#[cfg(feature = "yaml")]
pub use crate::compstate::YamlCompstate;

// Re-export common external dependencies
pub use chrono::{DateTime, Duration, FixedOffset};
pub use serde::{Deserialize, Serialize};

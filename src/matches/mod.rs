pub mod plan;
pub mod ranking;
pub mod types;

pub use plan::{MatchPlan, PlannedMatch};
pub use ranking::{rank, rank_report, MatchRanking, Participant, RankGroup, TopSelection};
pub use types::{Arena, ArenaId, Match, MatchNumber, MatchType, TeamId};

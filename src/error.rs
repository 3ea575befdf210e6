use crate::matches::{ArenaId, MatchNumber, MatchType, TeamId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompError {
    #[error("schema error in {path}: {message}")]
    Schema { path: String, message: String },

    #[error("unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("unknown arena: {0}")]
    UnknownArena(ArenaId),

    #[error("no league standing for seed {0}")]
    UnknownSeed(u32),

    #[error("duplicate match {num} in arena {arena}")]
    DuplicateMatch { arena: ArenaId, num: MatchNumber },

    #[error("match {num} in arena {arena} has {got} team slots, expected {expected}")]
    CapacityMismatch {
        arena: ArenaId,
        num: MatchNumber,
        got: usize,
        expected: usize,
    },

    #[error("{unscheduled} {phase} matches do not fit in the configured match periods")]
    PlanExceedsPeriods {
        phase: MatchType,
        unscheduled: usize,
    },

    #[error("no slot left before the end of period \"{period}\"")]
    OutOfTime { period: String },

    #[error("no score recorded for match {num} in arena {arena}")]
    MissingScore { arena: ArenaId, num: MatchNumber },

    #[error("score for match {num} was filed under arena {reported}, but the match runs in {actual}")]
    ScoresheetArenaMismatch {
        num: MatchNumber,
        reported: ArenaId,
        actual: ArenaId,
    },

    #[error("score for match {num} in arena {arena} names team {team}, which is not in that match")]
    UnknownTeamInScore {
        arena: ArenaId,
        num: MatchNumber,
        team: TeamId,
    },

    #[error("scorer returned invalid data: {0}")]
    Scorer(String),

    #[error("cannot order teams for knockout progression: {0:?}")]
    TieUnresolved(Vec<TeamId>),
}

impl CompError {
    /// Exit code reserved for this error class when a CLI wraps the core:
    /// 2 schema/reference, 3 scheduling, 4 scoring, 5 internal inconsistency.
    pub fn exit_code(&self) -> i32 {
        match self {
            CompError::Schema { .. }
            | CompError::UnknownTeam(_)
            | CompError::UnknownArena(_)
            | CompError::UnknownSeed(_)
            | CompError::DuplicateMatch { .. }
            | CompError::CapacityMismatch { .. } => 2,
            CompError::PlanExceedsPeriods { .. } | CompError::OutOfTime { .. } => 3,
            CompError::MissingScore { .. }
            | CompError::ScoresheetArenaMismatch { .. }
            | CompError::UnknownTeamInScore { .. }
            | CompError::Scorer(_) => 4,
            CompError::TieUnresolved(_) => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompError>;

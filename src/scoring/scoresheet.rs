use crate::matches::{ArenaId, MatchNumber, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A match scoresheet as recorded in the compstate, before scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawScoresheet {
    pub arena: ArenaId,
    pub num: MatchNumber,
    /// Raw per-team game entries, as produced by the deserialiser
    pub game: BTreeMap<TeamId, f64>,
    pub disqualified: BTreeSet<TeamId>,
    /// Teams that turned up; `None` means everyone listed in `game` did
    pub present: Option<BTreeSet<TeamId>>,
}

impl RawScoresheet {
    pub fn new(arena: ArenaId, num: MatchNumber, game: BTreeMap<TeamId, f64>) -> Self {
        Self {
            arena,
            num,
            game,
            disqualified: BTreeSet::new(),
            present: None,
        }
    }

    pub fn is_present(&self, team: &TeamId) -> bool {
        self.present.as_ref().map_or(true, |p| p.contains(team))
    }

    pub fn teams(&self) -> impl Iterator<Item = &TeamId> {
        self.game.keys()
    }
}

/// One validated line of a score report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScoreLine {
    pub game_points: f64,
    pub disqualified: bool,
    pub present: bool,
}

/// The scored report for one match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub arena: ArenaId,
    pub num: MatchNumber,
    pub teams: BTreeMap<TeamId, TeamScoreLine>,
}

impl ScoreReport {
    pub fn line(&self, team: &TeamId) -> Option<&TeamScoreLine> {
        self.teams.get(team)
    }

    pub fn game_points(&self, team: &TeamId) -> Option<f64> {
        self.teams.get(team).map(|l| l.game_points)
    }
}

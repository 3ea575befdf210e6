use crate::matches::{ArenaId, Match, MatchNumber, TeamId};
use serde::{Deserialize, Serialize};

/// Where a knockout team slot draws from before it can be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotSource {
    /// A named team
    Team(TeamId),
    /// The team at this league seed (1-based) once standings are final
    Seed(u32),
    /// The finisher at `position` (1-based) of knockout match `of`
    Rank { of: MatchNumber, position: u32 },
    /// An intentional bye
    Empty,
}

/// Blueprint of one knockout match before teams and times are bound
#[derive(Debug, Clone, PartialEq)]
pub struct BracketMatch {
    /// Pinned arena for plan-supplied matches; generated matches cycle the
    /// arena list
    pub arena: Option<ArenaId>,
    /// Explicit match number, if the plan supplies one
    pub num: Option<MatchNumber>,
    pub display_name: Option<String>,
    pub sources: Vec<SlotSource>,
}

/// One level of the bracket, in play order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnockoutRound {
    pub name: String,
    pub matches: Vec<Match>,
}

/// The evaluated knockout stage
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct KnockoutBracket {
    /// Rounds in play order; the last round holds the single final
    pub rounds: Vec<KnockoutRound>,
    /// Tiebreaker matches inserted by the scheduler, in creation order
    pub tiebreakers: Vec<Match>,
    /// Winner of the final, once it resolves
    pub champion: Option<TeamId>,
}

impl KnockoutBracket {
    pub fn final_match(&self) -> Option<&Match> {
        match self.rounds.last() {
            Some(round) if round.matches.len() == 1 => round.matches.first(),
            _ => None,
        }
    }

    /// Every knockout-phase match, including tiebreakers, in number order
    pub fn all_matches(&self) -> Vec<&Match> {
        let mut all: Vec<&Match> = self
            .rounds
            .iter()
            .flat_map(|r| r.matches.iter())
            .chain(self.tiebreakers.iter())
            .collect();
        all.sort_by_key(|m| m.num);
        all
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

/// Name for a whole round, counted back from the final
pub fn round_title(rounds_from_final: usize) -> String {
    match rounds_from_final {
        0 => "Final".to_string(),
        1 => "Semi-finals".to_string(),
        2 => "Quarter-finals".to_string(),
        r => format!("Round {r}"),
    }
}

/// Display name for one match within a round
pub fn match_display_name(rounds_from_final: usize, index: usize) -> String {
    match rounds_from_final {
        0 => "Final".to_string(),
        1 => format!("Semi {}", index + 1),
        2 => format!("Quarter {}", index + 1),
        r => format!("Round {r} match {}", index + 1),
    }
}

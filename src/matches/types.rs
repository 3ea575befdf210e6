use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque team identifier, unique within a competition (e.g. "SRZ2")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque arena identifier (e.g. "main")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArenaId(String);

impl ArenaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArenaId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Match numbers are unique per slot across all arenas
pub type MatchNumber = u32;

/// Which phase of the competition a match (or match period) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    League,
    Knockout,
    Tiebreaker,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::League => f.write_str("league"),
            MatchType::Knockout => f.write_str("knockout"),
            MatchType::Tiebreaker => f.write_str("tiebreaker"),
        }
    }
}

/// An arena as declared by the compstate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub id: ArenaId,
    pub display_name: String,
    pub colour: Option<String>,
}

/// A single scheduled game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub num: MatchNumber,
    pub arena: ArenaId,
    pub match_type: MatchType,
    pub display_name: String,
    /// Team slots in seeding order; `None` is an intentional bye, not an absence
    pub teams: Vec<Option<TeamId>>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    /// Whether internal ties must be broken before this match's outcome
    /// can feed later scheduling
    pub use_resolved_ranking: bool,
}

impl Match {
    /// Teams actually taking part, skipping byes
    pub fn participants(&self) -> impl Iterator<Item = &TeamId> {
        self.teams.iter().flatten()
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        self.participants().any(|t| t == team)
    }

    pub fn in_play_at(&self, now: DateTime<FixedOffset>) -> bool {
        self.start_time <= now && now < self.end_time
    }

    pub fn is_over_by(&self, now: DateTime<FixedOffset>) -> bool {
        self.end_time <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 4, 6, h, m, 0)
            .unwrap()
    }

    #[test]
    fn participants_skip_byes() {
        let m = Match {
            num: 3,
            arena: ArenaId::from("main"),
            match_type: MatchType::League,
            display_name: "Match 3".to_string(),
            teams: vec![Some(TeamId::from("AAA")), None, Some(TeamId::from("BBB")), None],
            start_time: ts(10, 0),
            end_time: ts(10, 5),
            use_resolved_ranking: false,
        };

        let teams: Vec<_> = m.participants().map(TeamId::as_str).collect();
        assert_eq!(teams, vec!["AAA", "BBB"]);
        assert!(m.involves(&TeamId::from("AAA")));
        assert!(!m.involves(&TeamId::from("CCC")));
    }

    #[test]
    fn in_play_window_is_half_open() {
        let m = Match {
            num: 0,
            arena: ArenaId::from("main"),
            match_type: MatchType::League,
            display_name: "Match 0".to_string(),
            teams: vec![],
            start_time: ts(10, 0),
            end_time: ts(10, 5),
            use_resolved_ranking: false,
        };

        assert!(!m.in_play_at(ts(9, 59)));
        assert!(m.in_play_at(ts(10, 0)));
        assert!(m.in_play_at(ts(10, 4)));
        assert!(!m.in_play_at(ts(10, 5)));
        assert!(m.is_over_by(ts(10, 5)));
    }
}

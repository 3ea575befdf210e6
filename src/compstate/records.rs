//! Serde mirror of the compstate file layout.
//!
//! These records match the on-disk YAML shapes exactly; the facade turns them
//! into model types and validates the cross-references between files.

use crate::awards::AwardKind;
use crate::matches::{ArenaId, MatchNumber, TeamId};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `arenas.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenasFile {
    pub arenas: BTreeMap<ArenaId, ArenaRecord>,
    pub teams_per_arena: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaRecord {
    pub display_name: String,
    #[serde(default)]
    pub colour: Option<String>,
}

/// `teams.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamsFile {
    pub teams: BTreeMap<TeamId, TeamRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    #[serde(default)]
    pub rookie: bool,
    #[serde(default)]
    pub dropped_out_after: Option<MatchNumber>,
}

/// `league.yaml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeagueFile {
    pub matches: BTreeMap<MatchNumber, BTreeMap<ArenaId, Vec<Option<TeamId>>>>,
}

/// `schedule.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleFile {
    pub match_slot_length_seconds: i64,
    pub match_period_gap_seconds: i64,
    pub match_periods: Vec<PeriodRecord>,
    #[serde(default)]
    pub delays: Vec<DelayRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub description: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    /// Defaults to `end_time` when absent
    #[serde(default)]
    pub max_end_time: Option<DateTime<FixedOffset>>,
    #[serde(rename = "type")]
    pub match_type: crate::matches::MatchType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayRecord {
    pub time: DateTime<FixedOffset>,
    /// Seconds
    pub delay: i64,
}

/// `knockout.yaml`; a missing file means a seeded knockout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnockoutFile {
    pub mode: KnockoutMode,
    #[serde(default)]
    pub rounds: Vec<Vec<StaticMatchRecord>>,
}

impl Default for KnockoutFile {
    fn default() -> Self {
        Self {
            mode: KnockoutMode::Seeded,
            rounds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnockoutMode {
    Static,
    Seeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticMatchRecord {
    pub arena: ArenaId,
    #[serde(default)]
    pub num: Option<MatchNumber>,
    #[serde(default)]
    pub display_name: Option<String>,
    pub teams: Vec<Option<SlotRefRecord>>,
}

/// A knockout team slot reference: a literal team id, `{ seed: N }`, or
/// `{ of: M, position: P }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotRefRecord {
    Team(TeamId),
    Seed { seed: u32 },
    Rank { of: MatchNumber, position: u32 },
}

/// `awards.yaml`: kind → team or list of teams
pub type AwardsFile = BTreeMap<AwardKind, OneOrMany>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(TeamId),
    Many(Vec<TeamId>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<TeamId> {
        match self {
            OneOrMany::One(team) => vec![team],
            OneOrMany::Many(teams) => teams,
        }
    }
}

/// One `league/` or `knockout/` score file, addressed by its directory entry
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub arena: ArenaId,
    pub num: MatchNumber,
    pub file: ScoreFile,
}

/// `league/<arena>/<num>.yaml` and `knockout/<arena>/<num>.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFile {
    pub scores: ScoresRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoresRecord {
    pub game: BTreeMap<TeamId, f64>,
    #[serde(default)]
    pub disqualified: Vec<TeamId>,
    /// `None` means every sheeted team turned up
    #[serde(default)]
    pub present: Option<Vec<TeamId>>,
}

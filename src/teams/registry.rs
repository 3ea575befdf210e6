use crate::matches::{MatchNumber, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A competing team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub rookie: bool,
    /// Last match number this team plays, if it withdrew mid-competition
    pub dropped_out_after: Option<MatchNumber>,
}

impl Team {
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rookie: false,
            dropped_out_after: None,
        }
    }

    /// Whether the team still takes part in match `num`
    pub fn is_active_for(&self, num: MatchNumber) -> bool {
        self.dropped_out_after.map_or(true, |last| num <= last)
    }
}

/// Registry of declared teams, iterated in `TeamId` order
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    teams: BTreeMap<TeamId, Team>,
}

impl TeamRegistry {
    pub fn new(teams: impl IntoIterator<Item = Team>) -> Self {
        Self {
            teams: teams.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    pub fn get(&self, id: &TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn contains(&self, id: &TeamId) -> bool {
        self.teams.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &TeamId> {
        self.teams.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn id_set(&self) -> BTreeSet<TeamId> {
        self.teams.keys().cloned().collect()
    }

    /// Teams that withdrew, with their last match number
    pub fn dropouts(&self) -> BTreeMap<TeamId, MatchNumber> {
        self.teams
            .values()
            .filter_map(|t| t.dropped_out_after.map(|last| (t.id.clone(), last)))
            .collect()
    }

    /// Teams eligible for knockout seeding: not dropped out and fielded in at
    /// least one league match
    pub fn seeding_eligible(&self, played: &BTreeSet<TeamId>) -> BTreeSet<TeamId> {
        self.teams
            .values()
            .filter(|t| t.dropped_out_after.is_none() && played.contains(&t.id))
            .map(|t| t.id.clone())
            .collect()
    }
}

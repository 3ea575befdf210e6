use super::records::{
    ArenasFile, AwardsFile, KnockoutFile, LeagueFile, ScheduleFile, ScoreEntry, TeamsFile,
};
use super::source::CompstateSource;
use crate::error::Result;
use std::collections::BTreeMap;

/// An in-memory compstate (for tests and embedding)
#[derive(Debug, Clone)]
pub struct InMemoryCompstate {
    pub arenas: ArenasFile,
    pub teams: TeamsFile,
    pub schedule: ScheduleFile,
    pub league: LeagueFile,
    pub knockout: KnockoutFile,
    pub awards: AwardsFile,
    pub league_scores: Vec<ScoreEntry>,
    pub knockout_scores: Vec<ScoreEntry>,
}

impl InMemoryCompstate {
    pub fn new(
        arenas: ArenasFile,
        teams: TeamsFile,
        schedule: ScheduleFile,
        league: LeagueFile,
    ) -> Self {
        Self {
            arenas,
            teams,
            schedule,
            league,
            knockout: KnockoutFile::default(),
            awards: BTreeMap::new(),
            league_scores: Vec::new(),
            knockout_scores: Vec::new(),
        }
    }
}

impl CompstateSource for InMemoryCompstate {
    fn arenas(&self) -> Result<ArenasFile> {
        Ok(self.arenas.clone())
    }

    fn teams(&self) -> Result<TeamsFile> {
        Ok(self.teams.clone())
    }

    fn schedule(&self) -> Result<ScheduleFile> {
        Ok(self.schedule.clone())
    }

    fn league(&self) -> Result<LeagueFile> {
        Ok(self.league.clone())
    }

    fn knockout(&self) -> Result<KnockoutFile> {
        Ok(self.knockout.clone())
    }

    fn awards(&self) -> Result<AwardsFile> {
        Ok(self.awards.clone())
    }

    fn league_scores(&self) -> Result<Vec<ScoreEntry>> {
        Ok(self.league_scores.clone())
    }

    fn knockout_scores(&self) -> Result<Vec<ScoreEntry>> {
        Ok(self.knockout_scores.clone())
    }
}

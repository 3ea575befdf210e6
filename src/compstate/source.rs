use super::records::{
    ArenasFile, AwardsFile, KnockoutFile, LeagueFile, ScheduleFile, ScoreEntry, TeamsFile,
};
use crate::error::Result;
use std::collections::BTreeMap;

/// The deserialiser seam: something that can produce the compstate's parsed
/// records.
///
/// Sources are synchronous and read-only; every call may be made multiple
/// times and must return the same data within one evaluation.
pub trait CompstateSource {
    fn arenas(&self) -> Result<ArenasFile>;

    fn teams(&self) -> Result<TeamsFile>;

    fn schedule(&self) -> Result<ScheduleFile>;

    fn league(&self) -> Result<LeagueFile>;

    /// Missing `knockout.yaml` means a seeded knockout with no plan
    fn knockout(&self) -> Result<KnockoutFile> {
        Ok(KnockoutFile::default())
    }

    fn awards(&self) -> Result<AwardsFile> {
        Ok(BTreeMap::new())
    }

    /// Scoresheets found under `league/`, in deterministic order
    fn league_scores(&self) -> Result<Vec<ScoreEntry>>;

    /// Scoresheets found under `knockout/`, in deterministic order
    fn knockout_scores(&self) -> Result<Vec<ScoreEntry>>;
}

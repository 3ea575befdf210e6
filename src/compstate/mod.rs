pub mod memory;
pub mod records;
pub mod source;
#[cfg(feature = "yaml")]
pub mod yaml;

pub use memory::InMemoryCompstate;
pub use records::{
    ArenaRecord, ArenasFile, AwardsFile, DelayRecord, KnockoutFile, KnockoutMode, LeagueFile,
    OneOrMany, PeriodRecord, ScheduleFile, ScoreEntry, ScoreFile, ScoresRecord, SlotRefRecord,
    StaticMatchRecord, TeamRecord, TeamsFile,
};
pub use source::CompstateSource;
#[cfg(feature = "yaml")]
pub use yaml::YamlCompstate;

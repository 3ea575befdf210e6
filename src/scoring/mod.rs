pub mod external;
pub mod league;
pub mod scorer;
pub mod scoresheet;
pub mod standings;

pub use external::SubprocessScorer;
pub use league::{points_for, points_schedule};
pub use scorer::{score_match, GamePointsScorer, Scorer};
pub use scoresheet::{RawScoresheet, ScoreReport, TeamScoreLine};
pub use standings::{Standing, Standings, TeamTally, TieBreak, TieBreakChain};

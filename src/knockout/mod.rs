pub mod bracket;
pub mod scheduler;
pub mod seeding;

pub use bracket::{
    match_display_name, round_title, BracketMatch, KnockoutBracket, KnockoutRound, SlotSource,
};
pub use scheduler::{KnockoutScheduler, ReportMap, SheetMap};
pub use seeding::{fold_seeds, BracketShape};

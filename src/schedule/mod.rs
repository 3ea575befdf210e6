pub mod binder;
pub mod clock;
pub mod period;

pub use binder::ScheduleBinder;
pub use clock::{MatchPeriodClock, Slots};
pub use period::{Delay, MatchPeriod, ScheduleConfig};

use crate::matches::MatchType;
use chrono::{DateTime, Duration, FixedOffset};

/// Slot geometry shared by every period of a competition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// How long a match occupies its arena
    pub slot_length: Duration,
    /// Dead time between consecutive slots
    pub inter_match_gap: Duration,
}

impl ScheduleConfig {
    pub fn new(slot_length: Duration, inter_match_gap: Duration) -> Self {
        Self {
            slot_length,
            inter_match_gap,
        }
    }

    pub fn from_seconds(slot_length: i64, inter_match_gap: i64) -> Self {
        Self {
            slot_length: Duration::seconds(slot_length),
            inter_match_gap: Duration::seconds(inter_match_gap),
        }
    }

    /// Distance between consecutive slot starts
    pub fn stride(&self) -> Duration {
        self.slot_length + self.inter_match_gap
    }
}

/// A contiguous window during which matches of one type may be scheduled.
///
/// `end` is the planned finish; `max_end` bounds how far delays may push
/// matches before the period gives up.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPeriod {
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub max_end: DateTime<FixedOffset>,
    pub match_type: MatchType,
}

impl MatchPeriod {
    pub fn new(
        description: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        max_end: DateTime<FixedOffset>,
        match_type: MatchType,
    ) -> Self {
        Self {
            description: description.into(),
            start,
            end,
            max_end,
            match_type,
        }
    }

    pub fn contains(&self, t: DateTime<FixedOffset>) -> bool {
        self.start <= t && t < self.max_end
    }
}

/// An announced hold-up: every match whose scheduled start is at or after
/// `time` shifts back by `duration`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delay {
    pub time: DateTime<FixedOffset>,
    pub duration: Duration,
}

impl Delay {
    pub fn new(time: DateTime<FixedOffset>, duration: Duration) -> Self {
        Self { time, duration }
    }
}

use super::period::{Delay, MatchPeriod, ScheduleConfig};
use crate::error::{CompError, Result};
use chrono::{DateTime, FixedOffset};

/// Walks one match period, yielding the start time of each slot it can host.
///
/// Delays are applied while moving the cursor, so a delay announced during an
/// already-emitted slot never shifts that slot, only the ones after it.
/// Delays before the period start belong to earlier periods and are ignored.
#[derive(Debug, Clone)]
pub struct MatchPeriodClock {
    period: MatchPeriod,
    delays: Vec<Delay>,
    config: ScheduleConfig,
    cursor: DateTime<FixedOffset>,
    next_delay: usize,
}

impl MatchPeriodClock {
    pub fn new(period: MatchPeriod, delays: &[Delay], config: ScheduleConfig) -> Self {
        let mut delays: Vec<Delay> = delays
            .iter()
            .filter(|d| d.time >= period.start)
            .cloned()
            .collect();
        delays.sort_by_key(|d| d.time);

        Self {
            cursor: period.start,
            period,
            delays,
            config,
            next_delay: 0,
        }
    }

    /// Move to the next slot and return its start time.
    ///
    /// Fails with `OutOfTime` once the next slot could not finish by the
    /// period's `max_end`.
    pub fn advance(&mut self) -> Result<DateTime<FixedOffset>> {
        while self.next_delay < self.delays.len()
            && self.delays[self.next_delay].time <= self.cursor
        {
            self.cursor += self.delays[self.next_delay].duration;
            self.next_delay += 1;
        }

        if self.cursor + self.config.slot_length > self.period.max_end {
            return Err(CompError::OutOfTime {
                period: self.period.description.clone(),
            });
        }

        let slot = self.cursor;
        self.cursor = slot + self.config.stride();
        Ok(slot)
    }

    /// The remaining slot starts, consuming the clock
    pub fn slots(self) -> Slots {
        Slots { clock: self }
    }

    /// The slot in progress at `now`, if any
    pub fn current_slot(&self, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        for slot in self.clone().slots() {
            if slot > now {
                return None;
            }
            if now < slot + self.config.slot_length {
                return Some(slot);
            }
        }
        None
    }
}

/// Iterator over the remaining slot starts of a clock
pub struct Slots {
    clock: MatchPeriodClock,
}

impl Iterator for Slots {
    type Item = DateTime<FixedOffset>;

    fn next(&mut self) -> Option<Self::Item> {
        self.clock.advance().ok()
    }
}

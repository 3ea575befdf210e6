use super::clock::MatchPeriodClock;
use super::period::{Delay, MatchPeriod, ScheduleConfig};
use crate::error::{CompError, Result};
use crate::matches::{Match, MatchPlan, MatchType};
use chrono::{DateTime, FixedOffset};

/// Stamps planned matches with wall-clock times.
///
/// League matches are arena-synchronised: every arena row of one match number
/// starts at the same slot. Knockout-phase matches are scheduled one per slot
/// by the knockout scheduler, which draws from `knockout_slots`.
#[derive(Debug, Clone)]
pub struct ScheduleBinder {
    config: ScheduleConfig,
    periods: Vec<MatchPeriod>,
    delays: Vec<Delay>,
}

impl ScheduleBinder {
    pub fn new(config: ScheduleConfig, periods: Vec<MatchPeriod>, delays: Vec<Delay>) -> Self {
        let mut delays = delays;
        delays.sort_by_key(|d| d.time);
        Self {
            config,
            periods,
            delays,
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn periods(&self) -> &[MatchPeriod] {
        &self.periods
    }

    pub fn delays(&self) -> &[Delay] {
        &self.delays
    }

    /// Bind the league plan to slots in the league periods.
    ///
    /// Match numbers are consumed in order; a number's arena rows all receive
    /// the slot's start time. A plan longer than the periods can host is an
    /// error rather than a silently truncated league.
    pub fn bind_league(&self, plan: &MatchPlan) -> Result<Vec<Match>> {
        let mut out = Vec::new();
        let mut nums = plan.nums().into_iter().peekable();

        for period in self
            .periods
            .iter()
            .filter(|p| p.match_type == MatchType::League)
        {
            let mut clock = MatchPeriodClock::new(period.clone(), &self.delays, self.config);
            while let Some(&num) = nums.peek() {
                let slot = match clock.advance() {
                    Ok(slot) => slot,
                    Err(_) => break,
                };
                for row in plan.rows(num) {
                    out.push(Match {
                        num,
                        arena: row.arena.clone(),
                        match_type: MatchType::League,
                        display_name: format!("Match {num}"),
                        teams: row.teams.clone(),
                        start_time: slot,
                        end_time: slot + self.config.slot_length,
                        use_resolved_ranking: false,
                    });
                }
                nums.next();
            }
        }

        let unscheduled = nums.count();
        if unscheduled > 0 {
            return Err(CompError::PlanExceedsPeriods {
                phase: MatchType::League,
                unscheduled,
            });
        }

        log::debug!("bound {} league matches", out.len());
        Ok(out)
    }

    /// Every slot the knockout periods can host, in order
    pub fn knockout_slots(&self) -> Vec<DateTime<FixedOffset>> {
        self.periods
            .iter()
            .filter(|p| p.match_type == MatchType::Knockout)
            .flat_map(|p| MatchPeriodClock::new(p.clone(), &self.delays, self.config).slots())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::{ArenaId, PlannedMatch, TeamId};
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeSet;

    fn ts(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 4, 6, h, m, 0)
            .unwrap()
    }

    fn config() -> ScheduleConfig {
        ScheduleConfig::from_seconds(300, 180)
    }

    fn plan(rows: Vec<PlannedMatch>) -> MatchPlan {
        let teams: BTreeSet<TeamId> = ["AAA", "BBB", "CCC", "DDD"]
            .iter()
            .map(|t| TeamId::from(*t))
            .collect();
        let arenas: BTreeSet<ArenaId> =
            ["main", "other"].iter().map(|a| ArenaId::from(*a)).collect();
        MatchPlan::new(rows, 2, &teams, &arenas).unwrap()
    }

    fn row(num: u32, arena: &str, a: &str, b: &str) -> PlannedMatch {
        PlannedMatch {
            num,
            arena: ArenaId::from(arena),
            teams: vec![Some(TeamId::from(a)), Some(TeamId::from(b))],
        }
    }

    #[test]
    fn arenas_share_the_slot_for_one_match_number() {
        let binder = ScheduleBinder::new(
            config(),
            vec![MatchPeriod::new(
                "morning",
                ts(10, 0),
                ts(11, 0),
                ts(11, 0),
                MatchType::League,
            )],
            vec![],
        );
        let plan = plan(vec![
            row(0, "main", "AAA", "BBB"),
            row(0, "other", "CCC", "DDD"),
            row(1, "main", "AAA", "CCC"),
        ]);

        let matches = binder.bind_league(&plan).unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].start_time, ts(10, 0));
        assert_eq!(matches[1].start_time, ts(10, 0));
        assert_eq!(matches[2].start_time, ts(10, 8));
        assert_eq!(matches[0].end_time, ts(10, 5));
        assert_eq!(matches[0].display_name, "Match 0");
    }

    #[test]
    fn league_continues_into_the_next_league_period() {
        let binder = ScheduleBinder::new(
            config(),
            vec![
                MatchPeriod::new(
                    "morning",
                    ts(10, 0),
                    ts(10, 10),
                    ts(10, 10),
                    MatchType::League,
                ),
                MatchPeriod::new(
                    "afternoon",
                    ts(13, 0),
                    ts(14, 0),
                    ts(14, 0),
                    MatchType::League,
                ),
            ],
            vec![],
        );
        let plan = plan(vec![
            row(0, "main", "AAA", "BBB"),
            row(1, "main", "CCC", "DDD"),
            row(2, "main", "AAA", "CCC"),
        ]);

        let matches = binder.bind_league(&plan).unwrap();
        // Only one slot fits in the morning period
        assert_eq!(matches[0].start_time, ts(10, 0));
        assert_eq!(matches[1].start_time, ts(13, 0));
        assert_eq!(matches[2].start_time, ts(13, 8));
    }

    #[test]
    fn overlong_plans_are_rejected() {
        let binder = ScheduleBinder::new(
            config(),
            vec![MatchPeriod::new(
                "short",
                ts(10, 0),
                ts(10, 10),
                ts(10, 10),
                MatchType::League,
            )],
            vec![],
        );
        let plan = plan(vec![
            row(0, "main", "AAA", "BBB"),
            row(1, "main", "CCC", "DDD"),
        ]);

        let err = binder.bind_league(&plan).unwrap_err();
        assert!(matches!(
            err,
            CompError::PlanExceedsPeriods {
                phase: MatchType::League,
                unscheduled: 1,
            }
        ));
    }

    #[test]
    fn knockout_slots_come_from_knockout_periods_only() {
        let binder = ScheduleBinder::new(
            config(),
            vec![
                MatchPeriod::new(
                    "league",
                    ts(10, 0),
                    ts(11, 0),
                    ts(11, 0),
                    MatchType::League,
                ),
                MatchPeriod::new(
                    "knockouts",
                    ts(14, 0),
                    ts(14, 30),
                    ts(14, 30),
                    MatchType::Knockout,
                ),
            ],
            vec![],
        );

        let slots = binder.knockout_slots();
        assert_eq!(slots, vec![ts(14, 0), ts(14, 8), ts(14, 16), ts(14, 24)]);
    }

    #[test]
    fn delays_only_shift_the_period_they_fall_in() {
        let binder = ScheduleBinder::new(
            config(),
            vec![
                MatchPeriod::new(
                    "morning",
                    ts(10, 0),
                    ts(10, 20),
                    ts(10, 20),
                    MatchType::League,
                ),
                MatchPeriod::new(
                    "afternoon",
                    ts(13, 0),
                    ts(13, 20),
                    ts(13, 20),
                    MatchType::League,
                ),
            ],
            vec![Delay::new(ts(13, 0), Duration::seconds(120))],
        );
        let plan = plan(vec![
            row(0, "main", "AAA", "BBB"),
            row(1, "main", "CCC", "DDD"),
            row(2, "main", "AAA", "CCC"),
        ]);

        let matches = binder.bind_league(&plan).unwrap();
        assert_eq!(matches[0].start_time, ts(10, 0));
        assert_eq!(matches[1].start_time, ts(10, 8));
        assert_eq!(matches[2].start_time, ts(13, 2));
    }
}

//! The competition facade.
//!
//! `Competition::load` pulls every record out of a compstate source, wires
//! the schedule, scoring, standings and knockout components together, and
//! freezes the result. All queries afterwards are pure functions of the
//! loaded state and a caller-supplied `now`.

use crate::awards::{self, AwardKind, Awards};
use crate::compstate::{CompstateSource, KnockoutMode, ScoreEntry, SlotRefRecord};
use crate::error::{CompError, Result};
use crate::knockout::{
    BracketMatch, KnockoutBracket, KnockoutRound, KnockoutScheduler, SheetMap, SlotSource,
};
use crate::matches::{Arena, ArenaId, Match, MatchNumber, MatchPlan, PlannedMatch, TeamId};
use crate::schedule::{Delay, MatchPeriod, ScheduleBinder, ScheduleConfig};
use crate::scoring::{
    league, score_match, RawScoresheet, ScoreReport, Scorer, Standing, Standings, TieBreakChain,
};
use crate::teams::{Team, TeamRegistry};
use chrono::{DateTime, Duration, FixedOffset};
use std::collections::{BTreeMap, BTreeSet};

/// Everything known about the competition at one instant
#[derive(Debug, Clone)]
pub struct CompetitionState {
    pub now: DateTime<FixedOffset>,
    /// Matches in play at `now`, by start time then number
    pub current_matches: Vec<Match>,
    /// Matches starting after `now`, soonest first
    pub upcoming_matches: Vec<Match>,
    /// Total delay announced up to `now`
    pub delayed_by: Duration,
    pub standings: Vec<Standing>,
    pub knockout_rounds: Vec<KnockoutRound>,
    /// Matches past their end time with no scoresheet yet
    pub missing_scores: Vec<(ArenaId, MatchNumber)>,
}

/// A fully evaluated competition
#[derive(Debug, Clone)]
pub struct Competition {
    arenas: Vec<Arena>,
    capacity: usize,
    teams: TeamRegistry,
    config: ScheduleConfig,
    periods: Vec<MatchPeriod>,
    delays: Vec<Delay>,
    matches: Vec<Match>,
    reports: BTreeMap<(ArenaId, MatchNumber), ScoreReport>,
    league_points: BTreeMap<MatchNumber, BTreeMap<TeamId, f64>>,
    standings: Standings,
    knockout: KnockoutBracket,
    awards: Awards,
}

impl Competition {
    /// Evaluate a compstate with the default tie-break chain
    pub fn load(source: &dyn CompstateSource, scorer: &dyn Scorer) -> Result<Self> {
        Self::load_with(source, scorer, &TieBreakChain::default())
    }

    /// Open a compstate directory on disk and evaluate it
    #[cfg(feature = "yaml")]
    pub fn load_dir(path: impl Into<std::path::PathBuf>, scorer: &dyn Scorer) -> Result<Self> {
        let source = crate::compstate::YamlCompstate::open(path)?;
        Self::load(&source, scorer)
    }

    /// Evaluate a compstate into a frozen, queryable competition
    pub fn load_with(
        source: &dyn CompstateSource,
        scorer: &dyn Scorer,
        chain: &TieBreakChain,
    ) -> Result<Self> {
        let arenas_file = source.arenas()?;
        if arenas_file.arenas.is_empty() {
            return Err(CompError::Schema {
                path: "arenas.yaml".to_string(),
                message: "at least one arena is required".to_string(),
            });
        }
        if arenas_file.teams_per_arena == 0 {
            return Err(CompError::Schema {
                path: "arenas.yaml".to_string(),
                message: "teams_per_arena must be positive".to_string(),
            });
        }
        let capacity = arenas_file.teams_per_arena;
        let arenas: Vec<Arena> = arenas_file
            .arenas
            .into_iter()
            .map(|(id, record)| Arena {
                id,
                display_name: record.display_name,
                colour: record.colour,
            })
            .collect();
        let arena_ids: BTreeSet<ArenaId> = arenas.iter().map(|a| a.id.clone()).collect();

        let teams_file = source.teams()?;
        let teams = TeamRegistry::new(teams_file.teams.into_iter().map(|(id, record)| Team {
            id,
            name: record.name,
            rookie: record.rookie,
            dropped_out_after: record.dropped_out_after,
        }));

        let schedule_file = source.schedule()?;
        if schedule_file.match_slot_length_seconds <= 0 {
            return Err(CompError::Schema {
                path: "schedule.yaml".to_string(),
                message: "match_slot_length_seconds must be positive".to_string(),
            });
        }
        if schedule_file.match_period_gap_seconds < 0 {
            return Err(CompError::Schema {
                path: "schedule.yaml".to_string(),
                message: "match_period_gap_seconds must not be negative".to_string(),
            });
        }
        let config = ScheduleConfig::from_seconds(
            schedule_file.match_slot_length_seconds,
            schedule_file.match_period_gap_seconds,
        );

        let mut periods = Vec::with_capacity(schedule_file.match_periods.len());
        for record in schedule_file.match_periods {
            let max_end = record.max_end_time.unwrap_or(record.end_time);
            if record.end_time < record.start_time || max_end < record.end_time {
                return Err(CompError::Schema {
                    path: "schedule.yaml".to_string(),
                    message: format!("period \"{}\" has disordered bounds", record.description),
                });
            }
            periods.push(MatchPeriod::new(
                record.description,
                record.start_time,
                record.end_time,
                max_end,
                record.match_type,
            ));
        }

        let mut delays = Vec::with_capacity(schedule_file.delays.len());
        for record in &schedule_file.delays {
            if record.delay < 0 {
                return Err(CompError::Schema {
                    path: "schedule.yaml".to_string(),
                    message: "delays must not be negative".to_string(),
                });
            }
            delays.push(Delay::new(record.time, Duration::seconds(record.delay)));
        }
        let binder = ScheduleBinder::new(config, periods.clone(), delays.clone());

        let league_file = source.league()?;
        let rows: Vec<PlannedMatch> = league_file
            .matches
            .into_iter()
            .flat_map(|(num, arenas)| {
                arenas
                    .into_iter()
                    .map(move |(arena, teams)| PlannedMatch { num, arena, teams })
            })
            .collect();
        let mut plan = MatchPlan::new(rows, capacity, &teams.id_set(), &arena_ids)?;
        plan.apply_dropouts(&teams.dropouts());

        let league_matches = binder.bind_league(&plan)?;
        let by_key: BTreeMap<(ArenaId, MatchNumber), &Match> = league_matches
            .iter()
            .map(|m| ((m.arena.clone(), m.num), m))
            .collect();
        let by_num: BTreeMap<MatchNumber, &Match> =
            league_matches.iter().map(|m| (m.num, m)).collect();

        let mut reports: BTreeMap<(ArenaId, MatchNumber), ScoreReport> = BTreeMap::new();
        let mut league_points: BTreeMap<MatchNumber, BTreeMap<TeamId, f64>> = BTreeMap::new();
        for entry in source.league_scores()? {
            let sheet = raw_sheet(&entry);
            let key = (entry.arena.clone(), entry.num);
            let m = match by_key.get(&key) {
                Some(m) => *m,
                None => match by_num.get(&entry.num) {
                    Some(other) => {
                        return Err(CompError::ScoresheetArenaMismatch {
                            num: entry.num,
                            reported: entry.arena,
                            actual: other.arena.clone(),
                        })
                    }
                    None => {
                        return Err(CompError::Schema {
                            path: format!("league/{}/{}.yaml", entry.arena, entry.num),
                            message: "no league match with this number".to_string(),
                        })
                    }
                },
            };
            let report = score_match(m, &sheet, scorer)?;
            league_points
                .entry(entry.num)
                .or_default()
                .extend(league::points_for(&report));
            if reports.insert(key, report).is_some() {
                return Err(CompError::Schema {
                    path: format!("league/{}/{}.yaml", entry.arena, entry.num),
                    message: "duplicate scoresheet".to_string(),
                });
            }
        }

        let finalised = league_matches
            .iter()
            .filter(|m| m.participants().next().is_some())
            .all(|m| reports.contains_key(&(m.arena.clone(), m.num)));
        let standings = Standings::build(
            teams.ids().cloned(),
            reports.values(),
            chain,
            finalised,
        );

        let eligible = teams.seeding_eligible(&plan.participating_teams());
        let mut knockout_sheets = SheetMap::new();
        for entry in source.knockout_scores()? {
            let key = (entry.arena.clone(), entry.num);
            if knockout_sheets.insert(key, raw_sheet(&entry)).is_some() {
                return Err(CompError::Schema {
                    path: format!("knockout/{}/{}.yaml", entry.arena, entry.num),
                    message: "duplicate scoresheet".to_string(),
                });
            }
        }

        let first_knockout_num = plan.max_num().map_or(0, |n| n + 1);
        let knockout_file = source.knockout()?;
        let scheduler = KnockoutScheduler::new(
            arenas.iter().map(|a| a.id.clone()).collect(),
            capacity,
            binder.knockout_slots(),
            config.slot_length,
            first_knockout_num,
            &standings,
            &eligible,
            &knockout_sheets,
            scorer,
        );
        let (knockout, knockout_reports) = match knockout_file.mode {
            KnockoutMode::Seeded => scheduler.build_seeded()?,
            KnockoutMode::Static => {
                let plan =
                    static_plan(knockout_file.rounds, capacity, &teams, &arena_ids)?;
                scheduler.build_static(plan)?
            }
        };
        reports.extend(knockout_reports);

        let mut declared: BTreeMap<AwardKind, Vec<TeamId>> = BTreeMap::new();
        for (kind, winners) in source.awards()? {
            let winners = winners.into_vec();
            for team in &winners {
                if !teams.contains(team) {
                    return Err(CompError::UnknownTeam(team.clone()));
                }
            }
            declared.insert(kind, winners);
        }
        let awards = awards::resolve(&standings, &knockout, declared)?;

        let mut matches = league_matches;
        matches.extend(knockout.all_matches().into_iter().cloned());
        matches.sort_by(|a, b| {
            (a.start_time, a.num, &a.arena).cmp(&(b.start_time, b.num, &b.arena))
        });
        log::debug!(
            "evaluated competition: {} matches, {} scored",
            matches.len(),
            reports.len()
        );

        Ok(Self {
            arenas,
            capacity,
            teams,
            config,
            periods,
            delays,
            matches,
            reports,
            league_points,
            standings,
            knockout,
            awards,
        })
    }

    pub fn arenas(&self) -> &[Arena] {
        &self.arenas
    }

    pub fn teams_per_arena(&self) -> usize {
        self.capacity
    }

    pub fn teams(&self) -> &TeamRegistry {
        &self.teams
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn periods(&self) -> &[MatchPeriod] {
        &self.periods
    }

    /// Every match, league and knockout phase alike, in schedule order
    pub fn schedule(&self) -> &[Match] {
        &self.matches
    }

    pub fn standings(&self) -> &Standings {
        &self.standings
    }

    pub fn position_of(&self, team: &TeamId) -> Option<u32> {
        self.standings.position_of(team)
    }

    pub fn knockout(&self) -> &KnockoutBracket {
        &self.knockout
    }

    pub fn awards(&self) -> &Awards {
        &self.awards
    }

    pub fn report(&self, arena: &ArenaId, num: MatchNumber) -> Option<&ScoreReport> {
        self.reports.get(&(arena.clone(), num))
    }

    /// Like [`Competition::report`], but a match without a sheet is an error
    pub fn require_report(&self, arena: &ArenaId, num: MatchNumber) -> Result<&ScoreReport> {
        self.report(arena, num).ok_or_else(|| CompError::MissingScore {
            arena: arena.clone(),
            num,
        })
    }

    /// League points awarded by one match, merged across its arenas
    pub fn league_points(&self, num: MatchNumber) -> Option<&BTreeMap<TeamId, f64>> {
        self.league_points.get(&num)
    }

    /// Matches in play at `t`
    pub fn matches_at(&self, t: DateTime<FixedOffset>) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.in_play_at(t)).collect()
    }

    /// The next slot strictly after `now`, with every match starting in it
    pub fn next_match_slot(
        &self,
        now: DateTime<FixedOffset>,
    ) -> Option<(DateTime<FixedOffset>, Vec<&Match>)> {
        let start = self
            .matches
            .iter()
            .map(|m| m.start_time)
            .filter(|s| *s > now)
            .min()?;
        let matches = self
            .matches
            .iter()
            .filter(|m| m.start_time == start)
            .collect();
        Some((start, matches))
    }

    /// Total delay announced up to `now`
    pub fn delayed_by(&self, now: DateTime<FixedOffset>) -> Duration {
        self.delays
            .iter()
            .filter(|d| d.time <= now)
            .fold(Duration::zero(), |acc, d| acc + d.duration)
    }

    /// Matches past their end time with no scoresheet: the degrade channel
    /// for missing scores
    pub fn missing_scores_at(&self, now: DateTime<FixedOffset>) -> Vec<(ArenaId, MatchNumber)> {
        self.matches
            .iter()
            .filter(|m| m.is_over_by(now))
            .filter(|m| m.participants().next().is_some())
            .filter(|m| !self.reports.contains_key(&(m.arena.clone(), m.num)))
            .map(|m| (m.arena.clone(), m.num))
            .collect()
    }

    /// Snapshot answering "what is happening now, and what happens next?"
    pub fn state_at(&self, now: DateTime<FixedOffset>) -> CompetitionState {
        let current_matches = self.matches_at(now).into_iter().cloned().collect();
        let upcoming_matches = self
            .matches
            .iter()
            .filter(|m| m.start_time > now)
            .cloned()
            .collect();

        CompetitionState {
            now,
            current_matches,
            upcoming_matches,
            delayed_by: self.delayed_by(now),
            standings: self.standings.standings().to_vec(),
            knockout_rounds: self.knockout.rounds.clone(),
            missing_scores: self.missing_scores_at(now),
        }
    }
}

fn raw_sheet(entry: &ScoreEntry) -> RawScoresheet {
    RawScoresheet {
        arena: entry.arena.clone(),
        num: entry.num,
        game: entry.file.scores.game.clone(),
        disqualified: entry.file.scores.disqualified.iter().cloned().collect(),
        present: entry
            .file
            .scores
            .present
            .as_ref()
            .map(|p| p.iter().cloned().collect()),
    }
}

/// Validate and convert a static knockout plan
fn static_plan(
    rounds: Vec<Vec<crate::compstate::StaticMatchRecord>>,
    capacity: usize,
    teams: &TeamRegistry,
    arenas: &BTreeSet<ArenaId>,
) -> Result<Vec<Vec<BracketMatch>>> {
    let mut plan = Vec::with_capacity(rounds.len());
    for round in rounds {
        let mut matches = Vec::with_capacity(round.len());
        for record in round {
            if !arenas.contains(&record.arena) {
                return Err(CompError::UnknownArena(record.arena));
            }
            if record.teams.len() != capacity {
                return Err(CompError::Schema {
                    path: "knockout.yaml".to_string(),
                    message: format!(
                        "a match in arena {} has {} team slots, expected {capacity}",
                        record.arena,
                        record.teams.len()
                    ),
                });
            }

            let mut sources = Vec::with_capacity(record.teams.len());
            for slot in record.teams {
                let source = match slot {
                    None => SlotSource::Empty,
                    Some(SlotRefRecord::Team(team)) => {
                        if !teams.contains(&team) {
                            return Err(CompError::UnknownTeam(team));
                        }
                        SlotSource::Team(team)
                    }
                    Some(SlotRefRecord::Seed { seed }) => {
                        if seed == 0 {
                            return Err(CompError::Schema {
                                path: "knockout.yaml".to_string(),
                                message: "seeds are numbered from 1".to_string(),
                            });
                        }
                        SlotSource::Seed(seed)
                    }
                    Some(SlotRefRecord::Rank { of, position }) => {
                        if position == 0 || position as usize > capacity {
                            return Err(CompError::Schema {
                                path: "knockout.yaml".to_string(),
                                message: format!(
                                    "rank position {position} is outside 1..={capacity}"
                                ),
                            });
                        }
                        SlotSource::Rank { of, position }
                    }
                };
                sources.push(source);
            }

            matches.push(BracketMatch {
                arena: Some(record.arena),
                num: record.num,
                display_name: record.display_name,
                sources,
            });
        }
        plan.push(matches);
    }
    Ok(plan)
}

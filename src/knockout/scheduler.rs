//! Building and progressing the knockout stage.
//!
//! Each evaluation reconstructs the whole stage from the league standings and
//! whatever knockout scoresheets exist. Matches are created in play order,
//! one clock slot each; a tiebreaker is inserted the moment a progression
//! step would otherwise be under-determined, taking the next slot ahead of
//! the round it unblocks. Re-running on the same compstate therefore yields
//! the same numbers, arenas and times.

use super::bracket::{
    match_display_name, round_title, BracketMatch, KnockoutBracket, KnockoutRound, SlotSource,
};
use super::seeding::{fold_seeds, BracketShape};
use crate::error::{CompError, Result};
use crate::matches::{
    rank_report, ArenaId, Match, MatchNumber, MatchType, TeamId, TopSelection,
};
use crate::scoring::{score_match, RawScoresheet, ScoreReport, Scorer, Standings};
use chrono::{DateTime, Duration, FixedOffset};
use std::collections::{BTreeMap, BTreeSet};

/// Scoresheets keyed the way the compstate stores them
pub type SheetMap = BTreeMap<(ArenaId, MatchNumber), RawScoresheet>;

/// Score reports produced while progressing the bracket
pub type ReportMap = BTreeMap<(ArenaId, MatchNumber), ScoreReport>;

pub struct KnockoutScheduler<'a> {
    arenas: Vec<ArenaId>,
    capacity: usize,
    slots: Vec<DateTime<FixedOffset>>,
    slot_length: Duration,
    next_slot: usize,
    first_num: MatchNumber,
    next_num: MatchNumber,
    standings: &'a Standings,
    eligible: &'a BTreeSet<TeamId>,
    sheets: &'a SheetMap,
    scorer: &'a dyn Scorer,
    matches: BTreeMap<MatchNumber, Match>,
    reports: ReportMap,
    tiebreaker_index: BTreeMap<(Option<MatchNumber>, Vec<TeamId>), MatchNumber>,
    tiebreakers: Vec<MatchNumber>,
}

impl<'a> KnockoutScheduler<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        arenas: Vec<ArenaId>,
        capacity: usize,
        slots: Vec<DateTime<FixedOffset>>,
        slot_length: Duration,
        first_num: MatchNumber,
        standings: &'a Standings,
        eligible: &'a BTreeSet<TeamId>,
        sheets: &'a SheetMap,
        scorer: &'a dyn Scorer,
    ) -> Self {
        Self {
            arenas,
            capacity,
            slots,
            slot_length,
            next_slot: 0,
            first_num,
            next_num: first_num,
            standings,
            eligible,
            sheets,
            scorer,
            matches: BTreeMap::new(),
            reports: ReportMap::new(),
            tiebreaker_index: BTreeMap::new(),
            tiebreakers: Vec::new(),
        }
    }

    /// Generate a bracket seeded from league standings.
    ///
    /// The shape exists from the first evaluation; team slots fill in as the
    /// league finishes and earlier rounds resolve.
    pub fn build_seeded(mut self) -> Result<(KnockoutBracket, ReportMap)> {
        // No knockout window scheduled means no knockout stage
        if self.slots.is_empty() {
            return self.finish(Vec::new(), 0);
        }

        let shape = BracketShape::for_teams(self.eligible.len().max(1), self.capacity);
        let seats = shape.seats();
        let total_rounds = shape.rounds();
        let seeds = self.resolve_seeds(seats)?;

        let folded = fold_seeds((1..=seats as u32).collect::<Vec<_>>(), self.capacity);
        let mut round_nums: Vec<Vec<MatchNumber>> = Vec::new();

        let mut first = Vec::new();
        for (i, line_up) in folded.iter().enumerate() {
            let teams: Vec<Option<TeamId>> = line_up
                .iter()
                .map(|seed| {
                    seeds
                        .as_ref()
                        .and_then(|s| s.get(*seed as usize - 1).cloned())
                })
                .collect();
            let name = match_display_name(total_rounds - 1, i);
            first.push(self.push_generated(teams, name)?);
        }
        round_nums.push(first);

        for r in 1..total_rounds {
            let prev = round_nums[r - 1].clone();
            let mut this = Vec::new();
            for (i, pair) in prev.chunks(2).enumerate() {
                let mut teams = Vec::with_capacity(self.capacity);
                for &pred in pair {
                    teams.extend(self.advancers(pred, 2)?);
                }
                let name = match_display_name(total_rounds - 1 - r, i);
                this.push(self.push_generated(teams, name)?);
            }
            round_nums.push(this);
        }

        self.finish(round_nums, total_rounds)
    }

    /// Bind a plan-supplied bracket, resolving seed and rank references
    pub fn build_static(
        mut self,
        plan: Vec<Vec<BracketMatch>>,
    ) -> Result<(KnockoutBracket, ReportMap)> {
        if plan.is_empty() {
            return Ok((KnockoutBracket::default(), self.reports));
        }
        match plan.last() {
            Some(last) if last.len() == 1 => {}
            _ => {
                return Err(CompError::Schema {
                    path: "knockout.yaml".to_string(),
                    message: "the last knockout round must contain exactly one match".to_string(),
                })
            }
        }

        // Predecessors feeding a rank reference must resolve their internal ties
        let referenced: BTreeSet<MatchNumber> = plan
            .iter()
            .flatten()
            .flat_map(|m| m.sources.iter())
            .filter_map(|s| match s {
                SlotSource::Rank { of, .. } => Some(*of),
                _ => None,
            })
            .collect();

        let total_rounds = plan.len();
        let mut round_nums = Vec::new();
        for (r, round) in plan.into_iter().enumerate() {
            let mut nums = Vec::new();
            let is_final_round = r + 1 == total_rounds;
            for (i, planned) in round.into_iter().enumerate() {
                let mut teams = Vec::with_capacity(planned.sources.len());
                for source in &planned.sources {
                    teams.push(self.resolve_source(source)?);
                }
                let name = planned
                    .display_name
                    .unwrap_or_else(|| match_display_name(total_rounds - 1 - r, i));
                let num = self.push_match(
                    teams,
                    name,
                    MatchType::Knockout,
                    is_final_round,
                    planned.arena,
                    planned.num,
                )?;
                nums.push(num);
            }
            for &num in &nums {
                if referenced.contains(&num) {
                    if let Some(m) = self.matches.get_mut(&num) {
                        m.use_resolved_ranking = true;
                    }
                }
            }
            round_nums.push(nums);
        }

        self.finish(round_nums, total_rounds)
    }

    fn finish(
        mut self,
        round_nums: Vec<Vec<MatchNumber>>,
        total_rounds: usize,
    ) -> Result<(KnockoutBracket, ReportMap)> {
        let champion = match round_nums.last().map(Vec::as_slice) {
            Some(&[final_num]) => self.advancers(final_num, 1)?.swap_remove(0),
            _ => None,
        };

        // Score every remaining sheet so reports are complete, and reject
        // sheets that name no knockout match
        for ((arena, num), sheet) in self.sheets {
            if self.reports.contains_key(&(arena.clone(), *num)) {
                continue;
            }
            match self.matches.get(num) {
                Some(m) if m.arena == *arena => {
                    let report = score_match(m, sheet, self.scorer)?;
                    self.reports.insert((arena.clone(), *num), report);
                }
                Some(m) => {
                    return Err(CompError::ScoresheetArenaMismatch {
                        num: *num,
                        reported: arena.clone(),
                        actual: m.arena.clone(),
                    })
                }
                None => {
                    return Err(CompError::Schema {
                        path: format!("knockout/{arena}/{num}.yaml"),
                        message: "no knockout match with this number".to_string(),
                    })
                }
            }
        }

        let rounds = round_nums
            .iter()
            .enumerate()
            .map(|(r, nums)| KnockoutRound {
                name: round_title(total_rounds - 1 - r),
                matches: nums.iter().map(|n| self.matches[n].clone()).collect(),
            })
            .collect();
        let tiebreakers = self
            .tiebreakers
            .iter()
            .map(|n| self.matches[n].clone())
            .collect();

        Ok((
            KnockoutBracket {
                rounds,
                tiebreakers,
                champion,
            },
            self.reports,
        ))
    }

    /// Top seeds among eligible teams, inserting a seeding tiebreaker when
    /// the cut falls inside a rung the tie-break chain could not split.
    /// `None` while the league or a pending tiebreaker leaves them unknown.
    fn resolve_seeds(&mut self, k: usize) -> Result<Option<Vec<TeamId>>> {
        if !self.standings.is_finalised() {
            return Ok(None);
        }
        let mut settled: Vec<TeamId> = Vec::new();
        let mut seats = k;
        for rung in self.standings.standings() {
            if seats == 0 {
                break;
            }
            let teams: Vec<TeamId> = rung
                .teams
                .iter()
                .filter(|t| self.eligible.contains(*t))
                .cloned()
                .collect();
            if teams.is_empty() {
                continue;
            }
            if teams.len() <= seats {
                seats -= teams.len();
                settled.extend(teams);
            } else {
                match self.break_tie(None, teams, seats)? {
                    Some(order) => settled.extend(order),
                    None => return Ok(None),
                }
                break;
            }
        }
        Ok(Some(settled))
    }

    fn resolve_source(&mut self, source: &SlotSource) -> Result<Option<TeamId>> {
        match source {
            SlotSource::Empty => Ok(None),
            SlotSource::Team(team) => Ok(Some(team.clone())),
            SlotSource::Seed(seed) => {
                let Some(seeds) = self.resolve_seeds(*seed as usize)? else {
                    return Ok(None);
                };
                match seeds.get(*seed as usize - 1) {
                    Some(team) => Ok(Some(team.clone())),
                    None => Err(CompError::UnknownSeed(*seed)),
                }
            }
            SlotSource::Rank { of, position } => {
                let order = self.advancers(*of, *position as usize)?;
                Ok(order.get(*position as usize - 1).cloned().flatten())
            }
        }
    }

    /// The teams taking the top `seats` of a knockout match, in seat order.
    ///
    /// Every seat is reported: `None` marks a seat that is still pending (the
    /// match or a tiebreaker it spawned is unscored) or that the field could
    /// not fill. A tie crossing the cut either falls back to league positions
    /// or, when the match requires resolved ranking, spawns a tiebreaker.
    /// Seats settled above the tie stay filled either way.
    fn advancers(&mut self, pred: MatchNumber, seats: usize) -> Result<Vec<Option<TeamId>>> {
        let m = match self.matches.get(&pred) {
            Some(m) => m.clone(),
            None => {
                return Err(CompError::Schema {
                    path: "knockout.yaml".to_string(),
                    message: format!("match {pred} is not part of the knockout stage"),
                })
            }
        };
        let Some(report) = self.report_for(&m)? else {
            return Ok(vec![None; seats]);
        };

        let mut out: Vec<Option<TeamId>> = match rank_report(&report).take_top(seats) {
            TopSelection::Resolved(order) => order.into_iter().map(Some).collect(),
            TopSelection::Contested {
                settled,
                contested,
                seats: open,
            } => {
                let mut out: Vec<Option<TeamId>> = settled.into_iter().map(Some).collect();
                if m.use_resolved_ranking {
                    if let Some(order) = self.break_tie(Some(pred), contested, open)? {
                        out.extend(order.into_iter().map(Some));
                    }
                } else {
                    let order = self.order_by_league_position(contested, open)?;
                    out.extend(order.into_iter().map(Some));
                }
                out
            }
        };
        out.resize(seats, None);
        Ok(out)
    }

    /// Split a tie by inserting (or consulting) a tiebreaker match between
    /// exactly the tied teams. `None` while the tiebreaker is unscored.
    fn break_tie(
        &mut self,
        pred: Option<MatchNumber>,
        tied: Vec<TeamId>,
        seats: usize,
    ) -> Result<Option<Vec<TeamId>>> {
        let key = (pred, tied.clone());
        let tb_num = match self.tiebreaker_index.get(&key) {
            Some(&num) => num,
            None => {
                let teams = tied.iter().cloned().map(Some).collect();
                let num =
                    self.push_match(teams, String::new(), MatchType::Tiebreaker, true, None, None)?;
                if let Some(m) = self.matches.get_mut(&num) {
                    m.display_name = format!("Tiebreaker {num}");
                }
                self.tiebreaker_index.insert(key, num);
                self.tiebreakers.push(num);
                log::debug!("inserted tiebreaker match {num} between {tied:?}");
                num
            }
        };

        let m = self.matches[&tb_num].clone();
        let Some(report) = self.report_for(&m)? else {
            return Ok(None);
        };
        match rank_report(&report).take_top(seats) {
            TopSelection::Resolved(order) => Ok(Some(order)),
            TopSelection::Contested {
                settled,
                contested,
                seats: open,
            } => Ok(self
                .break_tie(Some(tb_num), contested, open)?
                .map(|order| settled.into_iter().chain(order).collect())),
        }
    }

    /// League positions as the residual tie order; positions must differ
    fn order_by_league_position(&self, teams: Vec<TeamId>, seats: usize) -> Result<Vec<TeamId>> {
        let mut ranked: Vec<(u32, TeamId)> = teams
            .iter()
            .map(|t| {
                (
                    self.standings.position_of(t).unwrap_or(u32::MAX),
                    t.clone(),
                )
            })
            .collect();
        ranked.sort();
        for pair in ranked.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(CompError::TieUnresolved(teams));
            }
        }
        Ok(ranked.into_iter().take(seats).map(|(_, t)| t).collect())
    }

    fn report_for(&mut self, m: &Match) -> Result<Option<ScoreReport>> {
        let key = (m.arena.clone(), m.num);
        if let Some(report) = self.reports.get(&key) {
            return Ok(Some(report.clone()));
        }
        let Some(sheet) = self.sheets.get(&key) else {
            return Ok(None);
        };
        let report = score_match(m, sheet, self.scorer)?;
        self.reports.insert(key, report.clone());
        Ok(Some(report))
    }

    fn push_generated(&mut self, teams: Vec<Option<TeamId>>, name: String) -> Result<MatchNumber> {
        self.push_match(teams, name, MatchType::Knockout, true, None, None)
    }

    /// Create a knockout-phase match in the next slot; generated matches
    /// cycle the arena list
    fn push_match(
        &mut self,
        teams: Vec<Option<TeamId>>,
        display_name: String,
        match_type: MatchType,
        use_resolved_ranking: bool,
        arena: Option<ArenaId>,
        num: Option<MatchNumber>,
    ) -> Result<MatchNumber> {
        let slot_index = self.next_slot;
        let Some(&start) = self.slots.get(slot_index) else {
            return Err(CompError::PlanExceedsPeriods {
                phase: match_type,
                unscheduled: 1,
            });
        };
        self.next_slot += 1;

        let arena =
            arena.unwrap_or_else(|| self.arenas[slot_index % self.arenas.len()].clone());
        let num = num.unwrap_or(self.next_num);
        if num < self.first_num || self.matches.contains_key(&num) {
            return Err(CompError::DuplicateMatch { arena, num });
        }
        self.next_num = self.next_num.max(num + 1);

        self.matches.insert(
            num,
            Match {
                num,
                arena,
                match_type,
                display_name,
                teams,
                start_time: start,
                end_time: start + self.slot_length,
                use_resolved_ranking,
            },
        );
        Ok(num)
    }
}

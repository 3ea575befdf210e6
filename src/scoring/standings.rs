//! The cumulative league table.
//!
//! Teams are ordered by league points, then by a configurable chain of
//! tie-break criteria applied greedily. Teams the chain cannot separate share
//! a position; the next position skips by the width of the tie ("1, 2, 2, 4").
//! Alphabetical team order is the presentation fallback only and never feeds
//! bracket seeding.

use super::league;
use super::scoresheet::ScoreReport;
use crate::matches::{rank_report, TeamId, TopSelection};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Cumulative record of one team across its scored league matches
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TeamTally {
    pub league_points: f64,
    pub game_points: f64,
    pub wins: u32,
    pub last_places: u32,
    pub played: u32,
}

/// A rung of the league table; tied teams share the position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub position: u32,
    /// Alphabetical within the rung
    pub teams: Vec<TeamId>,
    pub points: f64,
}

/// One criterion applied after league points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    FewestLastPlaces,
    MostOutrightWins,
    HighestGamePoints,
}

/// Ordered tie-break criteria, applied greedily after league points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieBreakChain {
    criteria: Vec<TieBreak>,
}

impl TieBreakChain {
    pub fn new(criteria: Vec<TieBreak>) -> Self {
        Self { criteria }
    }

    /// Comparison key for a tally; greater is better in every component
    fn key(&self, tally: &TeamTally) -> Vec<f64> {
        std::iter::once(tally.league_points)
            .chain(self.criteria.iter().map(|c| match c {
                TieBreak::FewestLastPlaces => -f64::from(tally.last_places),
                TieBreak::MostOutrightWins => f64::from(tally.wins),
                TieBreak::HighestGamePoints => tally.game_points,
            }))
            .collect()
    }
}

impl Default for TieBreakChain {
    fn default() -> Self {
        Self::new(vec![
            TieBreak::FewestLastPlaces,
            TieBreak::MostOutrightWins,
            TieBreak::HighestGamePoints,
        ])
    }
}

fn cmp_keys(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.partial_cmp(y).unwrap_or(Ordering::Equal) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// The evaluated league table
#[derive(Debug, Clone, Serialize)]
pub struct Standings {
    standings: Vec<Standing>,
    positions: BTreeMap<TeamId, u32>,
    tallies: BTreeMap<TeamId, TeamTally>,
    finalised: bool,
}

impl Standings {
    /// Accumulate scored league matches into a table covering `teams`.
    ///
    /// `finalised` records whether every league match has been scored, which
    /// gates knockout seeding.
    pub fn build<'a>(
        teams: impl IntoIterator<Item = TeamId>,
        reports: impl IntoIterator<Item = &'a ScoreReport>,
        chain: &TieBreakChain,
        finalised: bool,
    ) -> Self {
        let mut tallies: BTreeMap<TeamId, TeamTally> =
            teams.into_iter().map(|t| (t, TeamTally::default())).collect();

        for report in reports {
            let points = league::points_for(report);
            let ranking = rank_report(report);

            for (team, pts) in &points {
                let tally = tallies.entry(team.clone()).or_default();
                tally.league_points += pts;
                tally.played += 1;
                if let Some(line) = report.line(team) {
                    tally.game_points += line.game_points;
                }
            }

            let winners = ranking.winners();
            if winners.len() == 1 {
                tallies.entry(winners[0].clone()).or_default().wins += 1;
            }
            // Solo and fully-tied matches count no last places
            if ranking.groups.len() > 1 {
                if let Some(last) = ranking.groups.last() {
                    for team in &last.teams {
                        tallies.entry(team.clone()).or_default().last_places += 1;
                    }
                }
            }
        }

        let mut ordered: Vec<(TeamId, Vec<f64>)> = tallies
            .iter()
            .map(|(team, tally)| (team.clone(), chain.key(tally)))
            .collect();
        ordered.sort_by(|(ta, ka), (tb, kb)| cmp_keys(kb, ka).then_with(|| ta.cmp(tb)));

        let mut standings = Vec::new();
        let mut positions = BTreeMap::new();
        let mut i = 0;
        while i < ordered.len() {
            let mut j = i + 1;
            while j < ordered.len() && cmp_keys(&ordered[j].1, &ordered[i].1) == Ordering::Equal {
                j += 1;
            }
            let position = (i + 1) as u32;
            let rung: Vec<TeamId> = ordered[i..j].iter().map(|(t, _)| t.clone()).collect();
            for team in &rung {
                positions.insert(team.clone(), position);
            }
            standings.push(Standing {
                position,
                teams: rung,
                points: tallies[&ordered[i].0].league_points,
            });
            i = j;
        }

        Self {
            standings,
            positions,
            tallies,
            finalised,
        }
    }

    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn position_of(&self, team: &TeamId) -> Option<u32> {
        self.positions.get(team).copied()
    }

    pub fn points_of(&self, team: &TeamId) -> Option<f64> {
        self.tallies.get(team).map(|t| t.league_points)
    }

    pub fn tally(&self, team: &TeamId) -> Option<&TeamTally> {
        self.tallies.get(team)
    }

    /// Whether every league match has been scored
    pub fn is_finalised(&self) -> bool {
        self.finalised
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Presentation order: rungs in table order, alphabetical within a rung
    pub fn ordered_teams(&self) -> Vec<TeamId> {
        self.standings
            .iter()
            .flat_map(|s| s.teams.iter().cloned())
            .collect()
    }

    /// Select the top `k` teams for seeding.
    ///
    /// `Contested` marks a rung the tie-break chain could not split straddling
    /// the cut, which is the trigger for a seeding tiebreaker match.
    pub fn top_k(&self, k: usize) -> TopSelection {
        let mut settled = Vec::new();
        let mut seats = k;
        for rung in &self.standings {
            if seats == 0 {
                break;
            }
            if rung.teams.len() <= seats {
                seats -= rung.teams.len();
                settled.extend(rung.teams.iter().cloned());
            } else {
                return TopSelection::Contested {
                    settled,
                    contested: rung.teams.clone(),
                    seats,
                };
            }
        }
        TopSelection::Resolved(settled)
    }
}

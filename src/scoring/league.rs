//! Normalising raw game scores into league points.
//!
//! Teams are ranked within their match and paid from a fixed schedule keyed
//! by participant count. Tied teams share the average of the points their
//! positions span; disqualified and absent teams rank last and receive
//! nothing, and the points their positions would have paid are withheld.

use super::scoresheet::ScoreReport;
use crate::matches::{rank_report, TeamId};
use std::collections::BTreeMap;

/// The fixed points schedule for a match of `n` participants: `n` points for
/// first, down to 1 for last
pub fn points_schedule(n: usize) -> Vec<f64> {
    (1..=n).rev().map(|p| p as f64).collect()
}

/// League points awarded by one scored match
pub fn points_for(report: &ScoreReport) -> BTreeMap<TeamId, f64> {
    let ranking = rank_report(report);
    let schedule = points_schedule(report.teams.len());

    let mut points = BTreeMap::new();
    for group in &ranking.groups {
        if group.excluded {
            for team in &group.teams {
                points.insert(team.clone(), 0.0);
            }
            continue;
        }

        let first = (group.position - 1) as usize;
        let span = &schedule[first..first + group.teams.len()];
        let share = span.iter().sum::<f64>() / span.len() as f64;
        for team in &group.teams {
            points.insert(team.clone(), share);
        }
    }

    points
}

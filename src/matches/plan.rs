use super::types::{ArenaId, MatchNumber, TeamId};
use crate::error::{CompError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// One arena row of the league plan: who meets, before any time is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMatch {
    pub num: MatchNumber,
    pub arena: ArenaId,
    pub teams: Vec<Option<TeamId>>,
}

/// The validated league plan, grouped by match number
#[derive(Debug, Clone, Default)]
pub struct MatchPlan {
    matches: BTreeMap<MatchNumber, Vec<PlannedMatch>>,
}

impl MatchPlan {
    /// Build a plan from parsed rows, rejecting inconsistent input.
    ///
    /// Every row must have exactly `capacity` slots, `(num, arena)` must be
    /// unique, every referenced team and arena must be declared, a team may
    /// only appear once per match number, and match numbers must be
    /// contiguous from 0.
    pub fn new(
        rows: Vec<PlannedMatch>,
        capacity: usize,
        known_teams: &BTreeSet<TeamId>,
        known_arenas: &BTreeSet<ArenaId>,
    ) -> Result<Self> {
        let mut matches: BTreeMap<MatchNumber, Vec<PlannedMatch>> = BTreeMap::new();

        for row in rows {
            if row.teams.len() != capacity {
                return Err(CompError::CapacityMismatch {
                    arena: row.arena,
                    num: row.num,
                    got: row.teams.len(),
                    expected: capacity,
                });
            }
            if !known_arenas.contains(&row.arena) {
                return Err(CompError::UnknownArena(row.arena));
            }
            for team in row.teams.iter().flatten() {
                if !known_teams.contains(team) {
                    return Err(CompError::UnknownTeam(team.clone()));
                }
            }

            let group = matches.entry(row.num).or_default();
            if group.iter().any(|m| m.arena == row.arena) {
                return Err(CompError::DuplicateMatch {
                    arena: row.arena,
                    num: row.num,
                });
            }
            group.push(row);
        }

        for (num, group) in &matches {
            let mut seen = BTreeSet::new();
            for team in group.iter().flat_map(|m| m.teams.iter().flatten()) {
                if !seen.insert(team) {
                    return Err(CompError::Schema {
                        path: "league.yaml".to_string(),
                        message: format!("team {team} appears twice in match {num}"),
                    });
                }
            }
        }

        for (expected, num) in matches.keys().enumerate() {
            if *num != expected as MatchNumber {
                return Err(CompError::Schema {
                    path: "league.yaml".to_string(),
                    message: format!("match numbers are not contiguous: expected {expected}, found {num}"),
                });
            }
        }

        Ok(Self { matches })
    }

    /// Blank out slots of teams for every match past their drop-out point
    pub fn apply_dropouts(&mut self, dropped: &BTreeMap<TeamId, MatchNumber>) {
        for (num, group) in self.matches.iter_mut() {
            for row in group.iter_mut() {
                for slot in row.teams.iter_mut() {
                    if let Some(team) = slot {
                        if dropped.get(team).is_some_and(|last| num > last) {
                            *slot = None;
                        }
                    }
                }
            }
        }
    }

    /// Match numbers in emission order
    pub fn nums(&self) -> Vec<MatchNumber> {
        self.matches.keys().copied().collect()
    }

    /// Arena rows for one match number
    pub fn rows(&self, num: MatchNumber) -> &[PlannedMatch] {
        self.matches.get(&num).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct match slots the plan needs
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn max_num(&self) -> Option<MatchNumber> {
        self.matches.keys().next_back().copied()
    }

    /// Every team fielded at least once, after drop-out blanking
    pub fn participating_teams(&self) -> BTreeSet<TeamId> {
        self.matches
            .values()
            .flatten()
            .flat_map(|row| row.teams.iter().flatten().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(num: MatchNumber, arena: &str, teams: &[Option<&str>]) -> PlannedMatch {
        PlannedMatch {
            num,
            arena: ArenaId::from(arena),
            teams: teams.iter().map(|t| t.map(TeamId::from)).collect(),
        }
    }

    fn known() -> (BTreeSet<TeamId>, BTreeSet<ArenaId>) {
        let teams = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF", "GGG", "HHH"]
            .iter()
            .map(|t| TeamId::from(*t))
            .collect();
        let arenas = ["main", "other"].iter().map(|a| ArenaId::from(*a)).collect();
        (teams, arenas)
    }

    #[test]
    fn accepts_a_two_arena_plan() {
        let (teams, arenas) = known();
        let plan = MatchPlan::new(
            vec![
                row(0, "main", &[Some("AAA"), Some("BBB"), Some("CCC"), Some("DDD")]),
                row(0, "other", &[Some("EEE"), Some("FFF"), Some("GGG"), Some("HHH")]),
                row(1, "main", &[Some("AAA"), Some("CCC"), Some("EEE"), Some("GGG")]),
            ],
            4,
            &teams,
            &arenas,
        )
        .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.rows(0).len(), 2);
        assert_eq!(plan.rows(1).len(), 1);
        assert_eq!(plan.max_num(), Some(1));
    }

    #[test]
    fn rejects_duplicate_arena_rows() {
        let (teams, arenas) = known();
        let err = MatchPlan::new(
            vec![
                row(0, "main", &[Some("AAA"), Some("BBB"), None, None]),
                row(0, "main", &[Some("CCC"), Some("DDD"), None, None]),
            ],
            4,
            &teams,
            &arenas,
        )
        .unwrap_err();

        assert!(matches!(err, CompError::DuplicateMatch { num: 0, .. }));
    }

    #[test]
    fn rejects_capacity_mismatch() {
        let (teams, arenas) = known();
        let err = MatchPlan::new(
            vec![row(0, "main", &[Some("AAA"), Some("BBB")])],
            4,
            &teams,
            &arenas,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            CompError::CapacityMismatch {
                got: 2,
                expected: 4,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_references() {
        let (teams, arenas) = known();
        let err = MatchPlan::new(
            vec![row(0, "main", &[Some("ZZZ"), None, None, None])],
            4,
            &teams,
            &arenas,
        )
        .unwrap_err();
        assert!(matches!(err, CompError::UnknownTeam(_)));

        let err = MatchPlan::new(
            vec![row(0, "pit", &[Some("AAA"), None, None, None])],
            4,
            &teams,
            &arenas,
        )
        .unwrap_err();
        assert!(matches!(err, CompError::UnknownArena(_)));
    }

    #[test]
    fn rejects_gaps_in_numbering() {
        let (teams, arenas) = known();
        let err = MatchPlan::new(
            vec![
                row(0, "main", &[Some("AAA"), None, None, None]),
                row(2, "main", &[Some("BBB"), None, None, None]),
            ],
            4,
            &teams,
            &arenas,
        )
        .unwrap_err();

        assert!(matches!(err, CompError::Schema { .. }));
    }

    #[test]
    fn rejects_a_team_in_two_arenas_at_once() {
        let (teams, arenas) = known();
        let err = MatchPlan::new(
            vec![
                row(0, "main", &[Some("AAA"), Some("BBB"), None, None]),
                row(0, "other", &[Some("AAA"), Some("CCC"), None, None]),
            ],
            4,
            &teams,
            &arenas,
        )
        .unwrap_err();

        assert!(matches!(err, CompError::Schema { .. }));
    }

    #[test]
    fn dropouts_blank_later_matches_only() {
        let (teams, arenas) = known();
        let mut plan = MatchPlan::new(
            vec![
                row(0, "main", &[Some("AAA"), Some("BBB"), None, None]),
                row(1, "main", &[Some("AAA"), Some("CCC"), None, None]),
                row(2, "main", &[Some("AAA"), Some("DDD"), None, None]),
            ],
            4,
            &teams,
            &arenas,
        )
        .unwrap();

        let dropped = [(TeamId::from("AAA"), 1)].into_iter().collect();
        plan.apply_dropouts(&dropped);

        assert_eq!(plan.rows(0)[0].teams[0], Some(TeamId::from("AAA")));
        assert_eq!(plan.rows(1)[0].teams[0], Some(TeamId::from("AAA")));
        assert_eq!(plan.rows(2)[0].teams[0], None);
        assert!(!plan.participating_teams().contains(&TeamId::from("EEE")));
    }
}

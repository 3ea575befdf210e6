//! Ranking a match's participants into tied groups.
//!
//! Both the league scorer and the knockout scheduler need the same view of a
//! scoresheet: clusters of teams ordered by game points, with disqualified and
//! absent teams collapsed into a shared last-place group. Tie detection is a
//! structured result here, never an error.

use super::types::TeamId;
use crate::scoring::ScoreReport;

/// One participant's line before ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub team: TeamId,
    pub game_points: f64,
    /// Disqualified or absent: ranked worst regardless of points
    pub excluded: bool,
}

/// A cluster of teams sharing one rank
#[derive(Debug, Clone, PartialEq)]
pub struct RankGroup {
    /// 1-based position of every team in the group
    pub position: u32,
    /// Alphabetical within the group
    pub teams: Vec<TeamId>,
    /// The shared last-place group of disqualified/absent teams
    pub excluded: bool,
}

/// Ranked outcome of one match
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchRanking {
    pub groups: Vec<RankGroup>,
}

/// Result of selecting the top `n` finishers when the cut may fall inside
/// a tied group
#[derive(Debug, Clone, PartialEq)]
pub enum TopSelection {
    /// The cut fell between groups (or the field ran out)
    Resolved(Vec<TeamId>),
    /// A tied group straddles the cut: `settled` are through, `contested`
    /// fight for the remaining `seats`
    Contested {
        settled: Vec<TeamId>,
        contested: Vec<TeamId>,
        seats: usize,
    },
}

/// Rank participants by game points descending; excluded teams share last place
pub fn rank(participants: Vec<Participant>) -> MatchRanking {
    let (mut live, excluded): (Vec<_>, Vec<_>) =
        participants.into_iter().partition(|p| !p.excluded);

    live.sort_by(|a, b| {
        b.game_points
            .partial_cmp(&a.game_points)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.team.cmp(&b.team))
    });

    let mut groups = Vec::new();
    let mut position = 1u32;
    let mut i = 0;
    while i < live.len() {
        let mut j = i + 1;
        while j < live.len() && live[j].game_points == live[i].game_points {
            j += 1;
        }
        let mut teams: Vec<TeamId> = live[i..j].iter().map(|p| p.team.clone()).collect();
        teams.sort();
        groups.push(RankGroup {
            position,
            teams,
            excluded: false,
        });
        position += (j - i) as u32;
        i = j;
    }

    if !excluded.is_empty() {
        let mut teams: Vec<TeamId> = excluded.into_iter().map(|p| p.team).collect();
        teams.sort();
        groups.push(RankGroup {
            position,
            teams,
            excluded: true,
        });
    }

    MatchRanking { groups }
}

/// Rank a scored report; absent and disqualified teams are excluded
pub fn rank_report(report: &ScoreReport) -> MatchRanking {
    rank(
        report
            .teams
            .iter()
            .map(|(team, line)| Participant {
                team: team.clone(),
                game_points: line.game_points,
                excluded: line.disqualified || !line.present,
            })
            .collect(),
    )
}

impl MatchRanking {
    pub fn position_of(&self, team: &TeamId) -> Option<u32> {
        self.groups
            .iter()
            .find(|g| g.teams.contains(team))
            .map(|g| g.position)
    }

    /// Teams sharing first place, if anyone finished unexcluded
    pub fn winners(&self) -> &[TeamId] {
        match self.groups.first() {
            Some(g) if !g.excluded => &g.teams,
            _ => &[],
        }
    }

    /// Select the top `n` finishers; excluded teams never advance.
    ///
    /// Returns `Contested` only when a tied group crosses the cut, which is
    /// exactly the condition under which a tiebreaker match is owed.
    pub fn take_top(&self, n: usize) -> TopSelection {
        let mut settled = Vec::new();
        let mut seats = n;
        for group in self.groups.iter().filter(|g| !g.excluded) {
            if seats == 0 {
                break;
            }
            if group.teams.len() <= seats {
                seats -= group.teams.len();
                settled.extend(group.teams.iter().cloned());
            } else {
                return TopSelection::Contested {
                    settled,
                    contested: group.teams.clone(),
                    seats,
                };
            }
        }
        TopSelection::Resolved(settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(team: &str, points: f64, excluded: bool) -> Participant {
        Participant {
            team: TeamId::from(team),
            game_points: points,
            excluded,
        }
    }

    fn names(teams: &[TeamId]) -> Vec<&str> {
        teams.iter().map(TeamId::as_str).collect()
    }

    #[test]
    fn ranks_with_shared_positions() {
        let ranking = rank(vec![
            p("AAA", 10.0, false),
            p("BBB", 8.0, false),
            p("CCC", 8.0, false),
            p("DDD", 2.0, false),
        ]);

        let positions: Vec<_> = ranking.groups.iter().map(|g| g.position).collect();
        assert_eq!(positions, vec![1, 2, 4]);
        assert_eq!(names(&ranking.groups[1].teams), vec!["BBB", "CCC"]);
        assert_eq!(ranking.position_of(&TeamId::from("CCC")), Some(2));
        assert_eq!(ranking.position_of(&TeamId::from("DDD")), Some(4));
    }

    #[test]
    fn excluded_teams_share_last_place() {
        let ranking = rank(vec![
            p("AAA", 10.0, false),
            p("BBB", 8.0, false),
            p("CCC", 0.0, false),
            p("DDD", 5.0, true),
        ]);

        let last = ranking.groups.last().unwrap();
        assert!(last.excluded);
        assert_eq!(last.position, 4);
        assert_eq!(names(&last.teams), vec!["DDD"]);
        // A zero score still beats a disqualification
        assert_eq!(ranking.position_of(&TeamId::from("CCC")), Some(3));
    }

    #[test]
    fn take_top_resolves_when_cut_falls_between_groups() {
        let ranking = rank(vec![
            p("AAA", 10.0, false),
            p("BBB", 8.0, false),
            p("CCC", 8.0, false),
            p("DDD", 2.0, false),
        ]);

        // Both 8-point teams advance together: no tiebreaker owed
        match ranking.take_top(3) {
            TopSelection::Resolved(teams) => assert_eq!(names(&teams), vec!["AAA", "BBB", "CCC"]),
            other => panic!("expected resolved selection, got {other:?}"),
        }
    }

    #[test]
    fn take_top_reports_a_cut_crossing_tie() {
        let ranking = rank(vec![
            p("AAA", 10.0, false),
            p("BBB", 8.0, false),
            p("CCC", 8.0, false),
            p("DDD", 2.0, false),
        ]);

        match ranking.take_top(2) {
            TopSelection::Contested {
                settled,
                contested,
                seats,
            } => {
                assert_eq!(names(&settled), vec!["AAA"]);
                assert_eq!(names(&contested), vec!["BBB", "CCC"]);
                assert_eq!(seats, 1);
            }
            other => panic!("expected contested selection, got {other:?}"),
        }
    }

    #[test]
    fn take_top_never_advances_excluded_teams() {
        let ranking = rank(vec![
            p("AAA", 10.0, false),
            p("BBB", 0.0, true),
            p("CCC", 0.0, true),
            p("DDD", 0.0, true),
        ]);

        match ranking.take_top(2) {
            TopSelection::Resolved(teams) => assert_eq!(names(&teams), vec!["AAA"]),
            other => panic!("expected resolved selection, got {other:?}"),
        }
    }
}

use super::scoresheet::{RawScoresheet, ScoreReport, TeamScoreLine};
use crate::error::{CompError, Result};
use crate::matches::{Match, TeamId};
use std::collections::{BTreeMap, BTreeSet};

/// Scoring collaborator: turns a raw scoresheet into per-team game points.
///
/// Implementations must be pure: the same sheet always yields the same reply.
pub trait Scorer {
    /// Raw game points per team
    fn calculate_scores(&self, sheet: &RawScoresheet) -> Result<BTreeMap<TeamId, f64>>;

    /// Teams disqualified by the game rules
    fn teams_disqualified(&self, sheet: &RawScoresheet) -> Result<Vec<TeamId>>;
}

/// Default scorer: the sheet's `game` entries already are the game points
#[derive(Debug, Clone, Copy, Default)]
pub struct GamePointsScorer;

impl Scorer for GamePointsScorer {
    fn calculate_scores(&self, sheet: &RawScoresheet) -> Result<BTreeMap<TeamId, f64>> {
        Ok(sheet.game.clone())
    }

    fn teams_disqualified(&self, sheet: &RawScoresheet) -> Result<Vec<TeamId>> {
        Ok(sheet.disqualified.iter().cloned().collect())
    }
}

/// Score one match's sheet, validating both the sheet and the scorer reply.
///
/// The sheet must cover exactly the match's participants; the scorer must
/// return a score for each of them and nothing else.
pub fn score_match(m: &Match, sheet: &RawScoresheet, scorer: &dyn Scorer) -> Result<ScoreReport> {
    debug_assert_eq!(m.num, sheet.num);

    if sheet.arena != m.arena {
        return Err(CompError::ScoresheetArenaMismatch {
            num: m.num,
            reported: sheet.arena.clone(),
            actual: m.arena.clone(),
        });
    }

    let participants: BTreeSet<&TeamId> = m.participants().collect();
    for team in sheet.teams() {
        if !participants.contains(team) {
            return Err(CompError::UnknownTeamInScore {
                arena: m.arena.clone(),
                num: m.num,
                team: team.clone(),
            });
        }
    }
    for team in &participants {
        if !sheet.game.contains_key(*team) {
            return Err(CompError::Schema {
                path: format!("{}/{}.yaml", m.arena, m.num),
                message: format!("no score entry for team {team}"),
            });
        }
    }

    let scores = scorer.calculate_scores(sheet)?;
    validate_reply(sheet, &scores)?;

    let disqualified = scorer.teams_disqualified(sheet)?;
    for team in &disqualified {
        if !sheet.game.contains_key(team) {
            return Err(CompError::Scorer(format!(
                "disqualified team {team} is not on the sheet for match {}",
                m.num
            )));
        }
    }
    let disqualified: BTreeSet<&TeamId> = disqualified.iter().collect();

    let teams = scores
        .into_iter()
        .map(|(team, game_points)| {
            let line = TeamScoreLine {
                game_points,
                disqualified: disqualified.contains(&team),
                present: sheet.is_present(&team),
            };
            (team, line)
        })
        .collect();

    Ok(ScoreReport {
        arena: m.arena.clone(),
        num: m.num,
        teams,
    })
}

/// A scorer reply must score every sheeted team, exactly once, and no others
fn validate_reply(sheet: &RawScoresheet, scores: &BTreeMap<TeamId, f64>) -> Result<()> {
    for team in scores.keys() {
        if !sheet.game.contains_key(team) {
            return Err(CompError::Scorer(format!(
                "score for unknown team {team} in match {}",
                sheet.num
            )));
        }
    }
    for team in sheet.teams() {
        if !scores.contains_key(team) {
            return Err(CompError::Scorer(format!(
                "no score returned for team {team} in match {}",
                sheet.num
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::{ArenaId, MatchType};
    use chrono::{FixedOffset, TimeZone};

    fn match_with(teams: &[&str]) -> Match {
        let t = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 4, 6, 10, 0, 0)
            .unwrap();
        Match {
            num: 0,
            arena: ArenaId::from("main"),
            match_type: MatchType::League,
            display_name: "Match 0".to_string(),
            teams: teams.iter().map(|t| Some(TeamId::from(*t))).collect(),
            start_time: t,
            end_time: t,
            use_resolved_ranking: false,
        }
    }

    fn sheet(entries: &[(&str, f64)]) -> RawScoresheet {
        RawScoresheet::new(
            ArenaId::from("main"),
            0,
            entries
                .iter()
                .map(|(t, p)| (TeamId::from(*t), *p))
                .collect(),
        )
    }

    #[test]
    fn scores_a_plain_sheet() {
        let m = match_with(&["AAA", "BBB"]);
        let report = score_match(&m, &sheet(&[("AAA", 3.0), ("BBB", 5.0)]), &GamePointsScorer)
            .unwrap();

        assert_eq!(report.game_points(&TeamId::from("BBB")), Some(5.0));
        assert!(!report.line(&TeamId::from("AAA")).unwrap().disqualified);
        assert!(report.line(&TeamId::from("AAA")).unwrap().present);
    }

    #[test]
    fn carries_disqualification_and_absence() {
        let m = match_with(&["AAA", "BBB"]);
        let mut s = sheet(&[("AAA", 3.0), ("BBB", 5.0)]);
        s.disqualified.insert(TeamId::from("BBB"));
        s.present = Some([TeamId::from("BBB")].into_iter().collect());

        let report = score_match(&m, &s, &GamePointsScorer).unwrap();
        assert!(report.line(&TeamId::from("BBB")).unwrap().disqualified);
        assert!(!report.line(&TeamId::from("AAA")).unwrap().present);
    }

    #[test]
    fn rejects_sheets_for_the_wrong_arena() {
        let m = match_with(&["AAA", "BBB"]);
        let mut s = sheet(&[("AAA", 3.0), ("BBB", 5.0)]);
        s.arena = ArenaId::from("other");

        let err = score_match(&m, &s, &GamePointsScorer).unwrap_err();
        assert!(matches!(err, CompError::ScoresheetArenaMismatch { .. }));
    }

    #[test]
    fn rejects_sheets_naming_outside_teams() {
        let m = match_with(&["AAA", "BBB"]);
        let err = score_match(&m, &sheet(&[("AAA", 3.0), ("ZZZ", 5.0)]), &GamePointsScorer)
            .unwrap_err();
        assert!(matches!(err, CompError::UnknownTeamInScore { .. }));
    }

    #[test]
    fn rejects_incomplete_scorer_replies() {
        struct Partial;
        impl Scorer for Partial {
            fn calculate_scores(&self, _: &RawScoresheet) -> Result<BTreeMap<TeamId, f64>> {
                Ok([(TeamId::from("AAA"), 1.0)].into_iter().collect())
            }
            fn teams_disqualified(&self, _: &RawScoresheet) -> Result<Vec<TeamId>> {
                Ok(vec![])
            }
        }

        let m = match_with(&["AAA", "BBB"]);
        let err = score_match(&m, &sheet(&[("AAA", 3.0), ("BBB", 5.0)]), &Partial).unwrap_err();
        assert!(matches!(err, CompError::Scorer(_)));
    }
}

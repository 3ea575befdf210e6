//! Resolving winners and pass-through awards.

use crate::error::Result;
use crate::knockout::KnockoutBracket;
use crate::matches::TeamId;
use crate::scoring::Standings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Award categories; kinds the core does not recognise pass through untouched
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AwardKind {
    Winner,
    Committee,
    Image,
    Rookie,
    Third,
    Other(String),
}

impl AwardKind {
    pub fn as_str(&self) -> &str {
        match self {
            AwardKind::Winner => "winner",
            AwardKind::Committee => "committee",
            AwardKind::Image => "image",
            AwardKind::Rookie => "rookie",
            AwardKind::Third => "third",
            AwardKind::Other(kind) => kind,
        }
    }
}

impl From<String> for AwardKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "winner" => AwardKind::Winner,
            "committee" => AwardKind::Committee,
            "image" => AwardKind::Image,
            "rookie" => AwardKind::Rookie,
            "third" => AwardKind::Third,
            _ => AwardKind::Other(kind),
        }
    }
}

impl From<AwardKind> for String {
    fn from(kind: AwardKind) -> Self {
        kind.as_str().to_string()
    }
}

/// The resolved award state of a competition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Awards {
    /// Sole occupant of league position 1, once the league is final
    pub league_winner: Option<TeamId>,
    /// Winner of the knockout final
    pub knockout_winner: Option<TeamId>,
    /// Compstate-declared awards, passed through as given
    pub awards: BTreeMap<AwardKind, Vec<TeamId>>,
}

/// Derive winners from the finished state; declared awards pass straight
/// through.
///
/// A shared first place leaves the league winner undetermined. The knockout
/// winner is unique by construction: a tied final spawns a tiebreaker before
/// the bracket resolves.
pub fn resolve(
    standings: &Standings,
    bracket: &KnockoutBracket,
    declared: BTreeMap<AwardKind, Vec<TeamId>>,
) -> Result<Awards> {
    let league_winner = if standings.is_finalised() {
        match standings.standings().first() {
            Some(rung) if rung.teams.len() == 1 => Some(rung.teams[0].clone()),
            _ => None,
        }
    } else {
        None
    };

    Ok(Awards {
        league_winner,
        knockout_winner: bracket.champion.clone(),
        awards: declared,
    })
}

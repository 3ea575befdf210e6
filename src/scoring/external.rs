//! Bridge to a competition-supplied scoring script.
//!
//! The compstate ships its own game rules as an executable. The bridge feeds
//! the raw scoresheet to the script as JSON on stdin and reads a JSON reply
//! from stdout, so the core never evaluates foreign code in-process.

use super::scorer::Scorer;
use super::scoresheet::RawScoresheet;
use crate::error::{CompError, Result};
use crate::matches::{ArenaId, MatchNumber, TeamId};
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Expected reply shape:
/// `{ "scores": { "<team>": <points>, ... }, "disqualified": ["<team>", ...] }`
#[derive(Debug, Clone, Deserialize)]
struct ScriptReply {
    scores: BTreeMap<TeamId, f64>,
    #[serde(default)]
    disqualified: Vec<TeamId>,
}

/// Runs the configured scoring command once per scoresheet; the reply answers
/// both the score and the disqualification query for that sheet
#[derive(Debug, Clone)]
pub struct SubprocessScorer {
    program: PathBuf,
    args: Vec<String>,
    last_reply: RefCell<Option<((ArenaId, MatchNumber), ScriptReply)>>,
}

impl SubprocessScorer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            last_reply: RefCell::new(None),
        }
    }

    /// e.g. `SubprocessScorer::new("python3").with_args(["scoring/score.py"])`
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The reply for `sheet`, running the script only when the sheet differs
    /// from the previous call
    fn reply(&self, sheet: &RawScoresheet) -> Result<ScriptReply> {
        let key = (sheet.arena.clone(), sheet.num);
        if let Some((cached_key, reply)) = self.last_reply.borrow().as_ref() {
            if *cached_key == key {
                return Ok(reply.clone());
            }
        }
        let reply = self.run(sheet)?;
        *self.last_reply.borrow_mut() = Some((key, reply.clone()));
        Ok(reply)
    }

    fn run(&self, sheet: &RawScoresheet) -> Result<ScriptReply> {
        let payload = serde_json::to_vec(sheet)
            .map_err(|e| CompError::Scorer(format!("could not encode scoresheet: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CompError::Scorer(format!("could not run {:?}: {e}", self.program)))?;

        child
            .stdin
            .take()
            .ok_or_else(|| CompError::Scorer("scorer stdin unavailable".to_string()))?
            .write_all(&payload)
            .map_err(|e| CompError::Scorer(format!("could not write to scorer: {e}")))?;

        let output = child
            .wait_with_output()
            .map_err(|e| CompError::Scorer(format!("scorer did not finish: {e}")))?;
        if !output.status.success() {
            return Err(CompError::Scorer(format!(
                "scorer exited with {}",
                output.status
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| CompError::Scorer(format!("invalid scorer reply: {e}")))
    }
}

impl Scorer for SubprocessScorer {
    fn calculate_scores(&self, sheet: &RawScoresheet) -> Result<BTreeMap<TeamId, f64>> {
        Ok(self.reply(sheet)?.scores)
    }

    fn teams_disqualified(&self, sheet: &RawScoresheet) -> Result<Vec<TeamId>> {
        Ok(self.reply(sheet)?.disqualified)
    }
}

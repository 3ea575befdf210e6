//! Directory-backed compstate loader (feature `yaml`).
//!
//! Reads the canonical on-disk layout: top-level YAML files plus
//! `league/<arena>/<num>.yaml` and `knockout/<arena>/<num>.yaml` score
//! sheets. Everything is surfaced through `CompError::Schema` with the
//! offending path, so a broken compstate names its own culprit.

use super::records::{
    ArenasFile, AwardsFile, KnockoutFile, LeagueFile, ScheduleFile, ScoreEntry, TeamsFile,
};
use super::source::CompstateSource;
use crate::error::{CompError, Result};
use crate::matches::{ArenaId, MatchNumber};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// A compstate rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct YamlCompstate {
    root: PathBuf,
}

impl YamlCompstate {
    /// Open a compstate directory, verifying it exists
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CompError::Schema {
                path: root.display().to_string(),
                message: "compstate directory does not exist".to_string(),
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn schema_err(path: &Path, message: impl ToString) -> CompError {
        CompError::Schema {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    fn read<T: DeserializeOwned>(&self, rel: &str) -> Result<T> {
        let path = self.root.join(rel);
        let raw = fs::read_to_string(&path).map_err(|e| Self::schema_err(&path, e))?;
        serde_yaml::from_str(&raw).map_err(|e| Self::schema_err(&path, e))
    }

    fn read_optional<T: DeserializeOwned>(&self, rel: &str) -> Result<Option<T>> {
        if self.root.join(rel).is_file() {
            self.read(rel).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Collect `<dir>/<arena>/<num>.yaml` score sheets, sorted by arena then
    /// match number for deterministic re-evaluation
    fn scores_in(&self, dir: &str) -> Result<Vec<ScoreEntry>> {
        let base = self.root.join(dir);
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut arena_dirs: Vec<PathBuf> = fs::read_dir(&base)
            .map_err(|e| Self::schema_err(&base, e))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_dir())
            .collect();
        arena_dirs.sort();

        for arena_dir in arena_dirs {
            let arena = match arena_dir.file_name().and_then(|n| n.to_str()) {
                Some(name) => ArenaId::new(name),
                None => continue,
            };
            let mut files: Vec<PathBuf> = fs::read_dir(&arena_dir)
                .map_err(|e| Self::schema_err(&arena_dir, e))?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "yaml"))
                .collect();
            files.sort();

            for path in files {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default();
                let num: MatchNumber = stem.parse().map_err(|_| {
                    Self::schema_err(&path, "file name is not a match number")
                })?;
                let raw = fs::read_to_string(&path).map_err(|e| Self::schema_err(&path, e))?;
                let file =
                    serde_yaml::from_str(&raw).map_err(|e| Self::schema_err(&path, e))?;
                entries.push(ScoreEntry {
                    arena: arena.clone(),
                    num,
                    file,
                });
            }
        }

        entries.sort_by(|a, b| (&a.arena, a.num).cmp(&(&b.arena, b.num)));
        log::debug!("loaded {} score sheets from {dir}/", entries.len());
        Ok(entries)
    }
}

impl CompstateSource for YamlCompstate {
    fn arenas(&self) -> Result<ArenasFile> {
        self.read("arenas.yaml")
    }

    fn teams(&self) -> Result<TeamsFile> {
        self.read("teams.yaml")
    }

    fn schedule(&self) -> Result<ScheduleFile> {
        self.read("schedule.yaml")
    }

    fn league(&self) -> Result<LeagueFile> {
        self.read("league.yaml")
    }

    fn knockout(&self) -> Result<KnockoutFile> {
        Ok(self.read_optional("knockout.yaml")?.unwrap_or_default())
    }

    fn awards(&self) -> Result<AwardsFile> {
        Ok(self.read_optional("awards.yaml")?.unwrap_or_default())
    }

    fn league_scores(&self) -> Result<Vec<ScoreEntry>> {
        self.scores_in("league")
    }

    fn knockout_scores(&self) -> Result<Vec<ScoreEntry>> {
        self.scores_in("knockout")
    }
}

//! Score persistence: one JSON file, one score per profile key

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::state::Score;

pub const DEFAULT_PROFILE: &str = "default";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to read score file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write score file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("score file {} is corrupted: {source}", .path.display())]
    Corrupted {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize scores: {0}")]
    Serialize(#[from] serde_json::Error),
}

type Scores = BTreeMap<String, Score>;

#[derive(Clone, Debug)]
pub struct ScoreStore {
    path: PathBuf,
    profile: String,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            profile: profile.into(),
        }
    }

    pub fn default_path() -> PathBuf {
        let base = dirs_next::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("whosthat").join("score.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Read this profile's score. A missing file or profile is a fresh score.
    pub fn load(&self) -> Result<Score, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Score::default()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let scores = self.parse(&json)?;
        Ok(scores.get(&self.profile).copied().unwrap_or_default())
    }

    /// Write this profile's score, keeping every other profile's entry.
    pub async fn save(&self, score: Score) -> Result<(), StoreError> {
        let mut scores = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => self.parse(&json)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Scores::new(),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        scores.insert(self.profile.clone(), score);
        let json = serde_json::to_string_pretty(&scores)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.write_error(source))?;
        }
        // The score file is only ever replaced whole
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| self.write_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.write_error(source))?;
        Ok(())
    }

    fn parse(&self, json: &str) -> Result<Scores, StoreError> {
        if json.trim().is_empty() {
            return Ok(Scores::new());
        }
        serde_json::from_str(json).map_err(|source| StoreError::Corrupted {
            path: self.path.clone(),
            source,
        })
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

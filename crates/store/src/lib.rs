//! High-score persistence.
//!
//! The only durable state in the game is one integer, stored as a small JSON
//! file. Reads never fail: a missing or corrupt file is treated as a high
//! score of zero, so persistence problems can never stop the game.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u32,
}

/// Durable store for the high score.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored high score. Missing file reads as zero.
    pub fn load(&self) -> u32 {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return 0,
        };
        match serde_json::from_slice::<ScoreFile>(&bytes) {
            Ok(file) => file.high_score,
            Err(err) => {
                log::warn!(
                    "ignoring corrupt score file {}: {err}",
                    self.path.display()
                );
                0
            }
        }
    }

    /// Persist a new high score immediately.
    pub fn save(&self, high_score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let body = serde_json::to_vec_pretty(&ScoreFile { high_score })?;
        fs::write(&self.path, body).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

/// Default score file location: `$HOME/.tui-simon/highscore.json`, falling
/// back to the working directory when no home is set.
pub fn default_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home)
            .join(".tui-simon")
            .join("highscore.json"),
        _ => PathBuf::from("tui-simon-highscore.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_zero() {
        let dir = tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("highscore.json"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("highscore.json"));

        store.save(12).unwrap();
        assert_eq!(store.load(), 12);

        store.save(31).unwrap();
        assert_eq!(store.load(), 31);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("nested").join("deep").join("score.json"));

        store.save(4).unwrap();
        assert_eq!(store.load(), 4);
    }

    #[test]
    fn test_corrupt_file_reads_as_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = ScoreStore::new(&path);
        assert_eq!(store.load(), 0);

        // And a save repairs it.
        store.save(2).unwrap();
        assert_eq!(store.load(), 2);
    }
}

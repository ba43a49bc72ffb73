//! High score persistence
//!
//! The game only ever stores one number: the best score so far. Storage sits
//! behind `HighScoreStore` so hosts can plug in whatever backend they have.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Where the best score lives between runs
pub trait HighScoreStore {
    fn get(&self) -> u64;
    fn set(&mut self, score: u64) -> Result<()>;
}

/// Volatile store, for tests and hosts without storage
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    score: u64,
}

impl MemoryHighScore {
    pub fn new(score: u64) -> Self {
        Self { score }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn get(&self) -> u64 {
        self.score
    }

    fn set(&mut self, score: u64) -> Result<()> {
        self.score = score;
        Ok(())
    }
}

/// On-disk record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u64,
}

/// JSON file store; a missing or unreadable file reads as zero
#[derive(Debug, Clone)]
pub struct JsonFileHighScore {
    path: PathBuf,
    score: u64,
}

impl JsonFileHighScore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let score = match Self::read(&path) {
            Ok(score) => {
                log::info!("Loaded high score {score}");
                score
            }
            Err(err) => {
                log::info!("No high score found, starting fresh ({err})");
                0
            }
        };
        Self { path, score }
    }

    fn read(path: &Path) -> Result<u64> {
        let json = fs::read_to_string(path)?;
        let file: HighScoreFile = serde_json::from_str(&json)?;
        Ok(file.high_score)
    }
}

impl HighScoreStore for JsonFileHighScore {
    fn get(&self) -> u64 {
        self.score
    }

    fn set(&mut self, score: u64) -> Result<()> {
        let json = serde_json::to_string(&HighScoreFile { high_score: score })?;
        fs::write(&self.path, json)?;
        self.score = score;
        log::info!("High score saved ({score})");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("poker-serpent-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryHighScore::default();
        assert_eq!(store.get(), 0);
        store.set(1234).unwrap();
        assert_eq!(store.get(), 1234);
    }

    #[test]
    fn test_json_store_round_trips_through_disk() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileHighScore::open(&path);
        assert_eq!(store.get(), 0);
        store.set(5120).unwrap();

        let reopened = JsonFileHighScore::open(&path);
        assert_eq!(reopened.get(), 5120);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_ignores_garbage() {
        let path = temp_path("garbage");
        fs::write(&path, "not json").unwrap();
        let store = JsonFileHighScore::open(&path);
        assert_eq!(store.get(), 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_write_failure_is_persistence_error() {
        let dir = std::env::temp_dir().join(format!("poker-serpent-dir-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        // A directory cannot be written as a file
        let mut store = JsonFileHighScore::open(&dir);
        let err = store.set(10).unwrap_err();
        assert!(matches!(err, crate::error::GameError::Persistence(_)));
        assert_eq!(store.get(), 0);
        let _ = fs::remove_dir(&dir);
    }
}

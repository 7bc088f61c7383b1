//! High score persistence
//!
//! One integer per named player. The core only talks to the
//! [`HighScoreStore`] trait; native builds persist to a JSON file.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::MAX_NAME_LEN;
use crate::error::{NameError, StoreError};

/// Validated, non-blank player name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validate a typed name. Blank input means play anonymously.
    pub fn parse(input: &str) -> Result<Option<Self>, NameError> {
        let name = input.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(NameError::TooLong {
                len,
                max: MAX_NAME_LEN,
            });
        }
        Ok(Some(Self(name.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key (case-insensitive)
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistence collaborator, keyed by player name
pub trait HighScoreStore {
    /// Stored high score, 0 when the name has no record
    fn load_high_score(&self, name: &PlayerName) -> Result<u64, StoreError>;

    fn save_high_score(&mut self, name: &PlayerName, value: u64) -> Result<(), StoreError>;
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self, name: &PlayerName) -> Result<u64, StoreError> {
        Ok(self.scores.get(&name.key()).copied().unwrap_or(0))
    }

    fn save_high_score(&mut self, name: &PlayerName, value: u64) -> Result<(), StoreError> {
        self.scores.insert(name.key(), value);
        Ok(())
    }
}

/// JSON object of `name -> score`, rewritten on every save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, u64>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load_high_score(&self, name: &PlayerName) -> Result<u64, StoreError> {
        let score = self.read_all()?.get(&name.key()).copied().unwrap_or(0);
        log::info!("Loaded high score {} for {}", score, name);
        Ok(score)
    }

    fn save_high_score(&mut self, name: &PlayerName, value: u64) -> Result<(), StoreError> {
        let mut scores = self.read_all()?;
        scores.insert(name.key(), value);
        let json = serde_json::to_string_pretty(&scores)?;
        std::fs::write(&self.path, json)?;
        log::info!("High score {} saved for {}", value, name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> PlayerName {
        PlayerName::parse(s).unwrap().unwrap()
    }

    #[test]
    fn test_blank_name_is_anonymous() {
        assert_eq!(PlayerName::parse(""), Ok(None));
        assert_eq!(PlayerName::parse("   "), Ok(None));
    }

    #[test]
    fn test_name_length_limit() {
        assert!(PlayerName::parse("fifteen_chars__").unwrap().is_some());
        let err = PlayerName::parse("sixteen_chars___").unwrap_err();
        assert_eq!(err, NameError::TooLong { len: 16, max: 15 });
        assert_eq!(
            err.to_string(),
            "The name you have entered is too long. (16 > 15 characters)"
        );
    }

    #[test]
    fn test_keys_ignore_case() {
        let mut store = MemoryStore::new();
        store.save_high_score(&name("Alice"), 420).unwrap();
        assert_eq!(store.load_high_score(&name("ALICE")).unwrap(), 420);
        assert_eq!(store.load_high_score(&name("bob")).unwrap(), 0);
    }

    #[test]
    fn test_json_store_missing_file_is_zero() {
        let dir = std::env::temp_dir().join(format!("si-scores-missing-{}", std::process::id()));
        let store = JsonFileStore::new(dir.join("scores.json"));
        assert_eq!(store.load_high_score(&name("nobody")).unwrap(), 0);
    }

    #[test]
    fn test_json_store_keeps_other_players() {
        let path = std::env::temp_dir().join(format!("si-scores-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let mut store = JsonFileStore::new(&path);
        store.save_high_score(&name("alice"), 300).unwrap();
        store.save_high_score(&name("Bob"), 120).unwrap();
        store.save_high_score(&name("alice"), 350).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_high_score(&name("Alice")).unwrap(), 350);
        assert_eq!(reopened.load_high_score(&name("bob")).unwrap(), 120);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let path = std::env::temp_dir().join(format!("si-scores-bad-{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load_high_score(&name("x")), Err(StoreError::Json(_))));
        let _ = std::fs::remove_file(&path);
    }
}

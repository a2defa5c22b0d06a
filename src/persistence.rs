//! Restart-resilient rotation position
//!
//! A single integer in a small JSON state file under the user's data
//! directory. Read and write failures degrade to position 0 and a log line;
//! losing the position is never worth failing the rotation for.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::config;
use crate::rotation::PositionStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    last_position: usize,
}

pub struct FilePositionStore {
    path: PathBuf,
}

impl FilePositionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// State file location under the user's data directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::STATE_DIR);
        path.push(config::STATE_FILENAME);
        path
    }

    fn read(&self) -> Option<StateFile> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "state file unreadable, starting over");
                None
            }
        }
    }
}

impl PositionStore for FilePositionStore {
    fn load(&mut self) -> usize {
        let position = self.read().unwrap_or_default().last_position;
        debug!(position = position, "loaded rotation position");
        position
    }

    fn store(&mut self, position: usize) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let state = StateFile {
            last_position: position,
        };
        match serde_json::to_string_pretty(&state) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    warn!(path = %self.path.display(), error = %e, "could not persist rotation position");
                }
            }
            Err(e) => warn!(error = %e, "could not serialize rotation state"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("wallshift-test-{}-{tag}", std::process::id()));
        path.push("state.json");
        path
    }

    #[test]
    fn test_missing_state_file_loads_zero() {
        let mut store = FilePositionStore::new(temp_state_path("missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_position_round_trips_through_the_file() {
        let path = temp_state_path("roundtrip");
        let mut store = FilePositionStore::new(path.clone());
        store.store(17);
        assert_eq!(store.load(), 17);

        // A fresh store over the same file sees the persisted value
        let mut reopened = FilePositionStore::new(path.clone());
        assert_eq!(reopened.load(), 17);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_state_file_loads_zero() {
        let path = temp_state_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json at all").unwrap();

        let mut store = FilePositionStore::new(path.clone());
        assert_eq!(store.load(), 0);

        let _ = fs::remove_file(&path);
    }
}

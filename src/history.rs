// Search history persistence.
// Stores recently analyzed repository references in the platform data
// directory so they survive restarts (the response cache does not).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Maximum number of remembered entries.
const MAX_ENTRIES: usize = 10;

/// Path to the history file (~/.local/share/repolens on Linux).
pub fn history_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "repolens").map(|dirs| dirs.data_dir().join("history.json"))
}

/// Recently analyzed repositories, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHistory {
    pub entries: Vec<String>,
}

impl SearchHistory {
    /// Load history from a file, treating a missing file as empty.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let history = serde_json::from_str(&contents)?;
        Ok(history)
    }

    /// Load from the default location; any failure yields empty history.
    pub fn load_default() -> Self {
        history_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Record an entry, moving duplicates to the front and trimming to
    /// the maximum size.
    pub fn record(&mut self, entry: &str) {
        self.entries.retain(|e| e != entry);
        self.entries.insert(0, entry.to_string());
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Write history to a file atomically via a temp file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Save to the default location, ignoring failures (history is a
    /// convenience, never worth aborting an analysis over).
    pub fn save_default(&self) {
        if let Some(path) = history_path() {
            let _ = self.save(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");

        let mut history = SearchHistory::default();
        history.record("acme/widgets");
        history.record("other/repo");
        history.save(&path).unwrap();

        let loaded = SearchHistory::load(&path).unwrap();
        assert_eq!(loaded.entries, vec!["other/repo", "acme/widgets"]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = SearchHistory::load(&temp_dir.path().join("nope.json")).unwrap();
        assert!(loaded.entries.is_empty());
    }

    #[test]
    fn test_record_dedupes_and_trims() {
        let mut history = SearchHistory::default();
        for i in 0..15 {
            history.record(&format!("owner/repo{}", i));
        }
        history.record("owner/repo12");

        assert_eq!(history.entries.len(), MAX_ENTRIES);
        assert_eq!(history.entries[0], "owner/repo12");
        assert_eq!(history.entries.iter().filter(|e| *e == "owner/repo12").count(), 1);
    }
}

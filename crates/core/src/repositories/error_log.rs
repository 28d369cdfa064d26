//! Best-effort JSON error log.
//!
//! ```text
//! {
//!     "errors": [
//!         {
//!             "error_message": "...",
//!             "solution": "...",
//!             "timestamp": "2025-01-31T14:02:11.123456"
//!         }
//!     ]
//! }
//! ```
//!
//! The whole file is rewritten on every append.

use super::helpers::{ensure_dir, load_or_default, write_json};
use crate::ExplorerResult;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub error_message: String,
    pub solution: String,
    /// Local time, ISO 8601 without offset.
    pub timestamp: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogDocument {
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

#[derive(Clone, Debug)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded entries; an absent log is empty.
    pub fn entries(&self) -> ExplorerResult<Vec<ErrorEntry>> {
        let doc: ErrorLogDocument = load_or_default(&self.path)?;
        Ok(doc.errors)
    }

    /// Appends an entry stamped with the current local time.
    pub fn append(&self, error_message: &str, solution: &str) -> ExplorerResult<ErrorEntry> {
        let entry = ErrorEntry {
            error_message: error_message.to_owned(),
            solution: solution.to_owned(),
            timestamp: Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
        };

        let mut doc: ErrorLogDocument = load_or_default(&self.path)?;
        doc.errors.push(entry.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        write_json(&self.path, &doc)?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_entries_empty_when_log_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log = ErrorLog::new(temp_dir.path().join("error_log.json"));

        assert!(log.entries().expect("missing log is empty").is_empty());
    }

    #[test]
    fn test_append_preserves_existing_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("logs").join("error_log.json");
        let log = ErrorLog::new(&path);

        log.append("first failure", "retry").expect("append should succeed");
        log.append("second failure", "check disk")
            .expect("append should succeed");

        let entries = log.entries().expect("entries should load");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].error_message, "first failure");
        assert_eq!(entries[1].solution, "check disk");

        let raw = fs::read_to_string(&path).expect("should read log");
        assert!(raw.starts_with("{\n    \"errors\": ["));
    }

    #[test]
    fn test_append_timestamp_has_no_offset() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log = ErrorLog::new(temp_dir.path().join("error_log.json"));

        let entry = log.append("boom", "none").expect("append should succeed");

        assert!(chrono::NaiveDateTime::parse_from_str(&entry.timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .is_ok());
        assert!(!entry.timestamp.ends_with('Z'));
    }
}

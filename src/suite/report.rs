//! Append-only run report
//!
//! The report is the run's only persistent artifact: one block per case in
//! execution order, a separator between blocks, and a summary trailer.
//! Console output stays short; the full diagnostics live here.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::common::Result;

/// Width of the `=` separator drawn between case blocks
const SEPARATOR_WIDTH: usize = 100;

/// Append-only log file written over the course of one run
#[derive(Debug, Clone)]
pub struct ReportLog {
    path: PathBuf,
}

impl ReportLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Truncate the report at the start of a run
    pub fn clear(&self) -> Result<()> {
        std::fs::write(&self.path, "")?;
        Ok(())
    }

    /// Append a chunk of text, creating the file if it does not exist yet
    pub fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Separator line drawn after each case block
    pub fn separator() -> String {
        "=".repeat(SEPARATOR_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_accumulates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ReportLog::new(dir.path().join("report.log"));

        log.append("first\n").unwrap();
        log.append("second\n").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_clear_truncates_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let log = ReportLog::new(dir.path().join("report.log"));

        log.append("stale").unwrap();
        log.clear().unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_separator_width() {
        assert_eq!(ReportLog::separator().len(), 100);
        assert!(ReportLog::separator().chars().all(|c| c == '='));
    }
}

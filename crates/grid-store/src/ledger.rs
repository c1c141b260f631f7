//! Ledger of fully aggregated months.
//!
//! A month's label is recorded in `processed_months.txt` only after
//! every timestep of the month has been appended and committed, so the
//! aggregation pipeline can skip it entirely on rerun.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use wind_common::MonthKey;

use crate::error::Result;

const LEDGER_FILE: &str = "processed_months.txt";

/// Append-only set of month labels (`YYYY-MM`), one per line.
pub struct ProcessedMonths {
    path: PathBuf,
    entries: HashSet<String>,
}

impl ProcessedMonths {
    /// Load the ledger under `root`, creating an empty one in memory
    /// if the file does not exist yet.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(LEDGER_FILE);
        let entries = if path.is_file() {
            std::fs::read_to_string(&path)?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            HashSet::new()
        };
        debug!(path = %path.display(), months = entries.len(), "Loaded processed-month ledger");
        Ok(Self { path, entries })
    }

    pub fn contains(&self, month: MonthKey) -> bool {
        self.entries.contains(&month.label())
    }

    /// Record a month as complete. Appends one line and flushes before
    /// returning; recording an already present month is a no-op.
    pub fn record(&mut self, month: MonthKey) -> Result<()> {
        let label = month.label();
        if self.entries.contains(&label) {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{label}")?;
        file.flush()?;
        self.entries.insert(label);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ProcessedMonths::load(dir.path()).unwrap();
        assert!(ledger.is_empty());
        assert!(!ledger.contains(MonthKey::new(2002, 6)));
    }

    #[test]
    fn test_record_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let june = MonthKey::new(2002, 6);
        let july = MonthKey::new(2002, 7);

        {
            let mut ledger = ProcessedMonths::load(dir.path()).unwrap();
            ledger.record(june).unwrap();
            ledger.record(july).unwrap();
            // Recording twice must not duplicate the line.
            ledger.record(june).unwrap();
        }

        let ledger = ProcessedMonths::load(dir.path()).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains(june));
        assert!(ledger.contains(july));
        assert!(!ledger.contains(MonthKey::new(2002, 8)));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(super::LEDGER_FILE),
            "2001-01\n\n2001-02\n   \n",
        )
        .unwrap();
        let ledger = ProcessedMonths::load(dir.path()).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains(MonthKey::new(2001, 1)));
    }
}

//! Month-parallel aggregation pipeline.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};

use grid_store::{
    compute_speed, AppendOutcome, GridStoreConfig, MonthlyGridStore, ProcessedMonths,
};
use wind_common::{CancelFlag, MonthKey};

use crate::archive::{read_messages, scan_archive};
use crate::error::{AggregationError, Result};
use crate::index::MessageIndex;

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Archive root holding `YYYY-MM/` message directories.
    pub archive_root: PathBuf,
    /// Output root for grid stores and the month ledger.
    pub store_root: PathBuf,
    /// Archive units processed concurrently. Units that spill
    /// timesteps into a neighboring month share that month's store;
    /// a per-month lock keeps one writer per store.
    pub parallel_months: usize,
    pub grid: GridStoreConfig,
}

impl AggregatorConfig {
    pub fn new(archive_root: PathBuf, store_root: PathBuf) -> Self {
        Self {
            archive_root,
            store_root,
            parallel_months: 2,
            grid: GridStoreConfig::default(),
        }
    }
}

/// Counters for one pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregationSummary {
    /// Months fully aggregated and recorded in the ledger.
    pub months_completed: usize,
    /// Months skipped because the ledger already lists them.
    pub months_skipped: usize,
    /// Months that errored or finished with failed timesteps.
    pub months_incomplete: usize,
    pub timesteps_appended: usize,
    pub duplicates_skipped: usize,
    /// Messages dropped before storage (incomplete pairs, rejects).
    pub samples_dropped: usize,
    /// Timesteps that failed conversion or append.
    pub timesteps_failed: usize,
    pub cancelled: bool,
}

/// Drives the archive-to-grid aggregation.
pub struct Aggregator {
    config: AggregatorConfig,
    cancel: CancelFlag,
}

/// One writer per store month across all workers. A unit may spill
/// boundary timesteps into a neighboring month's store, so two workers
/// can target the same store concurrently; appends read the stored
/// length before writing and must not interleave.
#[derive(Default)]
struct StoreLocks {
    months: Mutex<HashMap<MonthKey, Arc<Mutex<()>>>>,
}

impl StoreLocks {
    fn for_month(&self, month: MonthKey) -> Arc<Mutex<()>> {
        lock_unpoisoned(&self.months).entry(month).or_default().clone()
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Result of one month worker.
struct MonthOutcome {
    appended: usize,
    duplicates: usize,
    dropped: usize,
    failed: usize,
    cancelled: bool,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig, cancel: CancelFlag) -> Self {
        Self { config, cancel }
    }

    /// Process every unprocessed month in the archive. Months already
    /// in the ledger are skipped outright; a month is added to the
    /// ledger only when every timestep of it landed.
    pub async fn run(&self) -> Result<AggregationSummary> {
        let months = scan_archive(&self.config.archive_root)?;
        let mut ledger = ProcessedMonths::load(&self.config.store_root)?;
        std::fs::create_dir_all(&self.config.store_root)?;

        let semaphore = Arc::new(Semaphore::new(self.config.parallel_months.max(1)));
        let store_locks = Arc::new(StoreLocks::default());
        let mut summary = AggregationSummary::default();
        let mut workers = Vec::new();

        for (month, files) in months {
            if ledger.contains(month) {
                debug!(month = %month, "Month already aggregated, skipping");
                summary.months_skipped += 1;
                continue;
            }
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AggregationError::Worker(e.to_string()))?;
            let store_root = self.config.store_root.clone();
            let grid_config = self.config.grid.clone();
            let cancel = self.cancel.clone();
            let locks = store_locks.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                process_month(month, &files, &store_root, &grid_config, &locks, &cancel)
            });
            workers.push((month, handle));
        }

        for (month, handle) in workers {
            let outcome = handle
                .await
                .map_err(|e| AggregationError::Worker(e.to_string()))?;
            match outcome {
                Ok(outcome) => {
                    summary.timesteps_appended += outcome.appended;
                    summary.duplicates_skipped += outcome.duplicates;
                    summary.samples_dropped += outcome.dropped;
                    summary.timesteps_failed += outcome.failed;
                    summary.cancelled |= outcome.cancelled;
                    if outcome.cancelled || outcome.failed > 0 {
                        summary.months_incomplete += 1;
                    } else {
                        ledger.record(month)?;
                        summary.months_completed += 1;
                    }
                }
                Err(e) => {
                    error!(month = %month, error = %e, "Month aggregation failed");
                    summary.months_incomplete += 1;
                }
            }
        }

        info!(
            completed = summary.months_completed,
            skipped = summary.months_skipped,
            incomplete = summary.months_incomplete,
            appended = summary.timesteps_appended,
            cancelled = summary.cancelled,
            "Aggregation run finished"
        );
        Ok(summary)
    }
}

/// Aggregate one month: decode, pair, convert, append.
#[instrument(skip_all, fields(month = %month))]
fn process_month(
    month: MonthKey,
    files: &[PathBuf],
    store_root: &std::path::Path,
    grid_config: &GridStoreConfig,
    locks: &StoreLocks,
    cancel: &CancelFlag,
) -> Result<MonthOutcome> {
    let mut outcome = MonthOutcome {
        appended: 0,
        duplicates: 0,
        dropped: 0,
        failed: 0,
        cancelled: false,
    };

    let mut index = MessageIndex::new();
    for file in files {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            return Ok(outcome);
        }
        match read_messages(file) {
            Ok(messages) => index.add_all(messages),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "Unreadable archive file");
                outcome.failed += 1;
            }
        }
    }

    // Grouping follows message dates. A unit named for one month may
    // spill a few boundary timesteps into its neighbors; those land in
    // the neighbor's store and are deduplicated when that month runs.
    let (groups, dropped) = index.into_month_groups();
    outcome.dropped = dropped;
    if groups.is_empty() {
        warn!(month = %month, "No complete timesteps in archive unit");
        return Ok(outcome);
    }

    for (store_month, pairs) in groups {
        if outcome.cancelled {
            break;
        }
        // Spilled groups can target a store another worker owns, so
        // every store month has exactly one writer at a time. The
        // store is opened only once the lock is held.
        let month_lock = locks.for_month(store_month);
        let _writer = lock_unpoisoned(&month_lock);
        let grid = pairs[0].1.u.grid();
        let mut store =
            MonthlyGridStore::open_or_create(store_root, store_month, &grid, grid_config)?;

        for (key, pair) in pairs {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }
            if store.contains(key) {
                outcome.duplicates += 1;
                continue;
            }
            if pair.u.grid() != *store.grid() || pair.v.grid() != *store.grid() {
                warn!(key = %key, "Timestep axes differ from this month's grid, skipped");
                outcome.failed += 1;
                continue;
            }
            let speed = match compute_speed(&pair.u.values, &pair.v.values, pair.u.missing) {
                Ok(speed) => speed,
                Err(e) => {
                    warn!(key = %key, error = %e, "Speed conversion failed, timestep skipped");
                    outcome.failed += 1;
                    continue;
                }
            };
            match store.append_timestep(key, &speed) {
                Ok(AppendOutcome::Appended) => outcome.appended += 1,
                Ok(AppendOutcome::SkippedDuplicate) => outcome.duplicates += 1,
                Err(e) => {
                    warn!(key = %key, error = %e, "Append failed, timestep skipped");
                    outcome.failed += 1;
                }
            }
        }
    }

    info!(
        month = %month,
        appended = outcome.appended,
        duplicates = outcome.duplicates,
        dropped = outcome.dropped,
        failed = outcome.failed,
        "Month aggregated"
    );
    Ok(outcome)
}

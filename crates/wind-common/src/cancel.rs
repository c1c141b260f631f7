//! Unit-level cancellation for long-running aggregation/analysis runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared across pipeline workers.
///
/// Workers check the flag between units of work (timesteps, chunks) and
/// abandon the in-flight unit without marking partial output as stored.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    inner: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_visible_to_clones() {
        let flag = CancelFlag::new();
        let seen_by_worker = flag.clone();
        assert!(!seen_by_worker.is_cancelled());
        flag.cancel();
        assert!(seen_by_worker.is_cancelled());
    }
}

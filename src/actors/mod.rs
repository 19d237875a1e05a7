mod account_actor;
#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::ErrorClass;

pub use account_actor::AccountActor;

/// Running totals shared by every account actor of one engine run.
#[derive(Debug, Default)]
pub struct ScreeningStats {
    screened: AtomicU64,
    flagged: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64
}

/// Snapshot of `ScreeningStats`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ScreeningReport {
    pub screened: u64,
    pub flagged: u64,
    /// Malformed input that never reached the pipeline.
    pub rejected: u64,
    /// Requests lost to an internal failure.
    pub failed: u64
}

impl ScreeningStats {
    pub fn record_screened(&self, is_fraud: bool) {
        self.screened.fetch_add(1, Ordering::Relaxed);

        if is_fraud {
            self.flagged.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_error(&self, class: ErrorClass) {
        match class {
            ErrorClass::Client => self.rejected.fetch_add(1, Ordering::Relaxed),
            ErrorClass::Server => self.failed.fetch_add(1, Ordering::Relaxed)
        };
    }

    pub fn report(&self) -> ScreeningReport {
        ScreeningReport {
            screened: self.screened.load(Ordering::Relaxed),
            flagged: self.flagged.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed)
        }
    }
}

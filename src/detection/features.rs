use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};

use crate::models::{History, Transaction};

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Features derived from an account's persisted history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedFeatures {
    /// Hours since the account's previous transaction, never negative.
    pub elapsed_time: f64,
    /// Prior transactions strictly inside the trailing window.
    pub frequency: u32
}

/// Computes derived features. Pure: the evaluation instant is always passed in.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    frequency_window: TimeDelta
}

impl FeatureExtractor {
    pub fn new(frequency_window: TimeDelta) -> Self {
        Self { frequency_window }
    }

    /// Derives `elapsed_time` and `frequency` for `transaction` from the account history.
    ///
    /// Only transactions of the same account count, and the transaction under evaluation is
    /// skipped if a store already returned it.
    pub fn extract(&self, transaction: &Transaction, history: &History, now: DateTime<Utc>) -> DerivedFeatures {
        let mut priors = history.priors_of(transaction).peekable();

        let Some(most_recent) = priors.peek() else {
            return DerivedFeatures::default();
        };

        let elapsed = now - most_recent.transaction_time;
        let elapsed_time = if elapsed < TimeDelta::zero() {
            0.0
        } else {
            elapsed.num_microseconds().unwrap_or(i64::MAX) as f64 / MICROS_PER_HOUR
        };

        let window_start = now - self.frequency_window;
        let frequency = priors.filter(|prior| prior.transaction_time > window_start).count();

        DerivedFeatures {
            elapsed_time,
            frequency: u32::try_from(frequency).unwrap_or(u32::MAX)
        }
    }

    /// Builds the risk model input: amount, elapsed time, the calendar components of `now`, frequency.
    pub fn model_features(&self, transaction: &Transaction, now: DateTime<Utc>) -> Vec<f64> {
        vec![
            transaction.amount.to_f64(),
            transaction.elapsed_time,
            f64::from(now.year()),
            f64::from(now.month()),
            f64::from(now.day()),
            f64::from(now.hour()),
            f64::from(now.minute()),
            f64::from(now.second()),
            f64::from(transaction.frequency)
        ]
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(TimeDelta::hours(24))
    }
}

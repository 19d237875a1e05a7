use chrono::TimeDelta;
use rust_decimal::Decimal;

use crate::models::{HistoryOrder, Transaction};

pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
pub const VELOCITY_WINDOW_SECS: i64 = 30;

/// Which of the independent checks fired for one transaction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct RuleVerdict {
    pub amount_limit: bool,
    pub velocity: bool,
    pub location_change: bool
}

impl RuleVerdict {
    pub fn is_suspicious(&self) -> bool {
        self.amount_limit || self.velocity || self.location_change
    }

    pub fn triggered(&self) -> Vec<&'static str> {
        [
            (self.amount_limit, "amount_limit"),
            (self.velocity, "velocity"),
            (self.location_change, "location_change")
        ]
        .into_iter()
        .filter_map(|(fired, name)| fired.then_some(name))
        .collect()
    }
}

/// Stateless predicate evaluator. Safe to share between tasks.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    max_amount: Decimal,
    velocity_window: TimeDelta
}

impl RuleEngine {
    pub fn new(max_amount: Decimal, velocity_window: TimeDelta) -> Self {
        Self { max_amount, velocity_window }
    }

    /// `true` when any check flags the transaction as suspicious.
    pub fn evaluate(
        &self,
        transaction: &Transaction,
        history: &[Transaction],
        history_order: HistoryOrder,
        previous_location: &str,
        current_location: &str
    ) -> bool {
        self.inspect(transaction, history, history_order, previous_location, current_location)
            .is_suspicious()
    }

    pub fn inspect(
        &self,
        transaction: &Transaction,
        history: &[Transaction],
        history_order: HistoryOrder,
        previous_location: &str,
        current_location: &str
    ) -> RuleVerdict {
        RuleVerdict {
            amount_limit: self.exceeds_amount_limit(transaction),
            velocity: self.is_rapid_succession(transaction, history, history_order),
            location_change: Self::is_location_change(previous_location, current_location)
        }
    }

    /// Non-positive amounts never trip the limit.
    pub fn exceeds_amount_limit(&self, transaction: &Transaction) -> bool {
        transaction.amount.is_positive() && transaction.amount.value() > self.max_amount
    }

    pub fn is_rapid_succession(&self, transaction: &Transaction, history: &[Transaction], history_order: HistoryOrder) -> bool {
        let Some(prior) = history_order.most_recent_prior(history, transaction) else {
            return false;
        };

        let gap = transaction.transaction_time - prior.transaction_time;
        let gap = if gap < TimeDelta::zero() { -gap } else { gap };

        gap < self.velocity_window
    }

    /// Either location missing means there is nothing to compare.
    pub fn is_location_change(previous_location: &str, current_location: &str) -> bool {
        !previous_location.is_empty() && !current_location.is_empty() && previous_location != current_location
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(MAX_AMOUNT, TimeDelta::seconds(VELOCITY_WINDOW_SECS))
    }
}

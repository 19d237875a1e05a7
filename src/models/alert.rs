use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Transaction;
use crate::types::{AccountId, Amount, TransactionId};

/// Notification raised for a transaction labeled as fraud.
#[derive(Debug, Clone, Serialize)]
pub struct FraudAlert {
    pub alert_id: Uuid,
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub amount: Amount,
    pub location: String,
    /// Names of the local rules that fired, if any.
    pub triggered_rules: Vec<&'static str>,
    /// Whether the external risk model voted fraud.
    pub model_flagged: bool,
    pub raised_at: DateTime<Utc>
}

impl FraudAlert {
    pub fn new(transaction: &Transaction, raised_at: DateTime<Utc>) -> Self {
        Self {
            alert_id: Uuid::new_v4(),
            transaction_id: transaction.transaction_id,
            account_id: transaction.account_id.clone(),
            amount: transaction.amount,
            location: transaction.location.clone(),
            triggered_rules: Vec::new(),
            model_flagged: false,
            raised_at
        }
    }

    pub fn with_triggered_rules(mut self, rules: Vec<&'static str>) -> Self {
        self.triggered_rules = rules;
        self
    }

    pub fn with_model_flag(mut self, model_flagged: bool) -> Self {
        self.model_flagged = model_flagged;
        self
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::InputError;
use crate::types::{AccountId, Amount, FraudLabel, TransactionId};

/// Raw fields supplied by a caller for a transaction that has not been evaluated yet.
///
/// The amount is kept exactly as received; clamping happens when the `Transaction` is built.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRequest {
    pub amount: Decimal,
    pub account_id: AccountId,
    #[serde(default)]
    pub location: String
}

impl TransactionRequest {
    pub fn new(amount: Decimal, account_id: impl Into<AccountId>, location: impl Into<String>) -> Self {
        Self {
            amount,
            account_id: account_id.into(),
            location: location.into()
        }
    }

    /// Parses a wire body of the form `{"amount": .., "account_id": .., "location": ..}`.
    pub fn from_json(body: &[u8]) -> Result<Self, InputError> {
        let request: TransactionRequest = serde_json::from_slice(body)?;
        request.validated()
    }

    /// Rejects requests that carry no account to evaluate against.
    pub fn validated(mut self) -> Result<Self, InputError> {
        let account_id = self.account_id.trim();

        if account_id.is_empty() {
            return Err(InputError::MissingAccount);
        }

        if account_id.len() != self.account_id.len() {
            self.account_id = account_id.to_string();
        }

        Ok(self)
    }
}

/// A single evaluated transaction, as persisted and as returned to callers.
///
/// Built once by the detector, labeled once, stored once. Nothing mutates it after persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Assigned at construction, never supplied by the client.
    pub transaction_id: TransactionId,
    /// Clamped to zero when the request carried a negative value.
    pub amount: Amount,
    pub account_id: AccountId,
    /// Coarse location token (city, region). May be empty.
    pub location: String,
    pub transaction_time: DateTime<Utc>,
    /// Hours since the account's previous transaction, `0` when there is none.
    pub elapsed_time: f64,
    /// Transactions for the account in the trailing window ending at evaluation time.
    pub frequency: u32,
    pub fraud_label: FraudLabel
}

impl Transaction {
    pub fn new(request: TransactionRequest, transaction_time: DateTime<Utc>) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            amount: Amount::new(request.amount),
            account_id: request.account_id,
            location: request.location,
            transaction_time,
            elapsed_time: 0.0,
            frequency: 0,
            fraud_label: FraudLabel::Legit
        }
    }

    pub fn is_fraud(&self) -> bool {
        self.fraud_label.is_fraud()
    }
}

use std::time::Duration;

use thiserror::Error;

use crate::models::Transaction;
use crate::storage::StoreError;
use crate::types::{AccountId, ErrorClass, TransactionId};

/// Reasons the external risk model produced no verdict. None of these abort screening.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("Risk model is not configured")]
    Disabled,
    #[error("Risk model did not answer in time")]
    Timeout,
    #[error("Risk model answered with status {0}")]
    Status(u16),
    #[error("Risk model could not be reached: {0}")]
    Transport(String),
    #[error("Risk model answered with a malformed body: {0}")]
    Malformed(String)
}

impl SignalError {
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Alert could not be delivered: {0}")]
    Delivery(String),
    #[error("Alert was not delivered within {0:?}")]
    TimedOut(Duration)
}

/// Failures that abort screening of a single transaction.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("History for account [{account_id}] could not be fetched: {source}")]
    HistoryUnavailable {
        account_id: AccountId,
        source: StoreError
    },
    #[error("Transaction listing could not be fetched: {source}")]
    ListingUnavailable {
        source: StoreError
    },
    #[error("Transaction [{transaction_id}] for account [{account_id}] could not be persisted: {source}")]
    PersistFailed {
        account_id: AccountId,
        transaction_id: TransactionId,
        source: StoreError
    }
}

impl DetectionError {
    pub fn history_unavailable(account_id: &AccountId, source: StoreError) -> Self {
        Self::HistoryUnavailable { account_id: account_id.clone(), source }
    }

    pub fn listing_unavailable(source: StoreError) -> Self {
        Self::ListingUnavailable { source }
    }

    pub fn persist_failed(transaction: &Transaction, source: StoreError) -> Self {
        Self::PersistFailed {
            account_id: transaction.account_id.clone(),
            transaction_id: transaction.transaction_id,
            source
        }
    }

    /// Read and write failures of the store are never the caller's fault.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::HistoryUnavailable { .. } | Self::ListingUnavailable { .. } | Self::PersistFailed { .. } => ErrorClass::Server
        }
    }
}

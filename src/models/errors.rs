use thiserror::Error;

use crate::types::ErrorClass;

/// A request body that cannot be turned into a `TransactionRequest`. The pipeline never starts for these.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Malformed transaction request: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Malformed transaction request row: {0}")]
    MalformedRow(#[from] csv::Error),
    #[error("Transaction request is missing an account id")]
    MissingAccount
}

impl InputError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Client
    }
}

use thiserror::Error;

use crate::types::TransactionId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Transaction store is unavailable: {0}")]
    Unavailable(String),
    #[error("Transaction [{0}] has already been persisted")]
    DuplicateTransaction(TransactionId)
}

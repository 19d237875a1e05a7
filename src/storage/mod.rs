mod errors;
mod memory_storage;

use async_trait::async_trait;

use crate::models::{History, Transaction};
use crate::types::{AccountId, TransactionId};

pub use errors::StoreError;
pub use memory_storage::MemoryStore;

/// Durable, append-only home of evaluated transactions.
///
/// Both listing operations return a `History` that states its own ordering.
#[async_trait]
pub trait TransactionStore: Send + Sync + 'static {
    async fn insert(&self, transaction: &Transaction) -> Result<TransactionId, StoreError>;
    async fn list_by_account(&self, account_id: &AccountId) -> Result<History, StoreError>;
    async fn list_all(&self) -> Result<History, StoreError>;
}

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use crate::models::{History, HistoryOrder, Transaction};
use crate::storage::{StoreError, TransactionStore};
use crate::types::{AccountId, TransactionId};

/// In-process transaction store. Each account's transactions are kept sorted oldest first.
pub struct MemoryStore {
    accounts: DashMap<AccountId, Vec<Transaction>>,
    transaction_ids: DashSet<TransactionId>
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            transaction_ids: DashSet::new()
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.transaction_ids.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn insert(&self, transaction: &Transaction) -> Result<TransactionId, StoreError> {
        if !self.transaction_ids.insert(transaction.transaction_id) {
            return Err(StoreError::DuplicateTransaction(transaction.transaction_id));
        }

        let mut transactions = self.accounts.entry(transaction.account_id.clone()).or_default();
        let position = transactions.partition_point(|stored| stored.transaction_time <= transaction.transaction_time);
        transactions.insert(position, transaction.clone());

        Ok(transaction.transaction_id)
    }

    async fn list_by_account(&self, account_id: &AccountId) -> Result<History, StoreError> {
        let transactions = self.accounts.get(account_id)
            .map(|stored| stored.iter().rev().cloned().collect())
            .unwrap_or_default();

        Ok(History::new(HistoryOrder::Descending, transactions))
    }

    async fn list_all(&self) -> Result<History, StoreError> {
        let mut transactions: Vec<Transaction> = self.accounts.iter()
            .flat_map(|entry| entry.value().clone())
            .collect();

        transactions.sort_by(|left, right| right.transaction_time.cmp(&left.transaction_time));

        Ok(History::new(HistoryOrder::Descending, transactions))
    }
}

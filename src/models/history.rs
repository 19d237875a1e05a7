use crate::models::Transaction;

/// Direction in which a history slice is sorted by `transaction_time`.
///
/// There is no default: every producer of history states its order, and every consumer reads it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum HistoryOrder {
    Ascending,
    Descending
}

impl HistoryOrder {
    /// Walks a slice sorted in this order from newest to oldest.
    pub fn recent_first(self, transactions: &[Transaction]) -> Box<dyn Iterator<Item = &Transaction> + '_> {
        match self {
            HistoryOrder::Ascending => Box::new(transactions.iter().rev()),
            HistoryOrder::Descending => Box::new(transactions.iter())
        }
    }

    /// Earlier transactions of the same account, newest first. The transaction itself is skipped
    /// if a store already returned it.
    pub fn priors_of<'a, 'b>(self, transactions: &'a [Transaction], transaction: &'b Transaction) -> impl Iterator<Item = &'a Transaction> + 'b
    where
        'a: 'b
    {
        self.recent_first(transactions)
            .filter(move |prior| prior.account_id == transaction.account_id && prior.transaction_id != transaction.transaction_id)
    }

    pub fn most_recent_prior<'a>(self, transactions: &'a [Transaction], transaction: &Transaction) -> Option<&'a Transaction> {
        self.priors_of(transactions, transaction).next()
    }
}

/// Transactions already persisted, together with the order they were returned in.
#[derive(Debug, Clone)]
pub struct History {
    order: HistoryOrder,
    transactions: Vec<Transaction>
}

impl History {
    pub fn new(order: HistoryOrder, transactions: Vec<Transaction>) -> Self {
        Self { order, transactions }
    }

    #[cfg(test)]
    pub fn empty(order: HistoryOrder) -> Self {
        Self::new(order, Vec::new())
    }

    pub fn order(&self) -> HistoryOrder {
        self.order
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    #[cfg(test)]
    pub fn most_recent(&self) -> Option<&Transaction> {
        self.order.recent_first(&self.transactions).next()
    }

    pub fn priors_of<'a>(&'a self, transaction: &'a Transaction) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.order.priors_of(&self.transactions, transaction)
    }

    pub fn most_recent_prior(&self, transaction: &Transaction) -> Option<&Transaction> {
        self.order.most_recent_prior(&self.transactions, transaction)
    }

    /// Oldest first, whatever order the history was fetched in.
    pub fn chronological(&self) -> Box<dyn Iterator<Item = &Transaction> + '_> {
        match self.order {
            HistoryOrder::Ascending => Box::new(self.transactions.iter()),
            HistoryOrder::Descending => Box::new(self.transactions.iter().rev())
        }
    }
}

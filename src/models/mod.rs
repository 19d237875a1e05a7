mod alert;
mod errors;
mod history;
mod transaction;

pub use alert::FraudAlert;
pub use errors::InputError;
pub use history::{History, HistoryOrder};
pub use transaction::{Transaction, TransactionRequest};

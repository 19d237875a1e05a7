mod amount;
mod clock;
mod errors;

use serde::{Serialize, Serializer};

pub use amount::Amount;
pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use errors::{AmountError, ErrorClass};

pub type AccountId = String;
pub type TransactionId = uuid::Uuid;

/// Binary outcome assigned to a transaction. Travels on the wire as `0` (legit) or `1` (fraud).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum FraudLabel {
    #[default]
    Legit,
    Fraud
}

impl FraudLabel {
    pub fn is_fraud(self) -> bool {
        self == FraudLabel::Fraud
    }

    pub fn as_flag(self) -> u8 {
        match self {
            FraudLabel::Legit => 0,
            FraudLabel::Fraud => 1
        }
    }
}

impl Serialize for FraudLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_flag())
    }
}

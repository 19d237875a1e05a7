use thiserror::Error;

/// Which side of a request a failure belongs to: bad input from the caller, or an internal fault.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorClass {
    Client,
    Server
}

#[derive(Debug, Error)]
pub enum AmountError {
    #[error("Amount error: {0}")]
    InvalidFormat(String),
    #[error("Amount error: {0}")]
    Parse(#[from] rust_decimal::Error)
}

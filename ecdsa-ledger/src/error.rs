//! Error types for the ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Signature is malformed or does not recover to a public key
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Sender balance is below the requested amount
    #[error("Insufficient funds: requested {amount}, available {balance}")]
    InsufficientFunds {
        /// Amount the sender tried to move
        amount: u64,
        /// Sender balance at check time
        balance: u64,
    },

    /// Address is not 20 bytes of hex
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Request body could not be decoded
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invariant violation (balance overflow, etc.)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidSignature(_)
                | Error::InsufficientFunds { .. }
                | Error::InvalidAddress(_)
                | Error::InvalidRequest(_)
        )
    }

    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidSignature(_) => "invalid_signature",
            Error::InsufficientFunds { .. } => "insufficient_funds",
            Error::InvalidAddress(_) => "invalid_address",
            Error::InvalidRequest(_) => "invalid_request",
            Error::InvariantViolation(_) => "invariant_violation",
            Error::Config(_) => "config_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
        }
    }
}

impl From<libsecp256k1::Error> for Error {
    fn from(err: libsecp256k1::Error) -> Self {
        Error::InvalidSignature(format!("{:?}", err))
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidSignature(format!("bad hex: {}", err))
    }
}

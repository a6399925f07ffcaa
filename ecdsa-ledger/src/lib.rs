//! ECDSA Ledger
//!
//! In-memory balance ledger where transfers are authorized by recoverable
//! secp256k1 signatures.
//!
//! # Architecture
//!
//! - **Signer recovery**: The sender address is recomputed from the message
//!   and its signature, never taken from the request
//! - **Single lock**: The balance map sits behind one lock, so each transfer
//!   checks and mutates as one unit
//! - **HTTP boundary**: axum router exposing balance and transfer endpoints
//!
//! # Invariants
//!
//! - Every balance is non-negative
//! - Transfers conserve the total supply
//! - A rejected transfer leaves every balance unchanged

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod crypto;
pub mod ledger;
pub mod error;
pub mod config;
pub mod metrics;
pub mod server;

// Re-exports
pub use error::{Error, Result};
pub use types::{Address, PublicKey, RecoverableSignature, TransferMessage, TransferRequest};
pub use crypto::{KeyPair, Secp256k1Recovery, SignatureRecovery};
pub use ledger::Ledger;
pub use config::Config;

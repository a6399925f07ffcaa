//! In-memory balance ledger
//!
//! One map from address to balance behind a single write lock. A transfer
//! holds the lock across the sufficiency check and the mutation, so no other
//! operation can observe or interleave with a half-applied transfer.
//!
//! # Example
//!
//! ```
//! use ecdsa_ledger::{types::Address, Ledger};
//!
//! let alice = Address::from_bytes([1u8; 20]);
//! let bob = Address::from_bytes([2u8; 20]);
//! let ledger = Ledger::with_balances([(alice, 100), (bob, 50)]);
//!
//! assert_eq!(ledger.transfer(&alice, &bob, 30).unwrap(), 70);
//! assert_eq!(ledger.get_balance(&bob), 80);
//! ```

use crate::{types::Address, Config, Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Address to balance table
#[derive(Debug, Default)]
pub struct Ledger {
    balances: RwLock<HashMap<Address, u64>>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded with initial balances
    pub fn with_balances(balances: impl IntoIterator<Item = (Address, u64)>) -> Self {
        Self {
            balances: RwLock::new(balances.into_iter().collect()),
        }
    }

    /// Create a ledger seeded from the configured accounts
    pub fn from_config(config: &Config) -> Self {
        let ledger = Self::with_balances(config.accounts.iter().map(|a| (a.address, a.balance)));
        tracing::info!(
            accounts = ledger.account_count(),
            supply = ledger.total_supply(),
            "Ledger seeded"
        );
        ledger
    }

    /// Balance of `address`, 0 if never seen
    pub fn get_balance(&self, address: &Address) -> u64 {
        self.balances.read().get(address).copied().unwrap_or(0)
    }

    /// Create the account with balance 0 if it has no entry
    pub fn ensure_account(&self, address: &Address) {
        self.balances.write().entry(*address).or_insert(0);
    }

    /// Move `amount` from `sender` to `recipient`.
    ///
    /// Returns the sender's balance after the transfer. On
    /// [`Error::InsufficientFunds`] balances are untouched, though both
    /// accounts exist afterwards.
    pub fn transfer(&self, sender: &Address, recipient: &Address, amount: u64) -> Result<u64> {
        let mut balances = self.balances.write();

        let sender_balance = *balances.entry(*sender).or_insert(0);
        let recipient_balance = *balances.entry(*recipient).or_insert(0);

        if sender_balance < amount {
            tracing::warn!(
                %sender,
                amount,
                balance = sender_balance,
                "Transfer rejected: insufficient funds"
            );
            return Err(Error::InsufficientFunds {
                amount,
                balance: sender_balance,
            });
        }

        // Debit and credit on one account cancel out
        if sender == recipient {
            return Ok(sender_balance);
        }

        let new_recipient_balance = recipient_balance.checked_add(amount).ok_or_else(|| {
            Error::InvariantViolation(format!("balance overflow crediting {}", recipient))
        })?;
        let new_sender_balance = sender_balance - amount;

        balances.insert(*sender, new_sender_balance);
        balances.insert(*recipient, new_recipient_balance);

        tracing::info!(%sender, %recipient, amount, "Transfer applied");
        Ok(new_sender_balance)
    }

    /// Number of known accounts
    pub fn account_count(&self) -> usize {
        self.balances.read().len()
    }

    /// Sum of all balances. Transfers never change it.
    pub fn total_supply(&self) -> u128 {
        self.balances.read().values().map(|&b| u128::from(b)).sum()
    }
}

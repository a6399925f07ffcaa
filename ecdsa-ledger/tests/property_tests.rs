//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify:
//! - Signer recovery: recovered address == address of the signing key
//! - Tamper evidence: a signature over M1 does not recover the signer for M2
//! - Conservation: a transfer moves exactly `amount` between two accounts
//! - Sufficiency: an overdraft leaves every balance unchanged
//! - Idempotency: `ensure_account` twice == once

use ecdsa_ledger::{
    crypto::{derive_address, derive_address_from_signature},
    Address, Error, KeyPair, Ledger, Secp256k1Recovery, TransferMessage,
};
use proptest::prelude::*;

/// Strategy for generating addresses
fn address_strategy() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from_bytes)
}

/// Strategy for generating two distinct addresses
fn distinct_pair_strategy() -> impl Strategy<Value = (Address, Address)> {
    (address_strategy(), address_strategy()).prop_filter("distinct", |(a, b)| a != b)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: the address recovered from a signature is the signer's address
    #[test]
    fn prop_recovered_address_matches_signer(
        secret in any::<[u8; 32]>(),
        recipient in address_strategy(),
        amount in any::<u64>(),
    ) {
        let keypair = KeyPair::from_secret(&secret);
        prop_assume!(keypair.is_ok());
        let keypair = keypair.unwrap();

        let message = TransferMessage::new(recipient, amount);
        let signature = keypair.sign_message(&message).unwrap();

        let sender = derive_address_from_signature(&Secp256k1Recovery, &message, &signature).unwrap();
        prop_assert_eq!(sender, derive_address(&keypair.public_key()));
    }

    /// Property: changing the amount breaks the link to the signer
    #[test]
    fn prop_tampered_message_changes_sender(
        secret in any::<[u8; 32]>(),
        recipient in address_strategy(),
        amount in 0u64..1_000_000,
        delta in 1u64..1_000,
    ) {
        let keypair = KeyPair::from_secret(&secret);
        prop_assume!(keypair.is_ok());
        let keypair = keypair.unwrap();

        let signed = TransferMessage::new(recipient, amount);
        let signature = keypair.sign_message(&signed).unwrap();
        let tampered = TransferMessage::new(recipient, amount + delta);

        match derive_address_from_signature(&Secp256k1Recovery, &tampered, &signature) {
            Ok(sender) => prop_assert_ne!(sender, keypair.address()),
            Err(e) => prop_assert!(matches!(e, Error::InvalidSignature(_))),
        }
    }

    /// Property: never-referenced addresses read as 0
    #[test]
    fn prop_unseen_address_is_zero(
        seeded in address_strategy(),
        balance in any::<u64>(),
        probe in address_strategy(),
    ) {
        prop_assume!(seeded != probe);
        let ledger = Ledger::with_balances([(seeded, balance)]);
        prop_assert_eq!(ledger.get_balance(&probe), 0);
    }

    /// Property: successful transfers move exactly `amount`
    #[test]
    fn prop_transfer_conserves_money(
        (sender, recipient) in distinct_pair_strategy(),
        sender_balance in 0u64..1_000_000,
        recipient_balance in 0u64..1_000_000,
        fraction in 0.0f64..=1.0,
    ) {
        let amount = (sender_balance as f64 * fraction) as u64;
        let ledger = Ledger::with_balances([(sender, sender_balance), (recipient, recipient_balance)]);
        let supply_before = ledger.total_supply();

        let returned = ledger.transfer(&sender, &recipient, amount).unwrap();

        prop_assert_eq!(returned, sender_balance - amount);
        prop_assert_eq!(ledger.get_balance(&sender), sender_balance - amount);
        prop_assert_eq!(ledger.get_balance(&recipient), recipient_balance + amount);
        prop_assert_eq!(ledger.total_supply(), supply_before);
    }

    /// Property: overdrafts are rejected and change nothing
    #[test]
    fn prop_overdraft_rejected(
        (sender, recipient) in distinct_pair_strategy(),
        sender_balance in 0u64..1_000_000,
        recipient_balance in 0u64..1_000_000,
        excess in 1u64..1_000_000,
    ) {
        let amount = sender_balance + excess;
        let ledger = Ledger::with_balances([(sender, sender_balance), (recipient, recipient_balance)]);

        let result = ledger.transfer(&sender, &recipient, amount);

        let is_insufficient = matches!(
            result,
            Err(Error::InsufficientFunds { amount: a, balance: b }) if a == amount && b == sender_balance
        );
        prop_assert!(is_insufficient);
        prop_assert_eq!(ledger.get_balance(&sender), sender_balance);
        prop_assert_eq!(ledger.get_balance(&recipient), recipient_balance);
    }

    /// Property: self-transfers within balance leave the balance unchanged
    #[test]
    fn prop_self_transfer_unchanged(
        account in address_strategy(),
        balance in 0u64..1_000_000,
        fraction in 0.0f64..=1.0,
    ) {
        let amount = (balance as f64 * fraction) as u64;
        let ledger = Ledger::with_balances([(account, balance)]);

        prop_assert_eq!(ledger.transfer(&account, &account, amount).unwrap(), balance);
        prop_assert_eq!(ledger.get_balance(&account), balance);
    }

    /// Property: ensure_account twice == ensure_account once
    #[test]
    fn prop_ensure_account_idempotent(
        account in address_strategy(),
        seed in proptest::option::of(any::<u64>()),
    ) {
        let once = Ledger::with_balances(seed.map(|b| (account, b)));
        let twice = Ledger::with_balances(seed.map(|b| (account, b)));

        once.ensure_account(&account);
        twice.ensure_account(&account);
        twice.ensure_account(&account);

        prop_assert_eq!(once.get_balance(&account), twice.get_balance(&account));
        prop_assert_eq!(once.get_balance(&account), seed.unwrap_or(0));
        prop_assert_eq!(once.account_count(), twice.account_count());
    }
}

/// {A:100, B:50}: A sends B 30 with a valid signature
#[test]
fn test_signed_transfer_scenario() {
    let alice = KeyPair::generate();
    let bob = KeyPair::generate();
    let ledger = Ledger::with_balances([(alice.address(), 100), (bob.address(), 50)]);

    let message = TransferMessage::new(bob.address(), 30);
    let signature = alice.sign_message(&message).unwrap();
    let sender = derive_address_from_signature(&Secp256k1Recovery, &message, &signature).unwrap();

    assert_eq!(ledger.transfer(&sender, &message.recipient, message.amount).unwrap(), 70);
    assert_eq!(ledger.get_balance(&bob.address()), 80);
}

/// {A:100}: A tries to send B 150
#[test]
fn test_overdraft_scenario() {
    let alice = KeyPair::generate();
    let bob = Address::from_bytes([0xB0; 20]);
    let ledger = Ledger::with_balances([(alice.address(), 100)]);

    let message = TransferMessage::new(bob, 150);
    let signature = alice.sign_message(&message).unwrap();
    let sender = derive_address_from_signature(&Secp256k1Recovery, &message, &signature).unwrap();

    let err = ledger.transfer(&sender, &bob, 150).unwrap_err();
    assert!(matches!(err, Error::InsufficientFunds { amount: 150, balance: 100 }));
    assert_eq!(ledger.get_balance(&alice.address()), 100);
    assert_eq!(ledger.get_balance(&bob), 0);
}

//! Cryptographic operations for the ledger
//!
//! This module provides:
//! - Keccak-256 hashing of transfer messages
//! - Address derivation from uncompressed secp256k1 public keys
//! - Public key recovery from recoverable signatures
//! - secp256k1 key pairs for the wallet side (signing)
//!
//! The server never trusts a declared sender. The sender address is always
//! recomputed from `(message, signature)`.

use crate::types::{Address, PublicKey, RecoverableSignature, TransferMessage, ADDRESS_LEN};
use crate::{Error, Result};
use sha3::{Digest, Keccak256};

/// Recovers the public key that produced a signature over a digest.
///
/// Any conformant secp256k1 implementation can stand behind this.
pub trait SignatureRecovery: Send + Sync {
    /// Recover the signer's public key
    fn recover(&self, digest: &[u8; 32], signature: &RecoverableSignature) -> Result<PublicKey>;
}

/// Recovery backed by `libsecp256k1`
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Recovery;

impl SignatureRecovery for Secp256k1Recovery {
    fn recover(&self, digest: &[u8; 32], signature: &RecoverableSignature) -> Result<PublicKey> {
        let message = libsecp256k1::Message::parse(digest);
        let sig = libsecp256k1::Signature::parse_standard(signature.signature_bytes())?;
        let recovery_id = libsecp256k1::RecoveryId::parse(signature.recovery_id())?;

        let public_key = libsecp256k1::recover(&message, &sig, &recovery_id)?;
        Ok(PublicKey::from_bytes(public_key.serialize()))
    }
}

/// Keccak-256 of arbitrary bytes
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash a transfer message over its canonical bytes
pub fn hash_message(message: &TransferMessage) -> Result<[u8; 32]> {
    Ok(keccak256(&message.canonical_bytes()?))
}

/// Derive the account address of a public key.
///
/// Drops the format byte, hashes the 64-byte point and keeps the last
/// 20 bytes of the digest.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let digest = keccak256(&public_key.as_bytes()[1..]);
    let mut bytes = [0u8; ADDRESS_LEN];
    bytes.copy_from_slice(&digest[32 - ADDRESS_LEN..]);
    Address::from_bytes(bytes)
}

/// Recover the public key that signed `message`
pub fn recover_public_key(
    recovery: &dyn SignatureRecovery,
    message: &TransferMessage,
    signature: &RecoverableSignature,
) -> Result<PublicKey> {
    let digest = hash_message(message)?;
    recovery.recover(&digest, signature)
}

/// Sender address of a signed message
pub fn derive_address_from_signature(
    recovery: &dyn SignatureRecovery,
    message: &TransferMessage,
    signature: &RecoverableSignature,
) -> Result<Address> {
    let public_key = recover_public_key(recovery, message, signature)?;
    let address = derive_address(&public_key);
    tracing::debug!(%address, "recovered signer");
    Ok(address)
}

/// secp256k1 key pair for signing transfers
pub struct KeyPair {
    secret_key: libsecp256k1::SecretKey,
    public_key: libsecp256k1::PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secret_key = libsecp256k1::SecretKey::random(&mut rand::thread_rng());
        let public_key = libsecp256k1::PublicKey::from_secret_key(&secret_key);

        Self {
            secret_key,
            public_key,
        }
    }

    /// Create from a 32-byte secret. Fails for zero or out-of-range scalars.
    pub fn from_secret(secret: &[u8; 32]) -> Result<Self> {
        let secret_key = libsecp256k1::SecretKey::parse(secret)
            .map_err(|e| Error::Config(format!("invalid secret key: {:?}", e)))?;
        let public_key = libsecp256k1::PublicKey::from_secret_key(&secret_key);

        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// Get public key (uncompressed)
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.public_key.serialize())
    }

    /// Get private key bytes (USE WITH CAUTION - should be protected)
    pub fn secret_key(&self) -> [u8; 32] {
        self.secret_key.serialize()
    }

    /// Account address of this key pair
    pub fn address(&self) -> Address {
        derive_address(&self.public_key())
    }

    /// Sign a 32-byte digest
    pub fn sign_digest(&self, digest: &[u8; 32]) -> RecoverableSignature {
        let message = libsecp256k1::Message::parse(digest);
        let (signature, recovery_id) = libsecp256k1::sign(&message, &self.secret_key);
        RecoverableSignature::new(recovery_id.serialize(), signature.serialize())
    }

    /// Sign a transfer message
    pub fn sign_message(&self, message: &TransferMessage) -> Result<RecoverableSignature> {
        Ok(self.sign_digest(&hash_message(message)?))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

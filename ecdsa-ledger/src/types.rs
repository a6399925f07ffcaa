//! Core types for the ledger
//!
//! Wire formats:
//! - Addresses travel as 40 uppercase hex characters
//! - Signatures travel as 130 hex characters (`recovery_id | r | s`)
//! - Messages are hashed over their compact JSON form

use crate::{Error, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Address length in bytes
pub const ADDRESS_LEN: usize = 20;

/// Uncompressed SEC1 public key length (`0x04 | X | Y`)
pub const PUBLIC_KEY_LEN: usize = 65;

/// Recoverable signature length (`recovery_id | r | s`)
pub const SIGNATURE_LEN: usize = 65;

/// Strip an optional `0x` / `0X` prefix
fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Account address derived from a public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Parse a hex address.
    ///
    /// Accepts an optional `0x` prefix and either letter case; the result
    /// always renders uppercase.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = strip_hex_prefix(s);
        if trimmed.len() != ADDRESS_LEN * 2 {
            return Err(Error::InvalidAddress(format!(
                "expected {} hex characters, got {}",
                ADDRESS_LEN * 2,
                trimmed.len()
            )));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(trimmed, &mut bytes)
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(de::Error::custom)
    }
}

/// Uncompressed secp256k1 public key
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Create from the 65-byte uncompressed encoding
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get bytes, format byte included
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Hex encoding (lowercase, as wallets print keys)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// Transfer instruction signed by the sender.
///
/// Field order is part of the signed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferMessage {
    /// Account to credit
    pub recipient: Address,

    /// Units to move
    pub amount: u64,
}

impl TransferMessage {
    /// Create a new message
    pub fn new(recipient: Address, amount: u64) -> Self {
        Self { recipient, amount }
    }

    /// Canonical bytes for hashing: compact JSON, `recipient` then `amount`
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// secp256k1 signature carrying its recovery id in the first byte
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    recovery_id: u8,
    bytes: [u8; 64],
}

impl RecoverableSignature {
    /// Create from parts
    pub fn new(recovery_id: u8, bytes: [u8; 64]) -> Self {
        Self { recovery_id, bytes }
    }

    /// Parse the 65-byte wire form. Rejects wrong lengths and recovery ids
    /// outside `0..=3`.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        if data.len() != SIGNATURE_LEN {
            return Err(Error::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LEN,
                data.len()
            )));
        }

        let recovery_id = data[0];
        if recovery_id > 3 {
            return Err(Error::InvalidSignature(format!(
                "recovery id {} out of range",
                recovery_id
            )));
        }

        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&data[1..]);
        Ok(Self { recovery_id, bytes })
    }

    /// Parse from hex, optional `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self> {
        let data = hex::decode(strip_hex_prefix(s))?;
        Self::from_slice(&data)
    }

    /// Recovery id (0..=3)
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Compact `r | s` bytes
    pub fn signature_bytes(&self) -> &[u8; 64] {
        &self.bytes
    }

    /// 65-byte wire form
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[0] = self.recovery_id;
        out[1..].copy_from_slice(&self.bytes);
        out
    }

    /// Hex wire form
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({})", self.to_hex())
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RecoverableSignature::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Transfer submission: the message plus the sender's signature over it.
///
/// The signature stays as sent until [`TransferRequest::signature`] decodes
/// it, so a malformed one surfaces as [`Error::InvalidSignature`] rather than
/// a body decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Signed message
    pub message: TransferMessage,

    /// Hex signature over the message hash
    #[serde(rename = "signature")]
    pub signature_hex: String,
}

impl TransferRequest {
    /// Create from a message and its signature
    pub fn new(message: TransferMessage, signature: &RecoverableSignature) -> Self {
        Self {
            message,
            signature_hex: signature.to_hex(),
        }
    }

    /// Decode the signature
    pub fn signature(&self) -> Result<RecoverableSignature> {
        RecoverableSignature::from_hex(&self.signature_hex)
    }
}

/// Balance reply for both the query and the transfer endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Balance in units
    pub balance: u64,
}

//! Configuration for the ledger server

use crate::types::{Address, ADDRESS_LEN};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// HTTP listen address
    pub listen_addr: String,

    /// Accounts funded at startup
    pub accounts: Vec<AccountSeed>,
}

/// Initial balance for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSeed {
    /// Account address
    pub address: Address,

    /// Starting balance
    pub balance: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "ecdsa-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            listen_addr: "0.0.0.0:3042".to_string(),
            accounts: default_accounts(),
        }
    }
}

/// Demo accounts: the keys with secret scalars 1, 2 and 3
fn default_accounts() -> Vec<AccountSeed> {
    const SEEDS: [([u8; ADDRESS_LEN], u64); 3] = [
        (
            [
                0x7E, 0x5F, 0x45, 0x52, 0x09, 0x1A, 0x69, 0x12, 0x5D, 0x5D, 0xFC, 0xB7, 0xB8,
                0xC2, 0x65, 0x90, 0x29, 0x39, 0x5B, 0xDF,
            ],
            100,
        ),
        (
            [
                0x2B, 0x5A, 0xD5, 0xC4, 0x79, 0x5C, 0x02, 0x65, 0x14, 0xF8, 0x31, 0x7C, 0x7A,
                0x21, 0x5E, 0x21, 0x8D, 0xCC, 0xD6, 0xCF,
            ],
            50,
        ),
        (
            [
                0x68, 0x13, 0xEB, 0x93, 0x62, 0x37, 0x2E, 0xEF, 0x62, 0x00, 0xF3, 0xB1, 0xDB,
                0xC3, 0xF8, 0x19, 0x67, 0x1C, 0xBA, 0x69,
            ],
            75,
        ),
    ];

    SEEDS
        .into_iter()
        .map(|(bytes, balance)| AccountSeed {
            address: Address::from_bytes(bytes),
            balance,
        })
        .collect()
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables.
    ///
    /// `LEDGER_CONFIG` names a TOML file to start from; `LEDGER_LISTEN_ADDR`
    /// overrides the listen address.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("LEDGER_CONFIG") {
            Ok(path) => Config::from_file(path)?,
            Err(_) => Config::default(),
        };

        if let Ok(addr) = std::env::var("LEDGER_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(Error::Config(format!(
                "Invalid listen address: {}",
                self.listen_addr
            )));
        }

        let mut seen = HashSet::new();
        for seed in &self.accounts {
            if !seen.insert(seed.address) {
                return Err(Error::Config(format!(
                    "Account {} seeded twice",
                    seed.address
                )));
            }
        }

        Ok(())
    }
}

//! Configuration loading.
//!
//! Network and swap settings come from an optional TOML file (built-in
//! Base mainnet defaults when the file is absent). The account's secrets
//! come only from the process environment and are held in a
//! [`SecretString`] for the life of the process.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;

pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
pub const ACCOUNT_ADDRESS_ENV: &str = "ACCOUNT_ADDRESS";
pub const RPC_URL_ENV: &str = "WETHBOT_RPC_URL";

const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";
const DEFAULT_CHAIN_ID: u64 = 8453;
/// WETH predeploy on Base (and other OP-stack chains).
const DEFAULT_CONTRACT: &str = "0x4200000000000000000000000000000000000006";
const DEFAULT_EXPLORER_TX_URL: &str = "https://basescan.org/tx/";
const MAX_GAS_LIMIT_MULTIPLIER: Decimal = dec!(10);

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub swap: SwapConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub contract_address: String,
    /// Prefix that a transaction hash is appended to for display.
    pub explorer_tx_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            contract_address: DEFAULT_CONTRACT.to_string(),
            explorer_tx_url: DEFAULT_EXPLORER_TX_URL.to_string(),
        }
    }
}

impl NetworkConfig {
    /// The wrapped-token contract address.
    pub fn contract(&self) -> Result<Address, ConfigError> {
        Address::from_str(self.contract_address.trim()).map_err(|e| ConfigError::InvalidSetting {
            field: "network.contract_address",
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SwapConfig {
    /// Safety margin applied to the gas estimate to get the gas limit.
    pub gas_limit_multiplier: Decimal,
    /// How long to wait for a receipt before giving up on a swap.
    pub receipt_timeout_secs: u64,
    /// Delay between receipt polls.
    pub receipt_poll_interval_ms: u64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            gas_limit_multiplier: dec!(1.2),
            receipt_timeout_secs: 120,
            receipt_poll_interval_ms: 2_000,
        }
    }
}

impl SwapConfig {
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults if
    /// the file does not exist. `WETHBOT_RPC_URL` overrides the endpoint.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            Self::from_toml_str(&contents)
                .with_context(|| format!("Failed to parse config file: {path}"))?
        } else {
            info!(path, "No config file found, using Base mainnet defaults");
            Self::default()
        };

        config.apply_overrides(std::env::var(RPC_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Apply environment overrides. Empty values are ignored.
    pub fn apply_overrides(&mut self, rpc_url: Option<String>) {
        if let Some(url) = rpc_url.filter(|u| !u.trim().is_empty()) {
            self.network.rpc_url = url.trim().to_string();
        }
    }

    /// Reject settings that would make every swap fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.contract()?;
        let multiplier = self.swap.gas_limit_multiplier;
        if multiplier < Decimal::ONE || multiplier > MAX_GAS_LIMIT_MULTIPLIER {
            return Err(ConfigError::InvalidSetting {
                field: "swap.gas_limit_multiplier",
                reason: format!("{multiplier} is outside 1.0..={MAX_GAS_LIMIT_MULTIPLIER}"),
            });
        }
        if self.swap.receipt_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "swap.receipt_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// The single account the bot trades from.
#[derive(Debug)]
pub struct Account {
    address: Address,
    private_key: SecretString,
}

impl Account {
    /// Read `PRIVATE_KEY` and `ACCOUNT_ADDRESS` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            std::env::var(PRIVATE_KEY_ENV).ok(),
            std::env::var(ACCOUNT_ADDRESS_ENV).ok(),
        )
    }

    /// Build an account from raw values; empty strings count as missing.
    ///
    /// The key must parse and must control the given address.
    pub fn from_parts(
        private_key: Option<String>,
        address: Option<String>,
    ) -> Result<Self, ConfigError> {
        let private_key = private_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingEnv(PRIVATE_KEY_ENV))?;
        let address = address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .ok_or(ConfigError::MissingEnv(ACCOUNT_ADDRESS_ENV))?;

        let configured = Address::from_str(&address).map_err(|e| ConfigError::InvalidEnv {
            name: ACCOUNT_ADDRESS_ENV,
            reason: e.to_string(),
        })?;

        let account = Self {
            address: configured,
            private_key: SecretString::new(private_key),
        };

        let derived = account.signer()?.address();
        if derived != configured {
            return Err(ConfigError::AccountMismatch {
                configured,
                derived,
            });
        }

        Ok(account)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// A local signer for the held key.
    pub fn signer(&self) -> Result<PrivateKeySigner, ConfigError> {
        // The parse error text never includes the key itself.
        PrivateKeySigner::from_str(self.private_key.expose_secret()).map_err(|e| {
            ConfigError::InvalidEnv {
                name: PRIVATE_KEY_ENV,
                reason: e.to_string(),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

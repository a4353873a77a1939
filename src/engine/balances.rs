//! Balance reader.
//!
//! Reads native and wrapped balances for the bot's account. Nothing is
//! cached: every call is a fresh pair of RPC reads.

use alloy::primitives::Address;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use crate::chain::ChainClient;
use crate::types::{from_wei, BalanceSnapshot};

#[derive(Clone)]
pub struct BalanceReader {
    chain: Arc<dyn ChainClient>,
    owner: Address,
}

impl BalanceReader {
    pub fn new(chain: Arc<dyn ChainClient>, owner: Address) -> Self {
        Self { chain, owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Current balances in whole units.
    pub async fn snapshot(&self) -> Result<BalanceSnapshot> {
        let native = self
            .chain
            .native_balance(self.owner)
            .await
            .context("Failed to read native balance")?;
        let wrapped = self
            .chain
            .wrapped_balance(self.owner)
            .await
            .context("Failed to read wrapped balance")?;

        let snapshot = BalanceSnapshot::new(from_wei(native), from_wei(wrapped));
        debug!(owner = %self.owner, native = %snapshot.native, wrapped = %snapshot.wrapped, "Balances read");
        Ok(snapshot)
    }
}

//! Mock chain for integration testing.
//!
//! Provides a deterministic `ChainClient` that simulates a WETH contract
//! in memory: deposits and withdrawals move balances 1:1, every mined
//! transaction burns `gas_estimate × gas_price` of native balance, and
//! failures can be forced from test code.

use alloy::primitives::{Address, B256, U256};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wethbot::chain::{ChainClient, PreparedTx, TxReceipt, WethCall};
use wethbot::types::{from_wei, to_wei, BalanceSnapshot};

pub const CHAIN_ID: u64 = 8453;
pub const GAS_ESTIMATE: u64 = 30_000;
/// 1 gwei.
pub const GAS_PRICE: u128 = 1_000_000_000;

#[derive(Debug, Default)]
struct ChainState {
    native: U256,
    wrapped: U256,
    nonce: u64,
    sent: Vec<PreparedTx>,
    receipts: HashMap<B256, TxReceipt>,
    /// Next broadcast transactions revert (fee is still charged).
    revert: bool,
    /// Receipts never arrive.
    withhold_receipts: bool,
    /// Gas estimation fails with this message.
    estimate_error: Option<String>,
    /// Balance reads fail with this message.
    balance_error: Option<String>,
}

/// A single-account in-memory chain. Cloning shares state.
#[derive(Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    /// Start with balances in whole units.
    pub fn new(native: Decimal, wrapped: Decimal) -> Self {
        let chain = Self::default();
        {
            let mut s = chain.state.lock().unwrap();
            s.native = to_wei(native).unwrap();
            s.wrapped = to_wei(wrapped).unwrap();
        }
        chain
    }

    pub fn set_revert(&self, revert: bool) {
        self.state.lock().unwrap().revert = revert;
    }

    pub fn set_withhold_receipts(&self, withhold: bool) {
        self.state.lock().unwrap().withhold_receipts = withhold;
    }

    pub fn set_estimate_error(&self, msg: &str) {
        self.state.lock().unwrap().estimate_error = Some(msg.to_string());
    }

    pub fn set_balance_error(&self, msg: &str) {
        self.state.lock().unwrap().balance_error = Some(msg.to_string());
    }

    /// Every transaction broadcast so far.
    pub fn sent(&self) -> Vec<PreparedTx> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn balances(&self) -> BalanceSnapshot {
        let s = self.state.lock().unwrap();
        BalanceSnapshot::new(from_wei(s.native), from_wei(s.wrapped))
    }

    /// Fee charged per mined transaction, in whole units.
    pub fn fee() -> Decimal {
        from_wei(U256::from(GAS_ESTIMATE) * U256::from(GAS_PRICE))
    }

    fn balance_check(&self) -> Result<()> {
        match &self.state.lock().unwrap().balance_error {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn chain_id(&self) -> Result<u64> {
        Ok(CHAIN_ID)
    }

    async fn native_balance(&self, _owner: Address) -> Result<U256> {
        self.balance_check()?;
        Ok(self.state.lock().unwrap().native)
    }

    async fn wrapped_balance(&self, _owner: Address) -> Result<U256> {
        self.balance_check()?;
        Ok(self.state.lock().unwrap().wrapped)
    }

    async fn estimate_gas(&self, _from: Address, call: &WethCall) -> Result<u64> {
        let s = self.state.lock().unwrap();
        if let Some(msg) = &s.estimate_error {
            return Err(anyhow!("{msg}"));
        }
        // Mirrors the contract: withdrawing more than held reverts.
        if let WethCall::Withdraw { wad } = call {
            if *wad > s.wrapped {
                return Err(anyhow!("execution reverted"));
            }
        }
        Ok(GAS_ESTIMATE)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(GAS_PRICE)
    }

    async fn nonce(&self, _owner: Address) -> Result<u64> {
        Ok(self.state.lock().unwrap().nonce)
    }

    async fn send(&self, tx: &PreparedTx) -> Result<B256> {
        let mut s = self.state.lock().unwrap();
        if tx.nonce != s.nonce {
            return Err(anyhow!("nonce mismatch: got {}, expected {}", tx.nonce, s.nonce));
        }
        if tx.chain_id != CHAIN_ID {
            return Err(anyhow!("invalid chain id {}", tx.chain_id));
        }

        s.nonce += 1;
        s.sent.push(tx.clone());
        let tx_hash = B256::from(U256::from(s.nonce));

        let fee = U256::from(GAS_ESTIMATE) * U256::from(tx.gas_price);
        s.native = s.native.saturating_sub(fee);

        let success = !s.revert;
        if success {
            match tx.call {
                WethCall::Deposit { value } => {
                    s.native = s.native.saturating_sub(value);
                    s.wrapped += value;
                }
                WethCall::Withdraw { wad } => {
                    s.wrapped = s.wrapped.saturating_sub(wad);
                    s.native += wad;
                }
            }
        }

        let block_number = Some(s.nonce);
        s.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                success,
                gas_used: GAS_ESTIMATE,
                block_number,
            },
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256, _timeout: Duration) -> Result<Option<TxReceipt>> {
        let s = self.state.lock().unwrap();
        if s.withhold_receipts {
            return Ok(None);
        }
        Ok(s.receipts.get(&tx_hash).cloned())
    }
}

//! Chain integration.
//!
//! Defines the `ChainClient` trait — the JSON-RPC capability boundary the
//! engine talks to — and the alloy-backed implementation used in
//! production. Tests substitute in-memory implementations.

pub mod abi;
pub mod alloy_client;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use crate::types::Direction;
use abi::IWETH;

/// A state-changing call on the wrapped-token contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WethCall {
    /// `deposit()` carrying `value` wei.
    Deposit { value: U256 },
    /// `withdraw(wad)`.
    Withdraw { wad: U256 },
}

impl WethCall {
    /// The call that moves `wei` in `direction`.
    pub fn for_direction(direction: Direction, wei: U256) -> Self {
        match direction {
            Direction::NativeToWrapped => WethCall::Deposit { value: wei },
            Direction::WrappedToNative => WethCall::Withdraw { wad: wei },
        }
    }

    /// Native value attached to the transaction.
    pub fn value(&self) -> U256 {
        match self {
            WethCall::Deposit { value } => *value,
            WethCall::Withdraw { .. } => U256::ZERO,
        }
    }

    /// ABI-encoded calldata.
    pub fn calldata(&self) -> Bytes {
        match self {
            WethCall::Deposit { .. } => IWETH::depositCall {}.abi_encode().into(),
            WethCall::Withdraw { wad } => IWETH::withdrawCall { wad: *wad }.abi_encode().into(),
        }
    }
}

/// A fully-specified legacy-priced transaction, ready to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTx {
    pub from: Address,
    pub call: WethCall,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub nonce: u64,
    pub chain_id: u64,
}

/// The parts of a receipt the bot reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub success: bool,
    pub gas_used: u64,
    pub block_number: Option<u64>,
}

/// Abstraction over the chain's JSON-RPC surface.
///
/// Every method is a single network round-trip except
/// [`ChainClient::wait_for_receipt`], which polls until the receipt
/// appears or the timeout elapses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Chain id reported by the endpoint.
    async fn chain_id(&self) -> Result<u64>;

    /// Native balance in wei.
    async fn native_balance(&self, owner: Address) -> Result<U256>;

    /// Wrapped-token balance in wei (`balanceOf`).
    async fn wrapped_balance(&self, owner: Address) -> Result<U256>;

    /// Gas estimate for `call` sent from `from`. Errors usually mean the
    /// call would revert.
    async fn estimate_gas(&self, from: Address, call: &WethCall) -> Result<u64>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128>;

    /// Next nonce for `owner`.
    async fn nonce(&self, owner: Address) -> Result<u64>;

    /// Sign `tx` with the held key and broadcast it.
    async fn send(&self, tx: &PreparedTx) -> Result<B256>;

    /// Wait up to `timeout` for the receipt of `tx_hash`.
    /// `Ok(None)` means the timeout elapsed.
    async fn wait_for_receipt(&self, tx_hash: B256, timeout: Duration) -> Result<Option<TxReceipt>>;
}

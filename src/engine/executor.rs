//! Swap executor.
//!
//! Runs a single wrap or unwrap end to end: balance pre-check, gas
//! estimate, fee check, sign + broadcast, receipt wait, and a post-swap
//! balance read. Every failure is a typed [`SwapError`]; nothing is
//! retried.

use alloy::primitives::{Address, B256, U256};
use rust_decimal::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::chain::{ChainClient, PreparedTx, WethCall};
use crate::config::AppConfig;
use crate::engine::balances::BalanceReader;
use crate::error::SwapError;
use crate::types::{from_wei, to_wei, Direction, SwapOutcome, SwapRequest, NATIVE_SYMBOL};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Fixed transaction parameters for the session.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub chain_id: u64,
    pub gas_limit_multiplier: Decimal,
    pub receipt_timeout: Duration,
    pub explorer_tx_url: String,
}

impl ExecutorSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            chain_id: cfg.network.chain_id,
            gas_limit_multiplier: cfg.swap.gas_limit_multiplier,
            receipt_timeout: cfg.swap.receipt_timeout(),
            explorer_tx_url: cfg.network.explorer_tx_url.clone(),
        }
    }

    /// Gas limit for an estimate: the estimate scaled by the safety
    /// margin, truncated, and never below the estimate itself.
    pub fn gas_limit(&self, gas_estimate: u64) -> u64 {
        Decimal::from(gas_estimate)
            .checked_mul(self.gas_limit_multiplier)
            .and_then(|limit| limit.trunc().to_u64())
            .unwrap_or(u64::MAX)
            .max(gas_estimate)
    }

    /// Explorer link for a transaction hash.
    pub fn explorer_link(&self, tx_hash: B256) -> String {
        format!("{}{tx_hash:#x}", self.explorer_tx_url)
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

pub struct SwapExecutor {
    chain: Arc<dyn ChainClient>,
    balances: BalanceReader,
    settings: ExecutorSettings,
}

impl SwapExecutor {
    pub fn new(chain: Arc<dyn ChainClient>, owner: Address, settings: ExecutorSettings) -> Self {
        Self {
            balances: BalanceReader::new(chain.clone(), owner),
            chain,
            settings,
        }
    }

    pub fn balances(&self) -> &BalanceReader {
        &self.balances
    }

    /// Execute one swap.
    ///
    /// Rejections before broadcast (amount, balance, estimation) leave
    /// the chain untouched. Once broadcast, only the receipt status
    /// decides success.
    pub async fn execute(&self, request: SwapRequest) -> Result<SwapOutcome, SwapError> {
        let SwapRequest { direction, amount } = request;
        let owner = self.balances.owner();

        let wei = to_wei(amount)
            .filter(|w| !w.is_zero())
            .ok_or(SwapError::InvalidAmount(amount))?;

        // 1. Balance pre-check
        let before = self
            .balances
            .snapshot()
            .await
            .map_err(|e| SwapError::BalanceUnavailable(format!("{e:#}")))?;
        info!(
            native = format!("{:.6}", before.native),
            wrapped = format!("{:.6}", before.wrapped),
            "Balances before swap"
        );

        let available = before.available(direction);
        if available < amount {
            return Err(SwapError::InsufficientBalance {
                asset: direction.source_symbol(),
                needed: amount,
                available,
            });
        }

        // 2. Gas estimate + fee check
        let call = WethCall::for_direction(direction, wei);
        let gas_estimate = self
            .chain
            .estimate_gas(owner, &call)
            .await
            .map_err(|e| SwapError::EstimationFailed(format!("{e:#}")))?;
        let gas_price = self
            .chain
            .gas_price()
            .await
            .map_err(|e| SwapError::EstimationFailed(format!("gas price: {e:#}")))?;
        let estimated_fee = from_wei(U256::from(gas_estimate) * U256::from(gas_price));

        info!(
            gas_estimate,
            gas_price,
            fee = format!("{:.8} {NATIVE_SYMBOL}", estimated_fee),
            "Gas estimated"
        );

        let native_needed = match direction {
            Direction::NativeToWrapped => amount + estimated_fee,
            Direction::WrappedToNative => estimated_fee,
        };
        if before.native < native_needed {
            return Err(SwapError::InsufficientBalance {
                asset: NATIVE_SYMBOL,
                needed: native_needed,
                available: before.native,
            });
        }

        // 3. Build, sign, broadcast
        let nonce = self
            .chain
            .nonce(owner)
            .await
            .map_err(|e| SwapError::SubmissionFailed(format!("nonce: {e:#}")))?;
        let gas_limit = self.settings.gas_limit(gas_estimate);
        let tx = PreparedTx {
            from: owner,
            call,
            gas_limit,
            gas_price,
            nonce,
            chain_id: self.settings.chain_id,
        };

        let tx_hash = self
            .chain
            .send(&tx)
            .await
            .map_err(|e| SwapError::SubmissionFailed(format!("{e:#}")))?;
        let explorer_url = self.settings.explorer_link(tx_hash);
        info!(%tx_hash, url = %explorer_url, nonce, gas_limit, "Transaction sent, waiting for confirmation");

        // 4. Confirmation
        let receipt = self
            .chain
            .wait_for_receipt(tx_hash, self.settings.receipt_timeout)
            .await
            .map_err(|e| SwapError::SubmissionFailed(format!("receipt: {e:#}")))?
            .ok_or(SwapError::ConfirmationTimeout {
                tx_hash,
                timeout_secs: self.settings.receipt_timeout.as_secs(),
            })?;

        if !receipt.success {
            warn!(%tx_hash, block = ?receipt.block_number, "Swap reverted");
            return Err(SwapError::ReceiptFailure { tx_hash });
        }

        info!(
            %tx_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Swap {direction} confirmed"
        );

        // 5. Post-check. A failed read here does not undo a confirmed swap.
        let balances_after = match self.balances.snapshot().await {
            Ok(after) => Some(after),
            Err(e) => {
                warn!(error = %e, "Post-swap balance read failed");
                None
            }
        };

        Ok(SwapOutcome {
            request,
            tx_hash,
            explorer_url,
            gas_estimate,
            gas_limit,
            gas_price,
            estimated_fee,
            block_number: receipt.block_number,
            balances_after,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

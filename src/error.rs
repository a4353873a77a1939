//! Error types.
//!
//! `SwapError` is the per-operation failure of a single wrap/unwrap; it is
//! always reported and never fatal. `ConfigError` covers startup settings
//! and aborts the process before any network use.

use alloy::primitives::{Address, B256};
use rust_decimal::Decimal;

/// Why a single swap did not complete.
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("Invalid amount: {0} (must be a positive number)")]
    InvalidAmount(Decimal),

    #[error("Balance query failed: {0}")]
    BalanceUnavailable(String),

    #[error("Insufficient {asset} balance: need {needed:.8}, have {available:.8}")]
    InsufficientBalance {
        asset: &'static str,
        needed: Decimal,
        available: Decimal,
    },

    #[error("Gas estimation failed: {0}")]
    EstimationFailed(String),

    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    #[error("No receipt for {tx_hash} within {timeout_secs}s")]
    ConfirmationTimeout { tx_hash: B256, timeout_secs: u64 },

    #[error("Transaction {tx_hash} failed on-chain")]
    ReceiptFailure { tx_hash: B256 },
}

/// Discriminant of [`SwapError`], for branching without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapErrorKind {
    InvalidAmount,
    BalanceUnavailable,
    InsufficientBalance,
    EstimationFailed,
    SubmissionFailed,
    ConfirmationTimeout,
    ReceiptFailure,
}

impl SwapError {
    pub fn kind(&self) -> SwapErrorKind {
        match self {
            SwapError::InvalidAmount(_) => SwapErrorKind::InvalidAmount,
            SwapError::BalanceUnavailable(_) => SwapErrorKind::BalanceUnavailable,
            SwapError::InsufficientBalance { .. } => SwapErrorKind::InsufficientBalance,
            SwapError::EstimationFailed(_) => SwapErrorKind::EstimationFailed,
            SwapError::SubmissionFailed(_) => SwapErrorKind::SubmissionFailed,
            SwapError::ConfirmationTimeout { .. } => SwapErrorKind::ConfirmationTimeout,
            SwapError::ReceiptFailure { .. } => SwapErrorKind::ReceiptFailure,
        }
    }

    /// Whether the transaction reached the network. Once broadcast it
    /// cannot be withdrawn, so a timeout may still confirm later.
    pub fn was_broadcast(&self) -> bool {
        matches!(
            self,
            SwapError::ConfirmationTimeout { .. } | SwapError::ReceiptFailure { .. }
        )
    }
}

/// Invalid or missing startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set (add it to the environment or a .env file)")]
    MissingEnv(&'static str),

    #[error("{name} is invalid: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    #[error(
        "ACCOUNT_ADDRESS {configured} does not match the address derived from PRIVATE_KEY ({derived})"
    )]
    AccountMismatch { configured: Address, derived: Address },

    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}

//! Shared types for the WETHBOT.
//!
//! These types form the data model used across all modules: swap
//! direction, balance snapshots, swap requests/outcomes, and the
//! wei ⇄ decimal conversions that sit between the chain and the console.

use alloy::primitives::{B256, U256};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::fmt;

/// Ticker of the chain's native coin.
pub const NATIVE_SYMBOL: &str = "ETH";
/// Ticker of the wrapped token.
pub const WRAPPED_SYMBOL: &str = "WETH";

/// Both ETH and WETH use 18 decimals.
pub const TOKEN_DECIMALS: u32 = 18;

const WEI_PER_UNIT: Decimal = dec!(1_000_000_000_000_000_000);

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way a swap converts funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// ETH → WETH (`deposit()`).
    NativeToWrapped,
    /// WETH → ETH (`withdraw(wad)`).
    WrappedToNative,
}

impl Direction {
    /// The inverse conversion.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::NativeToWrapped => Direction::WrappedToNative,
            Direction::WrappedToNative => Direction::NativeToWrapped,
        }
    }

    /// Ticker of the asset being spent.
    pub fn source_symbol(&self) -> &'static str {
        match self {
            Direction::NativeToWrapped => NATIVE_SYMBOL,
            Direction::WrappedToNative => WRAPPED_SYMBOL,
        }
    }

    /// Ticker of the asset being received.
    pub fn target_symbol(&self) -> &'static str {
        self.opposite().source_symbol()
    }

    /// Parse a menu choice: `1` wraps, `2` unwraps.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Direction::NativeToWrapped),
            "2" => Some(Direction::WrappedToNative),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source_symbol(), self.target_symbol())
    }
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

/// Native and wrapped balances of one address, in whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub native: Decimal,
    pub wrapped: Decimal,
}

impl BalanceSnapshot {
    pub fn new(native: Decimal, wrapped: Decimal) -> Self {
        Self { native, wrapped }
    }

    /// Balance of the asset a swap in `direction` spends.
    pub fn available(&self, direction: Direction) -> Decimal {
        match direction {
            Direction::NativeToWrapped => self.native,
            Direction::WrappedToNative => self.wrapped,
        }
    }

    /// Combined holdings. Wrapping is 1:1, so this only moves by gas fees.
    pub fn total(&self) -> Decimal {
        self.native + self.wrapped
    }
}

impl fmt::Display for BalanceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{NATIVE_SYMBOL}: {:.6} | {WRAPPED_SYMBOL}: {:.6}",
            self.native, self.wrapped
        )
    }
}

// ---------------------------------------------------------------------------
// Swap request / outcome
// ---------------------------------------------------------------------------

/// A single wrap or unwrap of `amount` whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest {
    pub direction: Direction,
    pub amount: Decimal,
}

impl SwapRequest {
    pub fn new(direction: Direction, amount: Decimal) -> Self {
        Self { direction, amount }
    }

    pub fn wrap(amount: Decimal) -> Self {
        Self::new(Direction::NativeToWrapped, amount)
    }

    pub fn unwrap(amount: Decimal) -> Self {
        Self::new(Direction::WrappedToNative, amount)
    }
}

impl fmt::Display for SwapRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.amount,
            self.direction.source_symbol(),
            self.direction
        )
    }
}

/// A confirmed, successful swap.
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub request: SwapRequest,
    pub tx_hash: B256,
    pub explorer_url: String,
    pub gas_estimate: u64,
    pub gas_limit: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    /// `gas_estimate × gas_price`, in whole native units.
    pub estimated_fee: Decimal,
    pub block_number: Option<u64>,
    /// Post-swap balances; `None` if the follow-up read failed.
    pub balances_after: Option<BalanceSnapshot>,
}

// ---------------------------------------------------------------------------
// Unit conversion
// ---------------------------------------------------------------------------

/// Convert whole units to wei, truncating anything below 1 wei.
///
/// Returns `None` for negative amounts or values that do not fit.
pub fn to_wei(amount: Decimal) -> Option<U256> {
    if amount.is_sign_negative() {
        return None;
    }
    let wei = amount.checked_mul(WEI_PER_UNIT)?.trunc();
    wei.to_u128().map(U256::from)
}

/// Convert wei to whole units.
///
/// Saturates at `Decimal::MAX` (≈7.9e10 units), far above any real balance.
pub fn from_wei(wei: U256) -> Decimal {
    u128::try_from(wei)
        .ok()
        .and_then(|w| i128::try_from(w).ok())
        .and_then(|w| Decimal::try_from_i128_with_scale(w, TOKEN_DECIMALS).ok())
        .map(|d| d.normalize())
        .unwrap_or(Decimal::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

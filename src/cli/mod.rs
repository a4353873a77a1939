//! Console front end: the interactive menu, one-shot commands, and the
//! human-readable status lines both print.

pub mod commands;
pub mod input;
pub mod interrupt;
pub mod menu;

use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

use crate::engine::controller::{IterationReport, LoopSettings, LoopSummary, StopReason};
use crate::error::SwapError;
use crate::types::{BalanceSnapshot, SwapOutcome, NATIVE_SYMBOL, WRAPPED_SYMBOL};

pub(crate) const RULE: &str = "==================================================";

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a positive amount, accepting plain (`0.01`) or scientific
/// (`1e-2`) notation.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let input = input.trim();
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .ok()
        .filter(|d| *d > Decimal::ZERO)
}

/// Parse a non-negative delay in (fractional) seconds.
pub fn parse_delay(input: &str) -> Option<Duration> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

pub fn print_balances(snapshot: &BalanceSnapshot) {
    println!("\n💰 Current balances:");
    println!("   {NATIVE_SYMBOL}:  {:.6}", snapshot.native);
    println!("   {WRAPPED_SYMBOL}: {:.6}", snapshot.wrapped);
    println!("   Total: {:.6}", snapshot.total());
}

pub fn print_swap_result(result: &Result<SwapOutcome, SwapError>) {
    match result {
        Ok(outcome) => {
            println!(
                "✅ {} {} swapped ({})",
                outcome.request.amount,
                outcome.request.direction.source_symbol(),
                outcome.request.direction
            );
            println!("   tx:  {}", outcome.explorer_url);
            println!(
                "   gas: estimate {} / limit {} — fee ≈ {:.8} {NATIVE_SYMBOL}",
                outcome.gas_estimate, outcome.gas_limit, outcome.estimated_fee
            );
            if let Some(after) = &outcome.balances_after {
                println!("   new balances — {after}");
            }
        }
        Err(e) => {
            println!("❌ {e}");
            if let SwapError::ConfirmationTimeout { .. } = e {
                println!("   The transaction was broadcast and may still confirm later.");
            }
        }
    }
}

pub fn print_loop_settings(settings: &LoopSettings) {
    println!("\n⚙️  Configuration:");
    println!("   Amount: {}", settings.amount);
    println!("   Delay:  {} s", settings.delay.as_secs_f64());
    println!("   Mode:   {}", settings.mode);
    println!("🛑 Press Ctrl+C to stop");
    println!("{RULE}");
}

pub fn print_iteration(report: &IterationReport) {
    println!(
        "\n🔄 Iteration #{} — {}",
        report.iteration,
        report.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("   balances — {}", report.snapshot);
    for direction in &report.skipped {
        println!("   ⏭  {direction}: balance too low, skipped");
    }
    for attempt in &report.attempts {
        if attempt.fallback {
            println!("   ↩  falling back to {}", attempt.direction);
        }
        print_swap_result(&attempt.result);
    }
}

pub fn print_summary(summary: &LoopSummary) {
    match &summary.stop {
        StopReason::Interrupted => println!("\n🛑 Bot stopped by user"),
        StopReason::IterationLimit => println!("\n🏁 Iteration limit reached"),
        StopReason::Fault(msg) => println!("\n❌ Loop stopped: {msg}"),
    }
    println!(
        "   {} iterations, {} swaps succeeded, {} failed",
        summary.iterations, summary.swaps_succeeded, summary.swaps_failed
    );
}

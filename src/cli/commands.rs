//! Non-interactive commands.

use anyhow::{bail, Result};
use tracing::warn;

use super::interrupt::Interrupts;
use super::{print_balances, print_iteration, print_loop_settings, print_summary, print_swap_result};
use crate::engine::controller::{LoopController, LoopMode, LoopSettings, LoopSummary, StopReason};
use crate::engine::executor::SwapExecutor;
use crate::types::SwapRequest;

/// Print balances once.
pub async fn balance(executor: &SwapExecutor) -> Result<()> {
    let snapshot = executor.balances().snapshot().await?;
    print_balances(&snapshot);
    Ok(())
}

/// Run one swap. A failed swap is an error so the exit code reflects it.
pub async fn swap(executor: &SwapExecutor, request: SwapRequest) -> Result<()> {
    println!("🔧 {request}");
    let result = executor.execute(request).await;
    print_swap_result(&result);
    if let Err(e) = result {
        bail!(e);
    }
    Ok(())
}

/// Run the auto-swap loop until Ctrl+C, the iteration cap, or a fault.
/// `mode` follows the menu's rules: unknown values mean alternating.
pub async fn auto(
    executor: &SwapExecutor,
    settings: LoopSettings,
    mut interrupts: Interrupts,
) -> Result<LoopSummary> {
    print_loop_settings(&settings);
    interrupts.reset();

    let controller = LoopController::new(executor, settings);
    let summary = controller
        .run(async move { interrupts.recv().await }, print_iteration)
        .await;
    print_summary(&summary);

    if let StopReason::Fault(msg) = &summary.stop {
        bail!("auto-swap loop stopped: {msg}");
    }
    Ok(summary)
}

/// Resolve a mode string for the `auto` command.
pub fn resolve_mode(input: &str) -> LoopMode {
    LoopMode::from_choice(input).unwrap_or_else(|| {
        warn!(input, "Unknown mode, using alternating");
        LoopMode::Alternate
    })
}

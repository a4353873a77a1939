//! End-to-end swap and loop behaviour against the in-memory chain.

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

use wethbot::chain::WethCall;
use wethbot::engine::controller::{LoopController, LoopMode, LoopSettings, StopReason};
use wethbot::engine::executor::{ExecutorSettings, SwapExecutor};
use wethbot::error::SwapErrorKind;
use wethbot::types::{Direction, SwapRequest};

use crate::mock_chain::MockChain;

fn executor(chain: &MockChain) -> SwapExecutor {
    SwapExecutor::new(
        Arc::new(chain.clone()),
        Address::repeat_byte(0x11),
        ExecutorSettings::default(),
    )
}

fn settings(mode: LoopMode, iterations: u64) -> LoopSettings {
    LoopSettings {
        amount: dec!(0.1),
        delay: Duration::ZERO,
        mode,
        max_iterations: Some(iterations),
    }
}

#[tokio::test]
async fn test_wrap_moves_amount_and_charges_fee() {
    let chain = MockChain::new(dec!(1), dec!(0));
    let outcome = executor(&chain)
        .execute(SwapRequest::wrap(dec!(0.25)))
        .await
        .unwrap();

    let after = chain.balances();
    assert_eq!(after.native, dec!(1) - dec!(0.25) - MockChain::fee());
    assert_eq!(after.wrapped, dec!(0.25));
    assert_eq!(outcome.balances_after, Some(after));
    assert_eq!(outcome.estimated_fee, MockChain::fee());

    let sent = chain.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].call.value(), U256::from(250_000_000_000_000_000u128));
    assert_eq!(sent[0].gas_limit, 36_000);
    assert_eq!(sent[0].chain_id, 8453);
}

#[tokio::test]
async fn test_unwrap_returns_native_net_of_fee() {
    let chain = MockChain::new(dec!(0.01), dec!(0.5));
    executor(&chain)
        .execute(SwapRequest::unwrap(dec!(0.5)))
        .await
        .unwrap();

    let after = chain.balances();
    assert_eq!(after.wrapped, Decimal::ZERO);
    assert_eq!(after.native, dec!(0.51) - MockChain::fee());
    assert!(matches!(chain.sent()[0].call, WethCall::Withdraw { .. }));
}

#[tokio::test]
async fn test_amount_above_balance_is_never_submitted() {
    let chain = MockChain::new(dec!(0.05), dec!(0.05));
    let exec = executor(&chain);

    for request in [SwapRequest::wrap(dec!(0.06)), SwapRequest::unwrap(dec!(0.06))] {
        let err = exec.execute(request).await.unwrap_err();
        assert_eq!(err.kind(), SwapErrorKind::InsufficientBalance);
    }
    assert!(chain.sent().is_empty());
    assert_eq!(chain.balances().native, dec!(0.05));
}

#[tokio::test]
async fn test_wrapping_entire_balance_leaves_nothing_for_gas() {
    let chain = MockChain::new(dec!(0.1), dec!(0));
    let err = executor(&chain)
        .execute(SwapRequest::wrap(dec!(0.1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), SwapErrorKind::InsufficientBalance);
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_forced_revert_reports_failure() {
    let chain = MockChain::new(dec!(1), dec!(0));
    chain.set_revert(true);

    let err = executor(&chain)
        .execute(SwapRequest::wrap(dec!(0.1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), SwapErrorKind::ReceiptFailure);

    // Broadcast once; only the fee was spent.
    assert_eq!(chain.sent().len(), 1);
    let after = chain.balances();
    assert_eq!(after.native, dec!(1) - MockChain::fee());
    assert_eq!(after.wrapped, Decimal::ZERO);
}

#[tokio::test]
async fn test_missing_receipt_is_a_timeout() {
    let chain = MockChain::new(dec!(1), dec!(0));
    chain.set_withhold_receipts(true);

    let err = executor(&chain)
        .execute(SwapRequest::wrap(dec!(0.1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), SwapErrorKind::ConfirmationTimeout);
    assert!(err.was_broadcast());
}

#[tokio::test]
async fn test_estimation_failure_is_not_submitted() {
    let chain = MockChain::new(dec!(1), dec!(1));
    chain.set_estimate_error("execution reverted: paused");

    let err = executor(&chain)
        .execute(SwapRequest::unwrap(dec!(0.1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), SwapErrorKind::EstimationFailed);
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_round_trip_restores_split_within_fees() {
    let chain = MockChain::new(dec!(1), dec!(0.5));
    let before = chain.balances();
    let exec = executor(&chain);

    exec.execute(SwapRequest::wrap(dec!(0.3))).await.unwrap();
    exec.execute(SwapRequest::unwrap(dec!(0.3))).await.unwrap();

    let after = chain.balances();
    assert_eq!(after.wrapped, before.wrapped);
    let lost = before.native - after.native;
    assert_eq!(lost, MockChain::fee() * dec!(2));
    assert!(lost < dec!(0.001));
}

#[tokio::test]
async fn test_consecutive_swaps_use_increasing_nonces() {
    let chain = MockChain::new(dec!(1), dec!(1));
    let exec = executor(&chain);
    for _ in 0..3 {
        exec.execute(SwapRequest::wrap(dec!(0.01))).await.unwrap();
    }
    let nonces: Vec<u64> = chain.sent().iter().map(|tx| tx.nonce).collect();
    assert_eq!(nonces, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_alternating_loop_oscillates() {
    // Start above the amount on both sides so every primary is eligible.
    let chain = MockChain::new(dec!(1), dec!(0.05));
    let exec = executor(&chain);
    let controller = LoopController::new(&exec, settings(LoopMode::Alternate, 4));

    let summary = controller.run(std::future::pending::<()>(), |_| {}).await;
    assert_eq!(summary.stop, StopReason::IterationLimit);
    assert_eq!(summary.swaps_succeeded, 4);

    let calls: Vec<bool> = chain
        .sent()
        .iter()
        .map(|tx| matches!(tx.call, WethCall::Deposit { .. }))
        .collect();
    assert_eq!(calls, vec![true, false, true, false]);
    assert_eq!(chain.balances().wrapped, dec!(0.05));
}

#[tokio::test]
async fn test_alternating_even_iteration_falls_back_to_wrap() {
    // No WETH at all: iteration 2 cannot unwrap and wraps instead.
    let chain = MockChain::new(dec!(1), dec!(0));
    let exec = executor(&chain);
    let controller = LoopController::new(&exec, settings(LoopMode::Alternate, 1));

    let report = controller.run_iteration(2).await.unwrap();
    assert_eq!(report.skipped, vec![Direction::WrappedToNative]);
    assert_eq!(report.attempts.len(), 1);
    assert_eq!(report.attempts[0].direction, Direction::NativeToWrapped);
    assert!(report.attempts[0].fallback);
    assert!(report.attempts[0].result.is_ok());
}

#[tokio::test]
async fn test_fallback_uses_iteration_start_snapshot() {
    // Iteration 1: the wrap reverts and the snapshot held no WETH, so
    // there is no fallback unwrap.
    let chain = MockChain::new(dec!(1), dec!(0));
    chain.set_revert(true);
    let exec = executor(&chain);
    let controller = LoopController::new(&exec, settings(LoopMode::Alternate, 1));

    let report = controller.run_iteration(1).await.unwrap();
    assert_eq!(report.attempts.len(), 1);
    assert_eq!(report.skipped, vec![Direction::WrappedToNative]);
    assert_eq!(chain.sent().len(), 1);
}

#[tokio::test]
async fn test_wrap_only_loop_stops_wrapping_when_funds_run_low() {
    let chain = MockChain::new(dec!(0.35), dec!(0));
    let exec = executor(&chain);
    let controller = LoopController::new(&exec, settings(LoopMode::WrapOnly, 5));

    let summary = controller.run(std::future::pending::<()>(), |_| {}).await;
    // 0.35 → 0.25 → 0.15 → 0.05 (minus fees); the last two iterations skip.
    assert_eq!(summary.iterations, 5);
    assert_eq!(summary.swaps_succeeded, 3);
    assert_eq!(summary.swaps_failed, 0);
    assert_eq!(chain.sent().len(), 3);
}

#[tokio::test]
async fn test_loop_ends_when_balance_read_fails() {
    let chain = MockChain::new(dec!(1), dec!(1));
    chain.set_balance_error("connection reset");
    let exec = executor(&chain);
    let controller = LoopController::new(&exec, settings(LoopMode::Alternate, 10));

    let summary = controller.run(std::future::pending::<()>(), |_| {}).await;
    assert!(matches!(summary.stop, StopReason::Fault(_)));
    assert_eq!(summary.iterations, 0);
    assert!(chain.sent().is_empty());
}

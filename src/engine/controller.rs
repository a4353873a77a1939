//! Loop controller.
//!
//! Repeats swaps under a fixed strategy with a fixed delay until the
//! caller's interrupt future resolves. Each iteration reads one balance
//! snapshot up front and decides every attempt in that iteration from
//! it, including the alternating mode's fallback.

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::engine::executor::SwapExecutor;
use crate::error::SwapError;
use crate::types::{BalanceSnapshot, Direction, SwapOutcome, SwapRequest};

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Swap strategy, fixed for the life of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopMode {
    /// Mode 1: only wrap.
    WrapOnly,
    /// Mode 2: only unwrap.
    UnwrapOnly,
    /// Mode 3: wrap on odd iterations, unwrap on even ones, with a
    /// single opposite-direction fallback.
    Alternate,
}

impl LoopMode {
    /// Parse a menu choice (`1`, `2`, `3`).
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(LoopMode::WrapOnly),
            "2" => Some(LoopMode::UnwrapOnly),
            "3" => Some(LoopMode::Alternate),
            _ => None,
        }
    }

    /// Parse a menu choice; anything unrecognised means [`LoopMode::Alternate`].
    pub fn parse_or_alternate(choice: &str) -> Self {
        Self::from_choice(choice).unwrap_or(LoopMode::Alternate)
    }

    /// Direction attempted first on the given (1-based) iteration.
    pub fn primary(&self, iteration: u64) -> Direction {
        match self {
            LoopMode::WrapOnly => Direction::NativeToWrapped,
            LoopMode::UnwrapOnly => Direction::WrappedToNative,
            LoopMode::Alternate if iteration % 2 == 1 => Direction::NativeToWrapped,
            LoopMode::Alternate => Direction::WrappedToNative,
        }
    }

    pub fn has_fallback(&self) -> bool {
        matches!(self, LoopMode::Alternate)
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopMode::WrapOnly => write!(f, "ETH → WETH only"),
            LoopMode::UnwrapOnly => write!(f, "WETH → ETH only"),
            LoopMode::Alternate => write!(f, "alternating"),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings and reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub amount: Decimal,
    pub delay: Duration,
    pub mode: LoopMode,
    /// Stop after this many iterations; `None` runs until interrupted.
    pub max_iterations: Option<u64>,
}

/// One swap attempted within an iteration.
#[derive(Debug)]
pub struct Attempt {
    pub direction: Direction,
    pub fallback: bool,
    pub result: Result<SwapOutcome, SwapError>,
}

/// What happened in one iteration.
#[derive(Debug)]
pub struct IterationReport {
    pub iteration: u64,
    pub started_at: DateTime<Local>,
    pub snapshot: BalanceSnapshot,
    pub attempts: Vec<Attempt>,
    /// Directions skipped because the snapshot balance was too low.
    pub skipped: Vec<Direction>,
}

impl IterationReport {
    pub fn succeeded(&self) -> bool {
        self.attempts.iter().any(|a| a.result.is_ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    Interrupted,
    IterationLimit,
    /// An iteration could not start; the loop is not resumed.
    Fault(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub iterations: u64,
    pub swaps_succeeded: u64,
    pub swaps_failed: u64,
    pub stop: StopReason,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct LoopController<'a> {
    executor: &'a SwapExecutor,
    settings: LoopSettings,
}

impl<'a> LoopController<'a> {
    pub fn new(executor: &'a SwapExecutor, settings: LoopSettings) -> Self {
        Self { executor, settings }
    }

    /// A direction is eligible only when the snapshot holds strictly more
    /// than the swap amount.
    fn eligible(&self, snapshot: &BalanceSnapshot, direction: Direction) -> bool {
        snapshot.available(direction) > self.settings.amount
    }

    async fn attempt(&self, direction: Direction, fallback: bool) -> Attempt {
        let request = SwapRequest::new(direction, self.settings.amount);
        let result = self.executor.execute(request).await;
        if let Err(e) = &result {
            warn!(%direction, fallback, kind = ?e.kind(), error = %e, "Swap attempt failed");
        }
        Attempt {
            direction,
            fallback,
            result,
        }
    }

    /// Run one iteration. Errors only if the opening balance read fails.
    pub async fn run_iteration(&self, iteration: u64) -> anyhow::Result<IterationReport> {
        let started_at = Local::now();
        let snapshot = self.executor.balances().snapshot().await?;
        info!(
            iteration,
            native = format!("{:.6}", snapshot.native),
            wrapped = format!("{:.6}", snapshot.wrapped),
            "Iteration start"
        );

        let mut report = IterationReport {
            iteration,
            started_at,
            snapshot,
            attempts: Vec::new(),
            skipped: Vec::new(),
        };

        let primary = self.settings.mode.primary(iteration);
        let primary_ok = if self.eligible(&snapshot, primary) {
            let attempt = self.attempt(primary, false).await;
            let ok = attempt.result.is_ok();
            report.attempts.push(attempt);
            ok
        } else {
            info!(direction = %primary, "Balance too low, skipping");
            report.skipped.push(primary);
            false
        };

        if !primary_ok && self.settings.mode.has_fallback() {
            // Decided from the iteration-start snapshot, not a fresh read.
            let fallback = primary.opposite();
            if self.eligible(&snapshot, fallback) {
                info!(direction = %fallback, "Trying opposite direction");
                let attempt = self.attempt(fallback, true).await;
                report.attempts.push(attempt);
            } else {
                report.skipped.push(fallback);
            }
        }

        Ok(report)
    }

    /// Loop until `interrupt` resolves, the iteration limit is reached,
    /// or an iteration cannot start.
    ///
    /// `interrupt` is only observed between iterations and during the
    /// delay; a swap in progress always runs to completion.
    /// `on_iteration` sees each report as it completes.
    pub async fn run<F, R>(&self, interrupt: F, mut on_iteration: R) -> LoopSummary
    where
        F: Future<Output = ()>,
        R: FnMut(&IterationReport),
    {
        tokio::pin!(interrupt);

        let mut summary = LoopSummary {
            iterations: 0,
            swaps_succeeded: 0,
            swaps_failed: 0,
            stop: StopReason::Interrupted,
        };

        info!(
            amount = %self.settings.amount,
            delay_secs = self.settings.delay.as_secs_f64(),
            mode = %self.settings.mode,
            "Auto-swap loop started"
        );

        loop {
            if self
                .settings
                .max_iterations
                .is_some_and(|max| summary.iterations >= max)
            {
                summary.stop = StopReason::IterationLimit;
                break;
            }

            let iteration = summary.iterations + 1;
            match self.run_iteration(iteration).await {
                Ok(report) => {
                    summary.iterations = iteration;
                    for attempt in &report.attempts {
                        if attempt.result.is_ok() {
                            summary.swaps_succeeded += 1;
                        } else {
                            summary.swaps_failed += 1;
                        }
                    }
                    on_iteration(&report);
                }
                Err(e) => {
                    error!(iteration, error = %format!("{e:#}"), "Iteration failed, stopping loop");
                    summary.stop = StopReason::Fault(format!("{e:#}"));
                    break;
                }
            }

            if self
                .settings
                .max_iterations
                .is_some_and(|max| summary.iterations >= max)
            {
                summary.stop = StopReason::IterationLimit;
                break;
            }

            tokio::select! {
                biased;
                _ = &mut interrupt => {
                    summary.stop = StopReason::Interrupted;
                    break;
                }
                _ = tokio::time::sleep(self.settings.delay) => {}
            }
        }

        info!(
            iterations = summary.iterations,
            succeeded = summary.swaps_succeeded,
            failed = summary.swaps_failed,
            stop = ?summary.stop,
            "Auto-swap loop stopped"
        );
        summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

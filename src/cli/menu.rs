//! Interactive menu.
//!
//! Four choices: auto-swap loop, single manual swap, balance check, exit.
//! Invalid choices re-prompt. Ctrl+C or end of input at any prompt exits
//! the menu; Ctrl+C during the auto loop only stops the loop.

use anyhow::Result;
use tracing::warn;

use super::input::InputSource;
use super::interrupt::Interrupts;
use super::{
    parse_amount, parse_delay, print_balances, print_iteration, print_loop_settings,
    print_summary, print_swap_result, RULE,
};
use crate::engine::controller::{LoopController, LoopMode, LoopSettings};
use crate::engine::executor::SwapExecutor;
use crate::types::{Direction, SwapRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AutoLoop,
    ManualSwap,
    CheckBalance,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::AutoLoop),
            "2" => Some(MenuChoice::ManualSwap),
            "3" => Some(MenuChoice::CheckBalance),
            "4" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Whether the menu keeps running after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Menu<'a, I: InputSource> {
    executor: &'a SwapExecutor,
    input: I,
    interrupts: Interrupts,
}

impl<'a, I: InputSource> Menu<'a, I> {
    pub fn new(executor: &'a SwapExecutor, input: I, interrupts: Interrupts) -> Self {
        Self {
            executor,
            input,
            interrupts,
        }
    }

    /// Give back the input source (tests inspect what was consumed).
    pub fn into_input(self) -> I {
        self.input
    }

    /// Run until the user exits. Only input I/O errors are returned.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            println!("\n{RULE}");
            println!("🤖 ETH/WETH SWAP BOT — BASE NETWORK");
            println!("{RULE}");
            println!("1. Auto swap (continuous loop)");
            println!("2. Manual swap (single)");
            println!("3. Check balance");
            println!("4. Exit");

            let Some(choice) = self.ask("\nChoose (1-4): ").await? else {
                println!("\n👋 Stopped");
                return Ok(());
            };

            let flow = match MenuChoice::parse(&choice) {
                Some(MenuChoice::AutoLoop) => self.auto_loop().await?,
                Some(MenuChoice::ManualSwap) => self.manual_swap().await?,
                Some(MenuChoice::CheckBalance) => {
                    self.check_balance().await;
                    Flow::Continue
                }
                Some(MenuChoice::Exit) => {
                    println!("👋 Goodbye!");
                    return Ok(());
                }
                None => {
                    println!("❌ Invalid choice");
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                println!("\n👋 Stopped");
                return Ok(());
            }
        }
    }

    /// Prompt for one line. `None` when input ended or Ctrl+C was pressed.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        tokio::select! {
            biased;
            _ = self.interrupts.recv() => Ok(None),
            line = self.input.read_line(prompt) => line,
        }
    }

    async fn check_balance(&self) {
        match self.executor.balances().snapshot().await {
            Ok(snapshot) => print_balances(&snapshot),
            Err(e) => println!("❌ Balance check failed: {e:#}"),
        }
    }

    async fn manual_swap(&mut self) -> Result<Flow> {
        println!("\n{RULE}");
        println!("🔧 MANUAL SWAP");
        println!("{RULE}");
        self.check_balance().await;

        let Some(direction) = self.ask("Direction (1: ETH→WETH, 2: WETH→ETH): ").await? else {
            return Ok(Flow::Quit);
        };
        let Some(amount) = self.ask("Amount: ").await? else {
            return Ok(Flow::Quit);
        };

        let Some(amount) = parse_amount(&amount) else {
            println!("❌ Amount must be a positive number");
            return Ok(Flow::Continue);
        };
        let Some(direction) = Direction::from_choice(&direction) else {
            println!("❌ Invalid choice");
            return Ok(Flow::Continue);
        };

        let result = self.executor.execute(SwapRequest::new(direction, amount)).await;
        print_swap_result(&result);
        Ok(Flow::Continue)
    }

    async fn auto_loop(&mut self) -> Result<Flow> {
        println!("\n{RULE}");
        println!("🤖 AUTO SWAP ETH ⇄ WETH");
        println!("{RULE}");

        let Some(amount) = self.ask("Amount per swap: ").await? else {
            return Ok(Flow::Quit);
        };
        let Some(delay) = self.ask("Delay between swaps (seconds): ").await? else {
            return Ok(Flow::Quit);
        };
        let Some(mode) = self
            .ask("Mode (1: ETH→WETH, 2: WETH→ETH, 3: alternate): ")
            .await?
        else {
            return Ok(Flow::Quit);
        };

        let (Some(amount), Some(delay)) = (parse_amount(&amount), parse_delay(&delay)) else {
            println!("❌ Invalid input: amount and delay must be numbers");
            return Ok(Flow::Continue);
        };
        let mode = LoopMode::from_choice(&mode).unwrap_or_else(|| {
            warn!(input = %mode, "Unknown mode, using alternating");
            println!("❌ Invalid mode, using alternating mode (3)");
            LoopMode::Alternate
        });

        let settings = LoopSettings {
            amount,
            delay,
            mode,
            max_iterations: None,
        };
        print_loop_settings(&settings);

        self.interrupts.reset();
        let mut stop = self.interrupts.clone();
        let controller = LoopController::new(self.executor, settings);
        let summary = controller
            .run(async move { stop.recv().await }, print_iteration)
            .await;
        // The press that stopped the loop must not also close the menu.
        self.interrupts.reset();

        print_summary(&summary);
        Ok(Flow::Continue)
    }
}

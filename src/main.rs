//! WETHBOT — ETH ⇄ WETH wrap/unwrap automation bot for Base.
//!
//! Entry point. Loads the environment and configuration, initialises
//! structured logging, connects to the chain, and then either runs the
//! interactive menu or a single non-interactive command.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use wethbot::chain::alloy_client::AlloyChainClient;
use wethbot::cli::commands;
use wethbot::cli::input::StdinInput;
use wethbot::cli::interrupt::Interrupts;
use wethbot::cli::menu::Menu;
use wethbot::cli::{parse_amount, parse_delay};
use wethbot::config::{Account, AppConfig};
use wethbot::engine::controller::LoopSettings;
use wethbot::engine::executor::{ExecutorSettings, SwapExecutor};
use wethbot::types::SwapRequest;

const BANNER: &str = r#"
 __        _______ _____ _   _ ____   ___ _____
 \ \      / / ____|_   _| | | | __ ) / _ \_   _|
  \ \ /\ / /|  _|   | | | |_| |  _ \| | | || |
   \ V  V / | |___  | | |  _  | |_) | |_| || |
    \_/\_/  |_____| |_| |_| |_|____/ \___/ |_|

  ETH ⇄ WETH wrap/unwrap bot — Base network
"#;

#[derive(Parser, Debug)]
#[command(name = "wethbot", version)]
#[command(about = "Wrap and unwrap ETH ⇄ WETH on Base, once or in a loop")]
struct Cli {
    /// Optional TOML config file (Base mainnet defaults if missing)
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (default)
    Menu,
    /// Print ETH and WETH balances
    Balance,
    /// Wrap AMOUNT ETH into WETH
    Wrap {
        #[arg(value_parser = amount_arg)]
        amount: Decimal,
    },
    /// Unwrap AMOUNT WETH into ETH
    Unwrap {
        #[arg(value_parser = amount_arg)]
        amount: Decimal,
    },
    /// Swap repeatedly until Ctrl+C
    Auto {
        /// Amount per swap
        #[arg(long, value_parser = amount_arg)]
        amount: Decimal,
        /// Seconds to wait between swaps
        #[arg(long, value_parser = delay_arg)]
        delay: Duration,
        /// 1: ETH→WETH, 2: WETH→ETH, 3: alternate (anything else: alternate)
        #[arg(long, default_value = "3")]
        mode: String,
        /// Stop after this many iterations
        #[arg(long)]
        iterations: Option<u64>,
    },
}

fn amount_arg(s: &str) -> Result<Decimal, String> {
    parse_amount(s).ok_or_else(|| format!("'{s}' is not a positive number"))
}

fn delay_arg(s: &str) -> Result<Duration, String> {
    parse_delay(s).ok_or_else(|| format!("'{s}' is not a non-negative number of seconds"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    init_logging();
    let interrupts = Interrupts::listen();

    let cfg = AppConfig::load(&cli.config)?;

    // Secrets are checked before any network use.
    let account = Account::from_env()?;

    println!("{BANNER}");
    info!(
        address = %account.address(),
        rpc = %cfg.network.rpc_url,
        chain_id = cfg.network.chain_id,
        "WETHBOT starting up"
    );

    let chain = AlloyChainClient::connect(
        &cfg.network,
        &account,
        cfg.swap.receipt_poll_interval(),
    )
    .await?;
    println!("✅ Connected to Base (chain {})", cfg.network.chain_id);

    let executor = SwapExecutor::new(
        Arc::new(chain),
        account.address(),
        ExecutorSettings::from_config(&cfg),
    );

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let mut menu = Menu::new(&executor, StdinInput::new(), interrupts);
            menu.run().await?;
        }
        Command::Balance => commands::balance(&executor).await?,
        Command::Wrap { amount } => commands::swap(&executor, SwapRequest::wrap(amount)).await?,
        Command::Unwrap { amount } => {
            commands::swap(&executor, SwapRequest::unwrap(amount)).await?
        }
        Command::Auto {
            amount,
            delay,
            mode,
            iterations,
        } => {
            let settings = LoopSettings {
                amount,
                delay,
                mode: commands::resolve_mode(&mode),
                max_iterations: iterations,
            };
            commands::auto(&executor, settings, interrupts).await?;
        }
    }

    info!("WETHBOT shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wethbot=info"));

    let json_logging = std::env::var("WETHBOT_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

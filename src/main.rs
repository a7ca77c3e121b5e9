//! SPL token airdrop (v1)
//!
//! Distributes a token from one sender to every row of a recipient list.
//!
//! # Architecture Overview
//!
//! ```text
//!   airdrop.csv ──▶ recipients ──▶ orchestrator ──▶ batch builder
//!                                       │                │ bundle full
//!                                       │                ▼
//!                                       │      rate-limited executor ──▶ Solana RPC
//!                                       ▼                │
//!                                 results.csv ◀──────────┘ one row per recipient
//! ```
//!
//! Setup errors (config, key file, mint, recipient list) abort before any
//! submission. Everything after that is recorded per recipient.

use clap::Parser;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use token_airdrop::airdrop::balance::{print_token_balances, sample_recipients};
use token_airdrop::airdrop::{read_recipients, Orchestrator, RateLimitedExecutor, ResultLedger};
use token_airdrop::blockchain::{LedgerClient, SolanaLedgerClient, Wallet};
use token_airdrop::config::load_config;
use token_airdrop::observability::{logging, metrics};
use token_airdrop::resilience::{RetryPolicy, TokioSleeper};

#[derive(Parser)]
#[command(name = "token-airdrop")]
#[command(about = "Distribute an SPL token to a list of recipients", long_about = None)]
struct Cli {
    /// Configuration file (TOML, or JSON with a .json extension).
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Skip the balance summaries before and after the run.
    #[arg(long)]
    skip_balance_check: bool,

    /// Skip recipients that already have a success row in the result ledger.
    #[arg(long)]
    resume: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if cli.resume {
        config.resume.skip_succeeded = true;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("token-airdrop v0.1.0 starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let wallet = Arc::new(Wallet::from_file(Path::new(&config.sender_wallet_path))?);
    let mint = Pubkey::from_str(&config.token_address)
        .map_err(|e| format!("Invalid token address '{}': {}", config.token_address, e))?;
    let recipients = read_recipients(&config.input_csv_path)?;

    let already_paid = if config.resume.skip_succeeded {
        ResultLedger::succeeded_addresses(&config.output_csv_path)?
    } else {
        HashSet::new()
    };
    let results = ResultLedger::open(&config.output_csv_path)?;

    let ledger: Arc<dyn LedgerClient> = Arc::new(SolanaLedgerClient::new(&config.rpc_url));
    let executor = RateLimitedExecutor::new(
        ledger,
        &config.limits,
        RetryPolicy::from_config(&config.retry),
        Arc::new(TokioSleeper),
    );

    let check_balances = config.balance_check.enabled && !cli.skip_balance_check;
    println!("Sender public key: {}", wallet.pubkey());
    if check_balances {
        println!("Checking sender's token balance before airdrop:");
        print_token_balances(&executor, &wallet.pubkey(), &mint, config.token_decimals).await;
    }

    println!("Starting airdrop...");
    let mut orchestrator = Orchestrator::new(&config, executor.clone(), wallet.clone(), mint, results)
        .skip_addresses(already_paid);
    let summary = orchestrator.run(recipients.clone()).await?;

    println!(
        "Airdrop completed! {} succeeded, {} failed, {} skipped in {} bundles. Results written to {}",
        summary.succeeded, summary.failed, summary.skipped, summary.bundles, config.output_csv_path
    );

    if check_balances {
        println!("Checking sender's token balance after airdrop:");
        print_token_balances(&executor, &wallet.pubkey(), &mint, config.token_decimals).await;

        let sample = sample_recipients(
            &recipients,
            config.balance_check.sample_recipients,
            &mut rand::thread_rng(),
        );
        for (i, owner) in sample.iter().enumerate() {
            println!("Checking token balance of random recipient {}:", i + 1);
            print_token_balances(&executor, owner, &mint, config.token_decimals).await;
        }
    }

    Ok(())
}

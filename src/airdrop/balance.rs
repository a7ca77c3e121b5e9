//! Balance summaries printed around a run.

use rand::seq::SliceRandom;
use rand::Rng;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::airdrop::executor::RateLimitedExecutor;
use crate::airdrop::types::{format_amount, TransferRequest};

/// Print every `mint` token account of `owner` with its balance.
///
/// Display only: lookup failures are printed, never propagated.
pub async fn print_token_balances(
    executor: &RateLimitedExecutor,
    owner: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
) {
    println!("Checking balance for wallet: {}", owner);
    println!("Token address: {}", mint);

    let balances = match executor.token_balances(owner, mint).await {
        Ok(balances) => balances,
        Err(e) => {
            tracing::warn!(owner = %owner, error = %e, "Balance lookup failed");
            println!("Error checking token balance: {}", e);
            return;
        }
    };

    if balances.is_empty() {
        println!("No token accounts found for this wallet and token.");
        return;
    }

    for (i, balance) in balances.iter().enumerate() {
        println!("Token account {}:", i + 1);
        println!("  Address: {}", balance.account);
        println!("  Balance: {} tokens", format_amount(balance.amount, decimals));
    }
}

/// Up to `count` distinct recipients with parseable addresses, chosen at random.
pub fn sample_recipients<R: Rng + ?Sized>(
    recipients: &[TransferRequest],
    count: usize,
    rng: &mut R,
) -> Vec<Pubkey> {
    let valid: Vec<Pubkey> = recipients
        .iter()
        .filter_map(|r| Pubkey::from_str(&r.address).ok())
        .collect();

    valid.choose_multiple(rng, count).copied().collect()
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for an airdrop run.
//! All types derive Serde traits for deserialization from config files.
//! The camelCase aliases keep older `config.json` files loadable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for an airdrop run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AirdropConfig {
    /// Solana JSON-RPC endpoint URL.
    #[serde(alias = "rpcUrl")]
    pub rpc_url: String,

    /// Path to the sender's keypair file (JSON byte array).
    #[serde(alias = "senderWalletPath")]
    pub sender_wallet_path: String,

    /// Mint address of the token being distributed.
    #[serde(alias = "tokenAddress")]
    pub token_address: String,

    /// Decimal exponent of the token's atomic unit.
    #[serde(alias = "tokenDecimals")]
    pub token_decimals: u8,

    /// Recipient list (`address,amount`).
    #[serde(alias = "inputCsvPath")]
    pub input_csv_path: String,

    /// Result ledger, appended to across runs.
    #[serde(alias = "outputCsvPath")]
    pub output_csv_path: String,

    /// Request pacing.
    #[serde(default)]
    pub limits: RateLimitConfig,

    /// Submission retry policy.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Bundle sizing and priority settings.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Behavior when re-running over a partially processed list.
    #[serde(default)]
    pub resume: ResumeConfig,

    /// Balance summaries printed around the run.
    #[serde(default)]
    pub balance_check: BalanceCheckConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Minimum spacing between calls to the ledger service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Read queries (account lookups) per second.
    pub rpc_requests_per_second: u32,

    /// Bundle submissions per second.
    pub send_transactions_per_second: u32,
}

impl RateLimitConfig {
    /// Delay enforced before every read query.
    pub fn query_interval(&self) -> Duration {
        interval_for(self.rpc_requests_per_second)
    }

    /// Delay enforced before every submission call.
    pub fn submit_interval(&self) -> Duration {
        interval_for(self.send_transactions_per_second)
    }
}

fn interval_for(per_second: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(per_second.max(1)))
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rpc_requests_per_second: 10,
            send_transactions_per_second: 1,
        }
    }
}

/// Retry configuration for rate-limited submissions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total submission attempts before giving up.
    pub max_retries: u32,

    /// First backoff delay in milliseconds.
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 64_000,
        }
    }
}

/// Bundle construction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Hard ceiling on a bundle's encoded size in bytes.
    pub max_bundle_size: usize,

    /// Conservative per-operation size estimate in bytes.
    pub estimated_operation_size: usize,

    /// Compute unit limit requested for every bundle.
    pub compute_unit_limit: u32,

    /// Priority fee in micro-lamports per compute unit.
    pub compute_unit_price_micro_lamports: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_bundle_size: 1232,
            estimated_operation_size: 100,
            compute_unit_limit: 2_000_000,
            compute_unit_price_micro_lamports: 100_000,
        }
    }
}

/// Resume configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ResumeConfig {
    /// Skip recipients that already have a `success` row in the result ledger.
    pub skip_succeeded: bool,
}

/// Balance summary configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalanceCheckConfig {
    /// Print sender balances before and after the run.
    pub enabled: bool,

    /// Number of random recipients whose balance is printed afterwards.
    pub sample_recipients: usize,
}

impl Default for BalanceCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_recipients: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: AirdropConfig = toml::from_str(
            r#"
            rpc_url = "https://api.devnet.solana.com"
            sender_wallet_path = "sender.json"
            token_address = "So11111111111111111111111111111111111111112"
            token_decimals = 6
            input_csv_path = "airdrop.csv"
            output_csv_path = "results.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.retry.max_retries, 10);
        assert_eq!(config.batch.max_bundle_size, 1232);
        assert!(!config.resume.skip_succeeded);
        assert_eq!(config.limits.query_interval(), Duration::from_millis(100));
        assert_eq!(config.limits.submit_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_camel_case_json_aliases() {
        let config: AirdropConfig = serde_json::from_str(
            r#"{
                "rpcUrl": "https://api.devnet.solana.com",
                "senderWalletPath": "sender.json",
                "tokenAddress": "So11111111111111111111111111111111111111112",
                "tokenDecimals": 9,
                "inputCsvPath": "airdrop.csv",
                "outputCsvPath": "results.csv"
            }"#,
        )
        .unwrap();

        assert_eq!(config.token_decimals, 9);
        assert_eq!(config.output_csv_path, "results.csv");
    }

    #[test]
    fn test_zero_rate_does_not_divide_by_zero() {
        let limits = RateLimitConfig {
            rpc_requests_per_second: 0,
            send_transactions_per_second: 0,
        };
        assert_eq!(limits.query_interval(), Duration::from_secs(1));
    }
}

//! Retry logic.
//!
//! # Responsibilities
//! - Decide, after a failed attempt, whether to retry and how long to wait
//! - Only the ledger's rate-limit signal is retryable
//!
//! # Design Decisions
//! - The decision is a pure function of (attempt, error kind); the caller owns the sleeping
//! - Backoff doubles from the initial delay up to the ceiling, no jitter
//! - `max_retries` counts attempts, so the last rate-limited attempt fails without a wait

use std::fmt;
use std::time::Duration;

use crate::blockchain::LedgerError;
use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

/// Why a submission ultimately failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// A non-retryable ledger error.
    Terminal(String),
    /// Every attempt was rate limited.
    MaxRetriesExceeded,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Terminal(message) => f.write_str(message),
            FailureReason::MaxRetriesExceeded => f.write_str("Max retries exceeded"),
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    Fail(FailureReason),
}

/// Bounded exponential-backoff policy for submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }

    /// Decide after attempt number `attempt` (1-based) failed with `error`.
    pub fn decide(&self, attempt: u32, error: &LedgerError) -> RetryDecision {
        if !error.is_rate_limited() {
            return RetryDecision::Fail(FailureReason::Terminal(error.to_string()));
        }
        if attempt >= self.max_retries {
            return RetryDecision::Fail(FailureReason::MaxRetriesExceeded);
        }

        RetryDecision::RetryAfter(calculate_backoff(
            attempt,
            self.initial_backoff.as_millis() as u64,
            self.max_backoff.as_millis() as u64,
        ))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

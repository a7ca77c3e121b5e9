//! Rate-limited executor.
//!
//! # Responsibilities
//! - Pace read queries and submissions independently
//! - Submit one bundle at a time, retrying only on rate-limit rejections
//!
//! # Submission states
//! ```text
//! Pending → (RateLimited → BackoffWait)* → Confirmed | Failed
//! ```
//! `RateLimited` is entered only on the ledger's rate-limit signal; any other
//! error goes straight to `Failed`. The bundle is signed once and resent
//! unchanged on retry until its blockhash expires.

use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use std::sync::Arc;

use crate::airdrop::batch::Bundle;
use crate::blockchain::{LedgerClient, LedgerResult, PendingTransaction, TokenBalance};
use crate::config::RateLimitConfig;
use crate::observability::metrics;
use crate::resilience::{FailureReason, Pacer, RetryDecision, RetryPolicy, Sleeper};

/// Final state of one bundle submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Confirmed { signature: Signature, attempts: u32 },
    Failed { reason: FailureReason, attempts: u32 },
}

impl SubmissionOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmissionOutcome::Confirmed { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            SubmissionOutcome::Confirmed { attempts, .. } | SubmissionOutcome::Failed { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Single-worker gateway to the ledger service.
#[derive(Clone)]
pub struct RateLimitedExecutor {
    ledger: Arc<dyn LedgerClient>,
    query_pacer: Pacer,
    submit_pacer: Pacer,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RateLimitedExecutor {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        limits: &RateLimitConfig,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            ledger,
            query_pacer: Pacer::new(limits.query_interval(), sleeper.clone()),
            submit_pacer: Pacer::new(limits.submit_interval(), sleeper.clone()),
            policy,
            sleeper,
        }
    }

    /// The underlying client, for the pure operation builders.
    pub fn ledger(&self) -> &dyn LedgerClient {
        self.ledger.as_ref()
    }

    /// Paced account lookup.
    pub async fn query_account(&self, account: &Pubkey) -> LedgerResult<Option<Account>> {
        self.query_pacer.pace().await;
        metrics::record_rpc_query();
        self.ledger.query_account(account).await
    }

    /// Paced balance lookup.
    pub async fn token_balances(&self, owner: &Pubkey, mint: &Pubkey) -> LedgerResult<Vec<TokenBalance>> {
        self.query_pacer.pace().await;
        metrics::record_rpc_query();
        self.ledger.token_balances(owner, mint).await
    }

    /// Submit `bundle` signed by `signer`, retrying rate-limit rejections.
    ///
    /// Every attempt shares one `PendingTransaction`, so a retry after the
    /// bundle landed resolves to its first signature instead of paying twice.
    pub async fn submit(&self, bundle: &Bundle, signer: &Keypair) -> SubmissionOutcome {
        let mut attempt = 0;
        let mut pending = PendingTransaction::new();

        loop {
            attempt += 1;
            self.submit_pacer.pace().await;

            let error = match self
                .ledger
                .submit_and_confirm(bundle.operations(), signer, &mut pending)
                .await
            {
                Ok(signature) => {
                    tracing::info!(
                        bundle = bundle.sequence(),
                        recipients = bundle.recipients().len(),
                        signature = %signature,
                        attempts = attempt,
                        "Bundle confirmed"
                    );
                    return SubmissionOutcome::Confirmed {
                        signature,
                        attempts: attempt,
                    };
                }
                Err(error) => error,
            };

            if error.is_rate_limited() {
                metrics::record_rate_limited();
            }

            match self.policy.decide(attempt, &error) {
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        bundle = bundle.sequence(),
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limit exceeded, backing off"
                    );
                    self.sleeper.sleep(delay).await;
                }
                RetryDecision::Fail(reason) => {
                    tracing::error!(
                        bundle = bundle.sequence(),
                        attempts = attempt,
                        error = %reason,
                        "Bundle failed"
                    );
                    return SubmissionOutcome::Failed {
                        reason,
                        attempts: attempt,
                    };
                }
            }
        }
    }
}

impl std::fmt::Debug for RateLimitedExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedExecutor")
            .field("query_pacer", &self.query_pacer)
            .field("submit_pacer", &self.submit_pacer)
            .field("policy", &self.policy)
            .finish()
    }
}

//! Drives an airdrop run end to end.
//!
//! Recipients are processed in input order. Bundles are submitted strictly
//! one at a time, and each bundle's rows are durable before the next
//! recipient is looked at.

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::airdrop::batch::{BatchBuilder, BatchError, Bundle};
use crate::airdrop::executor::{RateLimitedExecutor, SubmissionOutcome};
use crate::airdrop::results::{ResultLedger, ResultLedgerError};
use crate::airdrop::types::{to_atomic_amount, AmountError, Status, SubmissionResult, TransferRequest};
use crate::blockchain::{LedgerError, Wallet};
use crate::config::{AirdropConfig, BatchConfig};
use crate::observability::metrics;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum AirdropError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Results(#[from] ResultLedgerError),
}

/// Why a recipient's operations could not be built.
#[derive(Debug, Error)]
enum ConstructionError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirdropSummary {
    /// Rows in the input list.
    pub recipients: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Recipients skipped because a previous run already paid them.
    pub skipped: usize,
    /// Bundles submitted.
    pub bundles: usize,
}

pub struct Orchestrator {
    executor: RateLimitedExecutor,
    sender: Arc<Wallet>,
    sender_account: Pubkey,
    mint: Pubkey,
    token_decimals: u8,
    batch: BatchConfig,
    results: ResultLedger,
    already_paid: HashSet<String>,
}

impl Orchestrator {
    pub fn new(
        config: &AirdropConfig,
        executor: RateLimitedExecutor,
        sender: Arc<Wallet>,
        mint: Pubkey,
        results: ResultLedger,
    ) -> Self {
        let sender_account = executor.ledger().derive_receiving_account(&sender.pubkey(), &mint);
        Self {
            executor,
            sender,
            sender_account,
            mint,
            token_decimals: config.token_decimals,
            batch: config.batch.clone(),
            results,
            already_paid: HashSet::new(),
        }
    }

    /// Skip these addresses instead of paying them again.
    pub fn skip_addresses(mut self, addresses: HashSet<String>) -> Self {
        self.already_paid = addresses;
        self
    }

    /// Process every request and record one row per recipient.
    pub async fn run(&mut self, requests: Vec<TransferRequest>) -> Result<AirdropSummary, AirdropError> {
        let mut summary = AirdropSummary {
            recipients: requests.len(),
            ..AirdropSummary::default()
        };

        let seed = self
            .executor
            .ledger()
            .build_priority_ops(self.batch.compute_unit_limit, self.batch.compute_unit_price_micro_lamports);
        let mut builder = BatchBuilder::new(&self.batch, seed);

        tracing::info!(
            recipients = summary.recipients,
            sender = %self.sender.pubkey(),
            mint = %self.mint,
            "Starting airdrop"
        );

        for request in requests {
            if self.already_paid.contains(&request.address) {
                tracing::debug!(address = %request.address, "Already paid, skipping");
                summary.skipped += 1;
                continue;
            }

            let operations = match self.build_operations(&request).await {
                Ok(operations) => operations,
                Err(error) => {
                    tracing::warn!(address = %request.address, error = %error, "Skipping recipient");
                    self.results
                        .record(&SubmissionResult::failed(&request, error.to_string()))?;
                    metrics::record_recipients(Status::Failed.as_str(), 1);
                    summary.failed += 1;
                    continue;
                }
            };

            if let Some(bundle) = builder.accumulate(request, operations)? {
                self.submit_and_record(bundle, &mut summary).await?;
            }
        }

        if let Some(bundle) = builder.finish() {
            self.submit_and_record(bundle, &mut summary).await?;
        }

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            bundles = summary.bundles,
            results = %self.results.path().display(),
            "Airdrop completed"
        );
        Ok(summary)
    }

    async fn build_operations(&self, request: &TransferRequest) -> Result<Vec<Instruction>, ConstructionError> {
        let amount = to_atomic_amount(&request.amount, self.token_decimals)?;
        let owner = Pubkey::from_str(&request.address).map_err(|e| LedgerError::InvalidAddress {
            address: request.address.clone(),
            reason: e.to_string(),
        })?;

        let ledger = self.executor.ledger();
        let sender = self.sender.pubkey();
        let receiving = ledger.derive_receiving_account(&owner, &self.mint);

        let mut operations = Vec::with_capacity(2);
        if self.executor.query_account(&receiving).await?.is_none() {
            operations.push(ledger.build_create_account_op(&sender, &owner, &self.mint));
        }
        operations.push(ledger.build_transfer_op(&self.sender_account, &receiving, &sender, amount)?);

        Ok(operations)
    }

    async fn submit_and_record(&mut self, bundle: Bundle, summary: &mut AirdropSummary) -> Result<(), AirdropError> {
        let outcome = self.executor.submit(&bundle, self.sender.keypair()).await;

        let rows: Vec<SubmissionResult> = bundle
            .recipients()
            .iter()
            .map(|request| match &outcome {
                SubmissionOutcome::Confirmed { signature, .. } => SubmissionResult::success(request, signature),
                SubmissionOutcome::Failed { reason, .. } => SubmissionResult::failed(request, reason.to_string()),
            })
            .collect();
        self.results.record_all(&rows)?;

        let status = if outcome.is_confirmed() {
            summary.succeeded += rows.len();
            Status::Success
        } else {
            summary.failed += rows.len();
            Status::Failed
        };
        summary.bundles += 1;
        metrics::record_bundle(status.as_str(), rows.len());
        metrics::record_recipients(status.as_str(), rows.len());

        Ok(())
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("sender", &self.sender)
            .field("mint", &self.mint)
            .field("results", &self.results)
            .finish()
    }
}

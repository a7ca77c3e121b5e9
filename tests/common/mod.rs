//! Shared fixtures for the airdrop integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use token_airdrop::airdrop::{Orchestrator, RateLimitedExecutor, ResultLedger, TransferRequest};
use token_airdrop::blockchain::{
    LedgerClient, LedgerError, LedgerResult, PendingTransaction, TokenBalance, Wallet,
};
use token_airdrop::config::*;
use token_airdrop::resilience::{RetryPolicy, Sleeper};

/// Scripted outcome of one submission attempt.
enum Scripted {
    /// The transaction never lands.
    Fail(LedgerError),
    /// The transaction lands but the caller only sees the error.
    LandThenFail(LedgerError),
}

/// In-memory ledger with scripted submission outcomes.
///
/// Attempts pop the script front to back; once it is empty every attempt
/// lands. A bundle is signed on its first attempt and resent unchanged, and
/// a transaction that already landed is never executed again.
#[derive(Default)]
pub struct MockLedger {
    existing_accounts: Mutex<HashSet<Pubkey>>,
    failing_queries: Mutex<HashSet<Pubkey>>,
    script: Mutex<VecDeque<Scripted>>,
    submissions: Mutex<Vec<Vec<Instruction>>>,
    landed: Mutex<Vec<Signature>>,
    queries: Mutex<Vec<Pubkey>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `owner`'s receiving account for `mint` as already created.
    pub fn with_existing_account(self, owner: &Pubkey, mint: &Pubkey) -> Self {
        let account = self.derive_receiving_account(owner, mint);
        self.existing_accounts.lock().unwrap().insert(account);
        self
    }

    /// Make the lookup of `owner`'s receiving account fail.
    pub fn with_failing_query(self, owner: &Pubkey, mint: &Pubkey) -> Self {
        let account = self.derive_receiving_account(owner, mint);
        self.failing_queries.lock().unwrap().insert(account);
        self
    }

    /// Queue submission failures, consumed one per attempt.
    pub fn with_submission_errors(self, errors: impl IntoIterator<Item = LedgerError>) -> Self {
        self.script
            .lock()
            .unwrap()
            .extend(errors.into_iter().map(Scripted::Fail));
        self
    }

    /// Queue an attempt whose transaction lands but whose confirmation fails.
    pub fn with_landed_then_error(self, error: LedgerError) -> Self {
        self.script.lock().unwrap().push_back(Scripted::LandThenFail(error));
        self
    }

    /// Operations of every submission attempt.
    pub fn submissions(&self) -> Vec<Vec<Instruction>> {
        self.submissions.lock().unwrap().clone()
    }

    /// Signatures of the transactions that executed, i.e. bundles paid out.
    pub fn landed(&self) -> Vec<Signature> {
        self.landed.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn query_account(&self, account: &Pubkey) -> LedgerResult<Option<Account>> {
        self.queries.lock().unwrap().push(*account);
        if self.failing_queries.lock().unwrap().contains(account) {
            return Err(LedgerError::Rpc("account lookup failed".to_string()));
        }
        let exists = self.existing_accounts.lock().unwrap().contains(account);
        Ok(exists.then(Account::default))
    }

    async fn submit_and_confirm(
        &self,
        operations: &[Instruction],
        signer: &Keypair,
        pending: &mut PendingTransaction,
    ) -> LedgerResult<Signature> {
        self.submissions.lock().unwrap().push(operations.to_vec());

        if let Some(signature) = pending.signature() {
            if self.landed.lock().unwrap().contains(&signature) {
                return Ok(signature);
            }
        } else {
            pending.replace(Transaction::new_signed_with_payer(
                operations,
                Some(&signer.pubkey()),
                &[signer],
                Hash::new_unique(),
            ));
        }
        let signature = pending.signature().unwrap();

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::LandThenFail(error)) => {
                self.landed.lock().unwrap().push(signature);
                Err(error)
            }
            None => {
                self.landed.lock().unwrap().push(signature);
                Ok(signature)
            }
        }
    }

    async fn token_balances(&self, owner: &Pubkey, mint: &Pubkey) -> LedgerResult<Vec<TokenBalance>> {
        Ok(vec![TokenBalance {
            account: self.derive_receiving_account(owner, mint),
            amount: 0,
            ui_amount: "0".to_string(),
        }])
    }
}

/// Records every requested pause instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Pauses at or above `threshold`, i.e. backoff waits rather than pacing.
    pub fn sleeps_at_least(&self, threshold: Duration) -> Vec<Duration> {
        self.sleeps().into_iter().filter(|d| *d >= threshold).collect()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Config with fast pacing (1ms queries, 10ms submissions) and default retry/batch settings.
pub fn test_config(output: &Path) -> AirdropConfig {
    AirdropConfig {
        rpc_url: "http://127.0.0.1:8899".to_string(),
        sender_wallet_path: "unused.json".to_string(),
        token_address: Pubkey::new_unique().to_string(),
        token_decimals: 6,
        input_csv_path: "unused.csv".to_string(),
        output_csv_path: output.display().to_string(),
        limits: RateLimitConfig {
            rpc_requests_per_second: 1000,
            send_transactions_per_second: 100,
        },
        retry: RetryConfig::default(),
        batch: BatchConfig::default(),
        resume: ResumeConfig::default(),
        balance_check: BalanceCheckConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

/// Everything a test needs to run the orchestrator against a `MockLedger`.
pub struct Harness {
    pub config: AirdropConfig,
    pub ledger: Arc<MockLedger>,
    pub sleeper: Arc<RecordingSleeper>,
    pub wallet: Arc<Wallet>,
    pub mint: Pubkey,
    pub dir: tempfile::TempDir,
}

impl Harness {
    /// `build` receives the mint so accounts can be pre-created.
    pub fn new(build: impl FnOnce(MockLedger, &Pubkey) -> MockLedger) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir.path().join("results.csv"));
        let mint: Pubkey = config.token_address.parse().unwrap();
        Self {
            ledger: Arc::new(build(MockLedger::new(), &mint)),
            sleeper: Arc::new(RecordingSleeper::default()),
            wallet: Arc::new(Wallet::from_keypair(Keypair::new())),
            mint,
            config,
            dir,
        }
    }

    pub fn results_path(&self) -> &Path {
        Path::new(&self.config.output_csv_path)
    }

    pub fn executor(&self) -> RateLimitedExecutor {
        RateLimitedExecutor::new(
            self.ledger.clone(),
            &self.config.limits,
            RetryPolicy::from_config(&self.config.retry),
            self.sleeper.clone(),
        )
    }

    pub fn orchestrator(&self) -> Orchestrator {
        let results = ResultLedger::open(self.results_path()).unwrap();
        Orchestrator::new(
            &self.config,
            self.executor(),
            self.wallet.clone(),
            self.mint,
            results,
        )
    }
}

/// `count` recipients with fresh addresses, amount "1.5".
pub fn recipients(count: usize) -> Vec<(Pubkey, TransferRequest)> {
    (0..count)
        .map(|_| {
            let owner = Pubkey::new_unique();
            (owner, TransferRequest::new(owner.to_string(), "1.5"))
        })
        .collect()
}

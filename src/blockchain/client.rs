//! Solana RPC implementation of the ledger client.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint with `confirmed` commitment
//! - Look up receiving accounts
//! - Sign, send, and confirm bundles
//! - Report token balances for the run summaries

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use serde_json::Value;
use solana_sdk::transaction::Transaction;
use std::str::FromStr;

use crate::blockchain::ledger::LedgerClient;
use crate::blockchain::types::{LedgerError, LedgerResult, PendingTransaction, TokenBalance};

/// Ledger client backed by a Solana RPC node.
pub struct SolanaLedgerClient {
    rpc: RpcClient,
    rpc_url: String,
}

impl SolanaLedgerClient {
    /// Create a client. No request is made until the first call.
    pub fn new(rpc_url: &str) -> Self {
        tracing::info!(rpc_url = %rpc_url, "Solana RPC client initialized");
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed()),
            rpc_url: rpc_url.to_string(),
        }
    }

    /// The endpoint this client talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Send and confirm `transaction`.
    ///
    /// A resent transaction is refused once its first copy has landed, so a
    /// terminal send error is checked against the signature status first.
    async fn send(&self, transaction: &Transaction) -> LedgerResult<Signature> {
        let error = match self.rpc.send_and_confirm_transaction(transaction).await {
            Ok(signature) => return Ok(signature),
            Err(e) => LedgerError::from(e),
        };
        if error.is_rate_limited() {
            return Err(error);
        }

        let signature = transaction.signatures[0];
        match self.rpc.get_signature_status(&signature).await {
            Ok(Some(Ok(()))) => Ok(signature),
            _ => Err(error),
        }
    }
}

#[async_trait]
impl LedgerClient for SolanaLedgerClient {
    async fn query_account(&self, account: &Pubkey) -> LedgerResult<Option<Account>> {
        let response = self
            .rpc
            .get_account_with_commitment(account, self.rpc.commitment())
            .await?;
        Ok(response.value)
    }

    async fn submit_and_confirm(
        &self,
        operations: &[Instruction],
        signer: &Keypair,
        pending: &mut PendingTransaction,
    ) -> LedgerResult<Signature> {
        if let Some(transaction) = pending.transaction() {
            let signature = transaction.signatures[0];
            match self.rpc.get_signature_status(&signature).await? {
                Some(Ok(())) => {
                    tracing::info!(signature = %signature, "Bundle already landed");
                    return Ok(signature);
                }
                Some(Err(e)) => return Err(LedgerError::Rejected(e.to_string())),
                None => {}
            }

            let still_valid = self
                .rpc
                .is_blockhash_valid(&transaction.message.recent_blockhash, self.rpc.commitment())
                .await?;
            if still_valid {
                tracing::debug!(signature = %signature, "Resending signed bundle");
                return self.send(transaction).await;
            }
            tracing::warn!(signature = %signature, "Blockhash expired before the bundle landed, signing again");
        }

        let blockhash = self.rpc.get_latest_blockhash().await?;
        let transaction = pending.replace(Transaction::new_signed_with_payer(
            operations,
            Some(&signer.pubkey()),
            &[signer],
            blockhash,
        ));
        self.send(transaction).await
    }

    async fn token_balances(&self, owner: &Pubkey, mint: &Pubkey) -> LedgerResult<Vec<TokenBalance>> {
        let accounts = self
            .rpc
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::Mint(*mint))
            .await?;

        accounts
            .into_iter()
            .map(|keyed| {
                let account = Pubkey::from_str(&keyed.pubkey).map_err(|e| LedgerError::InvalidAddress {
                    address: keyed.pubkey.clone(),
                    reason: e.to_string(),
                })?;
                let data = serde_json::to_value(&keyed.account.data)
                    .map_err(|e| LedgerError::Rpc(format!("Unreadable token account {account}: {e}")))?;
                let (amount, ui_amount) = parse_token_amount(&data)?;
                Ok(TokenBalance {
                    account,
                    amount,
                    ui_amount,
                })
            })
            .collect()
    }
}

/// Raw and display amounts from a `jsonParsed` token account.
fn parse_token_amount(data: &Value) -> LedgerResult<(u64, String)> {
    let token_amount = data
        .pointer("/parsed/info/tokenAmount")
        .ok_or_else(|| LedgerError::Rpc("Token account data is not jsonParsed".to_string()))?;

    let field = |name: &str| {
        token_amount
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| LedgerError::Rpc(format!("Token account is missing tokenAmount.{name}")))
    };

    let raw = field("amount")?;
    let amount = raw
        .parse::<u64>()
        .map_err(|e| LedgerError::Rpc(format!("Malformed token amount '{raw}': {e}")))?;
    Ok((amount, field("uiAmountString")?.to_string()))
}

impl std::fmt::Debug for SolanaLedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaLedgerClient")
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

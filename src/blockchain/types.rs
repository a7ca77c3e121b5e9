//! Ledger-facing types and error definitions.

use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use thiserror::Error;

/// Errors that can occur while talking to the ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The service rejected the call because of request volume.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The ledger refused the transaction (balance, signature, blockhash...).
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// A recipient or mint address could not be parsed.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// An operation could not be encoded.
    #[error("Instruction error: {0}")]
    Instruction(String),

    /// Key material could not be loaded.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl LedgerError {
    /// Whether the error is the distinguishable "too many requests" signal.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LedgerError::RateLimited(_))
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

fn is_rate_limit_message(message: &str) -> bool {
    message.to_ascii_lowercase().contains("too many requests")
}

impl From<ClientError> for LedgerError {
    fn from(err: ClientError) -> Self {
        let message = err.to_string();

        let throttled = match err.kind() {
            ClientErrorKind::Reqwest(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            _ => false,
        };
        if throttled || is_rate_limit_message(&message) {
            return LedgerError::RateLimited(message);
        }

        match err.kind() {
            ClientErrorKind::TransactionError(_) | ClientErrorKind::RpcError(_) => {
                LedgerError::Rejected(message)
            }
            _ => LedgerError::Rpc(message),
        }
    }
}

/// Balance of one token account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    /// The token account holding the balance.
    pub account: Pubkey,
    /// Balance in atomic units.
    pub amount: u64,
    /// Balance scaled by the mint's decimals, as reported by the node.
    pub ui_amount: String,
}

/// The signed transaction of one bundle, kept across submission attempts.
///
/// Once a bundle is signed, retries resend the same transaction so a
/// bundle that already landed is never paid a second time.
#[derive(Debug, Default)]
pub struct PendingTransaction {
    signed: Option<Transaction>,
}

impl PendingTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        self.signed.as_ref()
    }

    /// Signature of the signed transaction, if any.
    pub fn signature(&self) -> Option<Signature> {
        self.signed.as_ref().and_then(|tx| tx.signatures.first().copied())
    }

    /// Store a freshly signed transaction, replacing an expired one.
    pub fn replace(&mut self, transaction: Transaction) -> &Transaction {
        self.signed.insert(transaction)
    }
}

//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Keypair file (sender key material)
//!     → wallet.rs (key loading)
//!     → ledger.rs (LedgerClient seam + pure operation builders)
//!     → client.rs (Solana RPC: account lookups, sign/send/confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys are never logged
//! - Rate-limit rejections are surfaced as their own error kind

pub mod client;
pub mod ledger;
pub mod types;
pub mod wallet;

pub use client::SolanaLedgerClient;
pub use ledger::LedgerClient;
pub use types::{LedgerError, LedgerResult, PendingTransaction, TokenBalance};
pub use wallet::Wallet;

//! SPL token airdrop library.
//!
//! Reads a recipient list, packs transfers into size-bounded transactions,
//! submits them one at a time under rate limits, and appends one durable
//! result row per recipient.

pub mod airdrop;
pub mod blockchain;
pub mod config;
pub mod observability;
pub mod resilience;

pub use airdrop::{AirdropSummary, Orchestrator, RateLimitedExecutor};
pub use config::AirdropConfig;

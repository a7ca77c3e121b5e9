//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the ledger service:
//!     → pacing.rs (fixed delay before every read query / submission)
//!     → On rate-limit rejection: retries.rs (decide retry or fail)
//!     → backoff.rs (doubling delay, capped)
//! ```
//!
//! # Design Decisions
//! - Only the ledger's rate-limit signal is retried; every other error is terminal
//! - Sleeping goes through the `Sleeper` trait so tests never wait on real time
//! - Pacing is a fixed-rate pacer, not a token bucket

pub mod backoff;
pub mod pacing;
pub mod retries;

pub use pacing::{Pacer, Sleeper, TokioSleeper};
pub use retries::{FailureReason, RetryDecision, RetryPolicy};

//! Token distribution engine.
//!
//! # Data Flow
//! ```text
//! recipients.rs (address,amount rows)
//!     → orchestrator.rs (build operations per recipient)
//!     → batch.rs (pack into size-bounded bundles)
//!     → executor.rs (paced, retried submission)
//!     → results.rs (append + sync one row per recipient)
//!     → loop until input exhausted, then flush the last partial bundle
//! ```
//!
//! # Design Decisions
//! - One worker, one bundle in flight: the sender's transactions stay ordered
//! - Per-recipient failures become result rows; only setup errors and an
//!   oversized recipient abort the run
//! - Every recipient in a bundle shares its status and signature

pub mod balance;
pub mod batch;
pub mod executor;
pub mod orchestrator;
pub mod recipients;
pub mod results;
pub mod types;

pub use batch::{BatchBuilder, BatchError, Bundle};
pub use executor::{RateLimitedExecutor, SubmissionOutcome};
pub use orchestrator::{AirdropError, AirdropSummary, Orchestrator};
pub use recipients::{read_recipients, RecipientError};
pub use results::{ResultLedger, ResultLedgerError};
pub use types::{to_atomic_amount, AmountError, Status, SubmissionResult, TransferRequest};

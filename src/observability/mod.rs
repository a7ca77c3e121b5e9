//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! executor / orchestrator events:
//!     → logging.rs (structured log lines on stdout, filtered by RUST_LOG)
//!     → metrics.rs (bundle, recipient, rate-limit and query counters)
//!
//! Metrics are only exported when a Prometheus listener is enabled in config.
//! ```

pub mod logging;
pub mod metrics;

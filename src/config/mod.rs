//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, or JSON for legacy configs)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AirdropConfig (validated, immutable)
//!     → passed by reference into every component constructor
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup; there is no ambient global
//! - Everything except the six core options has a default
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AirdropConfig, BalanceCheckConfig, BatchConfig, ObservabilityConfig, RateLimitConfig,
    ResumeConfig, RetryConfig,
};

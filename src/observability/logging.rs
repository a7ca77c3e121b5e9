//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, at startup
//! - Honor `RUST_LOG`, falling back to the configured level for this crate

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(log_level: &str) -> String {
    format!("token_airdrop={},solana_client=warn", log_level)
}

/// Install the global subscriber.
pub fn init_logging(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(log_level).into());

    // A second init (tests, embedding) keeps the existing subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter("debug"), "token_airdrop=debug,solana_client=warn");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging("info");
        init_logging("debug");
    }
}

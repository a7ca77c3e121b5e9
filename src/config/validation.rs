//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (rates > 0, backoff ordering, decimals)
//! - Check that a bundle can hold at least one recipient
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AirdropConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::AirdropConfig;

/// Largest exponent for which `10^decimals` fits in a `u64`.
pub const MAX_TOKEN_DECIMALS: u8 = 19;

/// Operations a single recipient may contribute (account creation + transfer).
pub const MAX_OPERATIONS_PER_RECIPIENT: usize = 2;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration.
pub fn validate_config(config: &AirdropConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = url::Url::parse(&config.rpc_url) {
        errors.push(ValidationError::new("rpc_url", format!("invalid URL: {}", e)));
    }

    for (field, value) in [
        ("sender_wallet_path", &config.sender_wallet_path),
        ("token_address", &config.token_address),
        ("input_csv_path", &config.input_csv_path),
        ("output_csv_path", &config.output_csv_path),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if config.token_decimals > MAX_TOKEN_DECIMALS {
        errors.push(ValidationError::new(
            "token_decimals",
            format!("must be at most {}", MAX_TOKEN_DECIMALS),
        ));
    }

    if config.limits.rpc_requests_per_second == 0 {
        errors.push(ValidationError::new("limits.rpc_requests_per_second", "must be > 0"));
    }
    if config.limits.send_transactions_per_second == 0 {
        errors.push(ValidationError::new(
            "limits.send_transactions_per_second",
            "must be > 0",
        ));
    }

    let retry = &config.retry;
    if retry.max_retries == 0 {
        errors.push(ValidationError::new("retry.max_retries", "must be > 0"));
    }
    if retry.initial_backoff_ms > retry.max_backoff_ms {
        errors.push(ValidationError::new(
            "retry.initial_backoff_ms",
            "must not exceed retry.max_backoff_ms",
        ));
    }

    let batch = &config.batch;
    if batch.estimated_operation_size == 0 {
        errors.push(ValidationError::new("batch.estimated_operation_size", "must be > 0"));
    } else {
        // Two priority operations seed every bundle.
        let smallest_bundle = batch.estimated_operation_size * (2 + MAX_OPERATIONS_PER_RECIPIENT);
        if smallest_bundle > batch.max_bundle_size {
            errors.push(ValidationError::new(
                "batch.max_bundle_size",
                format!(
                    "{} bytes cannot hold the priority operations plus one recipient ({} bytes)",
                    batch.max_bundle_size, smallest_bundle
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

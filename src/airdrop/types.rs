//! Airdrop data model.

use serde::{Deserialize, Serialize};
use solana_sdk::signature::Signature;
use thiserror::Error;

/// One row of the recipient list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransferRequest {
    /// Recipient wallet address (base58).
    pub address: String,
    /// Human-scale decimal amount, kept verbatim for the result ledger.
    pub amount: String,
}

impl TransferRequest {
    pub fn new(address: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            amount: amount.into(),
        }
    }
}

/// Outcome recorded for a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failed => "failed",
        }
    }
}

/// Permanent record for one transfer request. Field order is the ledger's column order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmissionResult {
    pub timestamp: String,
    pub address: String,
    pub amount: String,
    pub status: Status,
    pub signature: Option<String>,
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn success(request: &TransferRequest, signature: &Signature) -> Self {
        Self {
            timestamp: now_timestamp(),
            address: request.address.clone(),
            amount: request.amount.clone(),
            status: Status::Success,
            signature: Some(signature.to_string()),
            error: None,
        }
    }

    pub fn failed(request: &TransferRequest, error: impl Into<String>) -> Self {
        Self {
            timestamp: now_timestamp(),
            address: request.address.clone(),
            amount: request.amount.clone(),
            status: Status::Failed,
            signature: None,
            error: Some(error.into()),
        }
    }
}

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Errors converting a decimal amount to atomic units.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid amount '{0}'")]
    Invalid(String),

    #[error("Negative amount '{0}'")]
    Negative(String),

    #[error("Amount '{0}' does not fit in 64 bits at {1} decimals")]
    Overflow(String, u8),
}

/// `floor(amount * 10^decimals)`, computed on the decimal digits directly.
///
/// Digits beyond `decimals` are dropped, so the result never rounds up.
pub fn to_atomic_amount(amount: &str, decimals: u8) -> Result<u64, AmountError> {
    let trimmed = amount.trim();
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative(amount.to_string()));
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::Invalid(amount.to_string()));
    }

    let overflow = || AmountError::Overflow(amount.to_string(), decimals);
    let scale = 10u64.checked_pow(u32::from(decimals)).ok_or_else(overflow)?;

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().map_err(|_| overflow())?
    };

    let kept: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(usize::from(decimals))
        .collect();
    let fraction_units = if kept.is_empty() {
        0
    } else {
        kept.parse::<u64>().map_err(|_| overflow())?
    };

    whole_units
        .checked_mul(scale)
        .and_then(|units| units.checked_add(fraction_units))
        .ok_or_else(overflow)
}

/// Render atomic units as a decimal string, the inverse of [`to_atomic_amount`].
pub fn format_amount(atomic: u64, decimals: u8) -> String {
    if decimals == 0 {
        return atomic.to_string();
    }
    let digits = format!("{:0>width$}", atomic, width = usize::from(decimals) + 1);
    let (whole, fraction) = digits.split_at(digits.len() - usize::from(decimals));
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_amount_truncates() {
        assert_eq!(to_atomic_amount("1.9999999", 6), Ok(1_999_999));
        assert_eq!(to_atomic_amount("1.005", 2), Ok(100));
        assert_eq!(to_atomic_amount("0.1", 9), Ok(100_000_000));
        assert_eq!(to_atomic_amount("12", 3), Ok(12_000));
        assert_eq!(to_atomic_amount(".5", 1), Ok(5));
        assert_eq!(to_atomic_amount("7.", 0), Ok(7));
        assert_eq!(to_atomic_amount(" +3.25 ", 2), Ok(325));
        assert_eq!(to_atomic_amount("0", 9), Ok(0));
    }

    #[test]
    fn test_atomic_amount_rejects_bad_input() {
        assert_eq!(to_atomic_amount("-1", 6), Err(AmountError::Negative("-1".to_string())));
        assert!(matches!(to_atomic_amount("", 6), Err(AmountError::Invalid(_))));
        assert!(matches!(to_atomic_amount(".", 6), Err(AmountError::Invalid(_))));
        assert!(matches!(to_atomic_amount("1e5", 6), Err(AmountError::Invalid(_))));
        assert!(matches!(to_atomic_amount("1.2.3", 6), Err(AmountError::Invalid(_))));
        assert!(matches!(to_atomic_amount("abc", 6), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn test_atomic_amount_overflow() {
        assert!(matches!(
            to_atomic_amount("18446744073709551616", 0),
            Err(AmountError::Overflow(_, 0))
        ));
        assert!(matches!(to_atomic_amount("20", 18), Err(AmountError::Overflow(_, 18))));
        assert!(matches!(to_atomic_amount("1", 20), Err(AmountError::Overflow(_, 20))));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_500_000, 6), "1.5");
        assert_eq!(format_amount(42, 6), "0.000042");
        assert_eq!(format_amount(3_000, 3), "3");
        assert_eq!(format_amount(9, 0), "9");
    }

    #[test]
    fn test_result_rows() {
        let request = TransferRequest::new("addr", "1.5");
        let failed = SubmissionResult::failed(&request, "boom");
        assert_eq!(failed.status, Status::Failed);
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert!(failed.signature.is_none());

        let ok = SubmissionResult::success(&request, &Signature::default());
        assert_eq!(ok.status.as_str(), "success");
        assert!(ok.error.is_none());
        assert_eq!(ok.amount, "1.5");
    }
}

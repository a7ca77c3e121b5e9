//! Recipient list source.

use std::path::Path;
use thiserror::Error;

use crate::airdrop::types::TransferRequest;

#[derive(Debug, Error)]
pub enum RecipientError {
    #[error("Failed to read recipient list {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Read `address,amount` rows in file order. Blank lines are skipped.
pub fn read_recipients(path: impl AsRef<Path>) -> Result<Vec<TransferRequest>, RecipientError> {
    let path = path.as_ref();
    let wrap = |source| RecipientError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(wrap)?;

    let recipients = reader
        .deserialize()
        .collect::<Result<Vec<TransferRequest>, _>>()
        .map_err(wrap)?;

    tracing::info!(path = %path.display(), count = recipients.len(), "Recipient list loaded");
    Ok(recipients)
}

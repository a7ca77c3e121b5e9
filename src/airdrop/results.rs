//! Append-only result ledger.
//!
//! Rows are written with a header on first use and synced to disk before
//! `record`/`record_all` return. The file is never truncated, so a killed run
//! loses at most the bundle that was in flight.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::airdrop::types::{Status, SubmissionResult};

#[derive(Debug, Error)]
pub enum ResultLedgerError {
    #[error("Result ledger {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Result ledger {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Durable record of per-recipient outcomes.
pub struct ResultLedger {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl ResultLedger {
    /// Open `path` for appending, creating it if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ResultLedgerError> {
        let path = path.as_ref().to_path_buf();
        let io_err = |source| ResultLedgerError::Io {
            path: path.display().to_string(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        let needs_header = file.metadata().map_err(io_err)?.len() == 0;

        let writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        tracing::info!(path = %path.display(), new_file = needs_header, "Result ledger opened");
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row and sync it to disk.
    pub fn record(&mut self, result: &SubmissionResult) -> Result<(), ResultLedgerError> {
        self.record_all(std::slice::from_ref(result))
    }

    /// Append rows and sync them to disk before returning.
    pub fn record_all(&mut self, results: &[SubmissionResult]) -> Result<(), ResultLedgerError> {
        for result in results {
            self.writer.serialize(result).map_err(|source| self.csv_err(source))?;
        }
        self.writer.flush().map_err(|source| self.io_err(source))?;
        self.writer
            .get_ref()
            .sync_data()
            .map_err(|source| self.io_err(source))
    }

    /// Every row in the ledger at `path`; empty if the file does not exist.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<SubmissionResult>, ResultLedgerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let csv_err = |source| ResultLedgerError::Csv {
            path: path.display().to_string(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        reader
            .deserialize()
            .collect::<Result<Vec<SubmissionResult>, _>>()
            .map_err(csv_err)
    }

    /// Addresses that already have a `success` row.
    pub fn succeeded_addresses(path: impl AsRef<Path>) -> Result<HashSet<String>, ResultLedgerError> {
        Ok(Self::read_all(path)?
            .into_iter()
            .filter(|row| row.status == Status::Success)
            .map(|row| row.address)
            .collect())
    }

    fn io_err(&self, source: std::io::Error) -> ResultLedgerError {
        ResultLedgerError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn csv_err(&self, source: csv::Error) -> ResultLedgerError {
        ResultLedgerError::Csv {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl std::fmt::Debug for ResultLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultLedger").field("path", &self.path).finish()
    }
}

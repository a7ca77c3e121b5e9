//! Batch builder: packs per-recipient operations into size-bounded bundles.
//!
//! Every bundle starts with the two priority operations. A recipient's
//! operations are never split across bundles; when they would push the
//! estimate past the ceiling, the open bundle is sealed and handed back.

use solana_sdk::instruction::Instruction;
use thiserror::Error;

use crate::airdrop::types::TransferRequest;
use crate::config::BatchConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("Recipient {address} needs {size} bytes, bundle limit is {limit} bytes")]
    OversizedRecipient {
        address: String,
        size: usize,
        limit: usize,
    },
}

/// An atomic group of operations plus the recipients they pay.
#[derive(Debug, Clone)]
pub struct Bundle {
    sequence: u64,
    operations: Vec<Instruction>,
    recipients: Vec<TransferRequest>,
    estimated_size: usize,
}

impl Bundle {
    fn seeded(sequence: u64, seed: &[Instruction], seed_size: usize) -> Self {
        Self {
            sequence,
            operations: seed.to_vec(),
            recipients: Vec::new(),
            estimated_size: seed_size,
        }
    }

    /// 1-based position of this bundle in the run.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn operations(&self) -> &[Instruction] {
        &self.operations
    }

    pub fn recipients(&self) -> &[TransferRequest] {
        &self.recipients
    }

    pub fn estimated_size(&self) -> usize {
        self.estimated_size
    }

    /// True when only the seed operations are present.
    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

/// Accumulates recipients into bundles.
#[derive(Debug)]
pub struct BatchBuilder {
    max_size: usize,
    operation_size: usize,
    seed: Vec<Instruction>,
    current: Bundle,
}

impl BatchBuilder {
    pub fn new(config: &BatchConfig, seed: [Instruction; 2]) -> Self {
        let seed = seed.to_vec();
        let seed_size = seed.len() * config.estimated_operation_size;
        Self {
            max_size: config.max_bundle_size,
            operation_size: config.estimated_operation_size,
            current: Bundle::seeded(1, &seed, seed_size),
            seed,
        }
    }

    fn estimate(&self, operations: usize) -> usize {
        operations * self.operation_size
    }

    /// Add one recipient's operations.
    ///
    /// Returns the sealed previous bundle when the new operations did not fit
    /// in it. Fails if the operations cannot fit even in a fresh bundle.
    pub fn accumulate(
        &mut self,
        request: TransferRequest,
        operations: Vec<Instruction>,
    ) -> Result<Option<Bundle>, BatchError> {
        let size = self.estimate(operations.len());
        let seed_size = self.estimate(self.seed.len());
        if seed_size + size > self.max_size {
            return Err(BatchError::OversizedRecipient {
                address: request.address,
                size: seed_size + size,
                limit: self.max_size,
            });
        }

        let sealed = if self.current.estimated_size + size > self.max_size {
            Some(self.seal())
        } else {
            None
        };

        self.current.operations.extend(operations);
        self.current.recipients.push(request);
        self.current.estimated_size += size;

        Ok(sealed)
    }

    /// Seal the open bundle once the input is exhausted, if it pays anyone.
    pub fn finish(&mut self) -> Option<Bundle> {
        if self.current.is_empty() {
            None
        } else {
            Some(self.seal())
        }
    }

    fn seal(&mut self) -> Bundle {
        let next = Bundle::seeded(
            self.current.sequence + 1,
            &self.seed,
            self.estimate(self.seed.len()),
        );
        std::mem::replace(&mut self.current, next)
    }
}

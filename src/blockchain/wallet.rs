//! Sender key material.
//!
//! # Security
//! - Keys are read from a Solana CLI keypair file (JSON byte array)
//! - Keys are never logged or serialized; only the public key is printed

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signer};
use std::path::Path;

use crate::blockchain::types::{LedgerError, LedgerResult};

/// The airdrop sender: pays fees and signs every bundle.
pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    /// Load the keypair stored at `path`.
    pub fn from_file(path: &Path) -> LedgerResult<Self> {
        let keypair = read_keypair_file(path).map_err(|e| {
            LedgerError::Wallet(format!("Failed to read keypair {}: {}", path.display(), e))
        })?;

        tracing::info!(address = %keypair.pubkey(), "Wallet loaded");
        Ok(Self { keypair })
    }

    /// Wrap an in-memory keypair.
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// The sender's public key.
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Signer for bundle submission.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet").field("pubkey", &self.pubkey()).finish()
    }
}

//! The ledger client seam.
//!
//! The distribution engine only needs six things from the ledger: derive a
//! recipient's token account, look it up, build the three kinds of operation,
//! and submit a signed bundle. Builders are pure and shared by every
//! implementation; lookups and submission go over the network.

use async_trait::async_trait;
use solana_sdk::account::Account;
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

use crate::blockchain::types::{LedgerError, LedgerResult, PendingTransaction, TokenBalance};

/// Operations the airdrop engine consumes from the ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Token account that receives `mint` on behalf of `owner`.
    fn derive_receiving_account(&self, owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        receiving_account(owner, mint)
    }

    /// Fetch an account, `None` if it does not exist.
    async fn query_account(&self, account: &Pubkey) -> LedgerResult<Option<Account>>;

    /// Operation creating `owner`'s receiving account, paid by `payer`.
    fn build_create_account_op(&self, payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
        create_account_op(payer, owner, mint)
    }

    /// Operation moving `amount` atomic units between two token accounts.
    fn build_transfer_op(
        &self,
        from: &Pubkey,
        to: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> LedgerResult<Instruction> {
        transfer_op(from, to, authority, amount)
    }

    /// The compute-limit and priority-fee operations that seed every bundle.
    fn build_priority_ops(&self, compute_limit: u32, price_micro_lamports: u64) -> [Instruction; 2] {
        priority_ops(compute_limit, price_micro_lamports)
    }

    /// Send `operations` as one transaction signed by `signer` and wait for
    /// confirmation.
    ///
    /// `pending` carries the bundle's transaction between attempts. A
    /// transaction already held there is resent as-is unless it is known to
    /// have landed or its blockhash has expired without it landing; only then
    /// is the bundle signed again.
    async fn submit_and_confirm(
        &self,
        operations: &[Instruction],
        signer: &Keypair,
        pending: &mut PendingTransaction,
    ) -> LedgerResult<Signature>;

    /// Balances of every `mint` token account owned by `owner`.
    async fn token_balances(&self, owner: &Pubkey, mint: &Pubkey) -> LedgerResult<Vec<TokenBalance>>;
}

pub fn receiving_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Idempotent, so a recipient listed twice in one bundle cannot fail it.
pub fn create_account_op(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    create_associated_token_account_idempotent(payer, owner, mint, &spl_token::id())
}

pub fn transfer_op(
    from: &Pubkey,
    to: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> LedgerResult<Instruction> {
    spl_token::instruction::transfer(&spl_token::id(), from, to, authority, &[], amount)
        .map_err(|e| LedgerError::Instruction(e.to_string()))
}

pub fn priority_ops(compute_limit: u32, price_micro_lamports: u64) -> [Instruction; 2] {
    [
        ComputeBudgetInstruction::set_compute_unit_limit(compute_limit),
        ComputeBudgetInstruction::set_compute_unit_price(price_micro_lamports),
    ]
}

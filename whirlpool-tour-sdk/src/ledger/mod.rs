//! Read and write access to the chain.
//!
//! Scripts and actions only talk to a [`Ledger`]. [`RpcLedger`] is the JSON-RPC
//! implementation used by the binary; tests run the same code against a local VM.

mod fetch;
mod rpc;

pub use fetch::*;
pub use rpc::RpcLedger;

use anyhow::Result;
use solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::{Transaction, TransactionError},
};

/// Server-side filter for program account scans.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccountFilter {
    DataSize(u64),
    Memcmp { offset: usize, bytes: Vec<u8> },
}

/// Outcome of a transaction simulation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Simulation {
    pub units_consumed: Option<u64>,
    pub logs: Vec<String>,
    pub err: Option<TransactionError>,
}

pub trait Ledger {
    fn get_balance(&self, address: &Pubkey) -> Result<u64>;

    fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;

    fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> Result<Vec<Option<Account>>>;

    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Account)>>;

    /// Token accounts of `owner` held under `token_program`.
    fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>>;

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64>;

    fn latest_blockhash(&self) -> Result<Hash>;

    /// Requests lamports from the faucet and waits until they are credited.
    fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<Signature>;

    /// Simulates without signature verification, replacing the blockhash.
    fn simulate_transaction(&self, transaction: &Transaction) -> Result<Simulation>;

    /// Recent per-slot prioritization fees (micro-lamports per compute unit) paid by
    /// transactions that locked all of `writable_accounts`.
    fn recent_prioritization_fees(&self, writable_accounts: &[Pubkey]) -> Result<Vec<u64>>;

    fn send_and_confirm_transaction(&self, transaction: &Transaction) -> Result<Signature>;
}

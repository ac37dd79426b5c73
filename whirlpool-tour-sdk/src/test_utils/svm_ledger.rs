use std::{cell::RefCell, collections::BTreeSet};

use anyhow::{Result, anyhow};
use borsh::BorshSerialize;
use litesvm::{
    LiteSVM,
    types::{FailedTransactionMetadata, TransactionMetadata},
};
use solana_sdk::{
    account::Account, hash::Hash, instruction::Instruction, program_pack::Pack, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use spl_token::state::Account as TokenAccount;

use super::test_vm::{create_mint, execute_instructions, get_token_balance, get_vm};
use crate::ledger::{AccountFilter, Ledger, Simulation};

/// [`Ledger`] backed by an in-process LiteSVM.
///
/// LiteSVM cannot scan accounts by owner, so every address seen in a transaction or
/// written directly is remembered and program account queries filter those.
pub struct SvmLedger {
    svm: RefCell<LiteSVM>,
    known_addresses: RefCell<BTreeSet<Pubkey>>,
    pub prioritization_fees: Vec<u64>,
}

impl SvmLedger {
    pub fn new(actors: Vec<Pubkey>) -> Self {
        Self {
            known_addresses: RefCell::new(actors.iter().copied().collect()),
            svm: RefCell::new(get_vm(actors)),
            prioritization_fees: Vec::new(),
        }
    }

    fn remember(&self, addresses: &[Pubkey]) {
        self.known_addresses.borrow_mut().extend(addresses.iter().copied());
    }

    pub fn execute(
        &self,
        instructions: Vec<Instruction>,
        payer: &Pubkey,
    ) -> Result<TransactionMetadata, FailedTransactionMetadata> {
        for instruction in &instructions {
            let keys: Vec<Pubkey> = instruction.accounts.iter().map(|meta| meta.pubkey).collect();
            self.remember(&keys);
        }
        execute_instructions(&mut self.svm.borrow_mut(), instructions, payer)
    }

    /// Writes a Borsh encoded program account, zero padded to `len` bytes.
    pub fn set_program_account<T: BorshSerialize>(
        &self,
        address: &Pubkey,
        owner: &Pubkey,
        data: &T,
        len: usize,
    ) {
        let mut bytes = borsh::to_vec(data).unwrap();
        bytes.resize(len.max(bytes.len()), 0);
        self.set_raw_account(address, owner, bytes);
    }

    pub fn set_raw_account(&self, address: &Pubkey, owner: &Pubkey, data: Vec<u8>) {
        let mut svm = self.svm.borrow_mut();
        let lamports = svm.minimum_balance_for_rent_exemption(data.len());
        svm.set_account(
            *address,
            Account {
                lamports,
                data,
                owner: *owner,
                executable: false,
                rent_epoch: 0,
            },
        )
        .unwrap();
        drop(svm);
        self.remember(&[*address]);
    }

    pub fn create_mint(&self, address: &Pubkey, authority: &Pubkey, decimals: u8) {
        self.remember(&[*address]);
        create_mint(&mut self.svm.borrow_mut(), address, authority, decimals);
    }

    pub fn token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> u64 {
        get_token_balance(&self.svm.borrow(), owner, mint)
    }
}

fn matches_filter(account: &Account, filter: &AccountFilter) -> bool {
    match filter {
        AccountFilter::DataSize(size) => account.data.len() as u64 == *size,
        AccountFilter::Memcmp { offset, bytes } => account
            .data
            .get(*offset..*offset + bytes.len())
            .is_some_and(|slice| slice == bytes.as_slice()),
    }
}

fn failure(err: FailedTransactionMetadata) -> anyhow::Error {
    anyhow!("transaction failed: {}\n{}", err.err, err.meta.pretty_logs())
}

impl Ledger for SvmLedger {
    fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        Ok(self.svm.borrow().get_balance(address).unwrap_or(0))
    }

    fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        Ok(self
            .svm
            .borrow()
            .get_account(address)
            .filter(|account| account.lamports > 0))
    }

    fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> Result<Vec<Option<Account>>> {
        addresses.iter().map(|address| self.get_account(address)).collect()
    }

    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Account)>> {
        let addresses: Vec<Pubkey> = self.known_addresses.borrow().iter().copied().collect();
        let mut accounts = Vec::new();
        for address in addresses {
            if let Some(account) = self.get_account(&address)? {
                if account.owner == *program_id
                    && filters.iter().all(|filter| matches_filter(&account, filter))
                {
                    accounts.push((address, account));
                }
            }
        }
        Ok(accounts)
    }

    fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>> {
        // the owner sits right after the mint
        self.get_program_accounts(
            token_program,
            &[
                AccountFilter::DataSize(TokenAccount::LEN as u64),
                AccountFilter::Memcmp {
                    offset: 32,
                    bytes: owner.to_bytes().to_vec(),
                },
            ],
        )
    }

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        Ok(self.svm.borrow().minimum_balance_for_rent_exemption(data_len))
    }

    fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.svm.borrow().latest_blockhash())
    }

    fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<Signature> {
        self.remember(&[*address]);
        let meta = self
            .svm
            .borrow_mut()
            .airdrop(address, lamports)
            .map_err(failure)?;
        Ok(meta.signature)
    }

    fn simulate_transaction(&self, transaction: &Transaction) -> Result<Simulation> {
        match self.svm.borrow().simulate_transaction(transaction.clone()) {
            Ok(info) => Ok(Simulation {
                units_consumed: Some(info.meta.compute_units_consumed),
                logs: info.meta.logs,
                err: None,
            }),
            Err(failed) => Ok(Simulation {
                units_consumed: Some(failed.meta.compute_units_consumed),
                logs: failed.meta.logs,
                err: Some(failed.err),
            }),
        }
    }

    fn recent_prioritization_fees(&self, _writable_accounts: &[Pubkey]) -> Result<Vec<u64>> {
        Ok(self.prioritization_fees.clone())
    }

    fn send_and_confirm_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.remember(&transaction.message.account_keys);
        let meta = self
            .svm
            .borrow_mut()
            .send_transaction(transaction.clone())
            .map_err(failure)?;
        Ok(meta.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ledger::fetch_token_accounts_by_owner,
        sender::{SenderConfig, build_and_send_transaction},
        test_utils::constants::*,
        token::create_ata_idempotent_instruction,
    };
    use solana_sdk::{signature::Keypair, signer::Signer, system_instruction};

    #[test]
    fn test_airdrop_then_balance() {
        let ledger = SvmLedger::new(vec![]);
        let wallet = Keypair::new();

        ledger.request_airdrop(&wallet.pubkey(), 1_000_000_000).unwrap();

        assert_eq!(ledger.get_balance(&wallet.pubkey()).unwrap(), 1_000_000_000);
    }

    #[test]
    fn test_token_accounts_by_owner() {
        let ledger = SvmLedger::new(vec![ALICE]);
        ledger.create_mint(&TOKEN_MINT_A, &ALICE, 6);
        ledger
            .execute(
                vec![
                    create_ata_idempotent_instruction(&ALICE, &ALICE, &TOKEN_MINT_A),
                    create_ata_idempotent_instruction(&ALICE, &BOB, &TOKEN_MINT_A),
                ],
                &ALICE,
            )
            .unwrap();

        let accounts = fetch_token_accounts_by_owner(&ledger, &BOB).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].1.mint, TOKEN_MINT_A);
        assert_eq!(accounts[0].1.owner, BOB);
    }

    #[test]
    fn test_build_and_send_sol_transfer() {
        let ledger = SvmLedger::new(vec![]);
        let wallet = Keypair::new();
        ledger.request_airdrop(&wallet.pubkey(), 1_000_000_000).unwrap();

        let signature = build_and_send_transaction(
            &ledger,
            &[system_instruction::transfer(&wallet.pubkey(), &BOB, 10_000_000)],
            &wallet,
            &[],
            &SenderConfig::default(),
        )
        .unwrap();

        assert_ne!(signature, Signature::default());
        assert_eq!(ledger.get_balance(&BOB).unwrap(), 10_000_000);
    }
}

use litesvm::{
    LiteSVM,
    types::{FailedTransactionMetadata, TransactionMetadata},
};
use litesvm_token::{get_spl_account, spl_token::state::Account};
use solana_sdk::{
    clock::Clock, instruction::Instruction, message::Message, native_token::LAMPORTS_PER_SOL,
    program_pack::Pack, pubkey::Pubkey, system_instruction::create_account,
    transaction::Transaction,
};
use spl_token::state::Mint;

use super::constants::*;
use crate::token::get_ata;

pub fn get_vm(actors: Vec<Pubkey>) -> LiteSVM {
    let mut svm = LiteSVM::new()
        .with_sigverify(false)
        .with_blockhash_check(false)
        .with_transaction_history(0);

    for actor in actors {
        svm.airdrop(&actor, 10 * LAMPORTS_PER_SOL).unwrap();
    }

    set_clock(&mut svm, CLOCK);

    svm
}

pub fn execute_instructions(
    svm: &mut LiteSVM,
    instructions: Vec<Instruction>,
    payer: &Pubkey,
) -> Result<TransactionMetadata, FailedTransactionMetadata> {
    let transaction = Transaction::new_unsigned(Message::new(&instructions, Some(payer)));

    let result = svm.send_transaction(transaction);

    if let Some(err) = result.as_ref().err() {
        println!("\nTransaction failed: {}\n", err.err);
        println!("{}", err.meta.pretty_logs());
    }

    result
}

pub fn set_clock(svm: &mut LiteSVM, unix_timestamp: i64) {
    let mut clock = svm.get_sysvar::<Clock>();
    clock.unix_timestamp = unix_timestamp;
    svm.set_sysvar(&clock);
}

pub fn create_mint(svm: &mut LiteSVM, address: &Pubkey, authority: &Pubkey, decimals: u8) {
    let ix1 = create_account(
        authority,
        address,
        svm.minimum_balance_for_rent_exemption(Mint::LEN),
        Mint::LEN as u64,
        &spl_token::ID,
    );

    let ix2 =
        spl_token::instruction::initialize_mint2(&spl_token::ID, address, authority, None, decimals)
            .unwrap();

    execute_instructions(svm, vec![ix1, ix2], authority).unwrap();
}

pub fn get_token_balance(svm: &LiteSVM, owner: &Pubkey, mint: &Pubkey) -> u64 {
    get_spl_account::<Account>(svm, &get_ata(owner, mint))
        .unwrap()
        .amount
}

use anyhow::Result;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    program_pack::Pack,
    pubkey,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_instruction, system_program,
};
use spl_token::state::Mint;

use crate::{
    ledger::Ledger,
    token::{create_ata_idempotent_instruction, get_ata},
};

/// Devnet program handing out the tour's dev tokens.
pub const DEV_TOKEN_DISTRIBUTOR_ID: Pubkey = pubkey!("Bu2AaWnVoveQT47wP4obpmmZUwK9bN9ah4w6Vaoa93Y9");
const DEV_TOKEN_DISTRIBUTOR_ADMIN: Pubkey = pubkey!("3otH3AHWqkqgSVfKFkrxyDqd2vK6LcaqigHrFEmWcGuo");
const DEV_TOKEN_DISTRIBUTOR_PDA: Pubkey = pubkey!("3pgfe1L6jcq59uy3LZmmeSCk9mwVvHXjn21nSvNr8D6x");

pub struct CreateMintInstructions {
    pub mint: Pubkey,
    pub instructions: Vec<Instruction>,
    pub additional_signers: Vec<Keypair>,
}

pub fn transfer_sol_instructions(from: &Pubkey, to: &Pubkey, lamports: u64) -> Vec<Instruction> {
    vec![system_instruction::transfer(from, to, lamports)]
}

/// Moves `amount` base units from the owner's associated account to the destination
/// owner's, creating the destination account when needed.
pub fn transfer_token_instructions(
    owner: &Pubkey,
    destination_owner: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let source = get_ata(owner, mint);
    let destination = get_ata(destination_owner, mint);

    Ok(vec![
        create_ata_idempotent_instruction(owner, destination_owner, mint),
        spl_token::instruction::transfer_checked(
            &spl_token::ID,
            &source,
            mint,
            &destination,
            owner,
            &[],
            amount,
            decimals,
        )?,
    ])
}

/// New mint with `authority` as mint authority and no freeze authority.
pub fn create_mint_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    authority: &Pubkey,
    decimals: u8,
) -> Result<CreateMintInstructions> {
    let mint = Keypair::new();
    let lamports = ledger.minimum_balance_for_rent_exemption(Mint::LEN)?;

    let instructions = vec![
        system_instruction::create_account(
            authority,
            &mint.pubkey(),
            lamports,
            Mint::LEN as u64,
            &spl_token::ID,
        ),
        spl_token::instruction::initialize_mint2(
            &spl_token::ID,
            &mint.pubkey(),
            authority,
            None,
            decimals,
        )?,
    ];

    Ok(CreateMintInstructions {
        mint: mint.pubkey(),
        instructions,
        additional_signers: vec![mint],
    })
}

/// Claims the distributor's allowance of `mint` into the user's associated account.
pub fn dev_token_instruction(user: &Pubkey, mint: &Pubkey) -> Instruction {
    Instruction {
        program_id: DEV_TOKEN_DISTRIBUTOR_ID,
        accounts: vec![
            AccountMeta::new_readonly(DEV_TOKEN_DISTRIBUTOR_ID, false),
            AccountMeta::new(get_ata(&DEV_TOKEN_DISTRIBUTOR_PDA, mint), false),
            AccountMeta::new_readonly(DEV_TOKEN_DISTRIBUTOR_PDA, false),
            AccountMeta::new(*user, true),
            AccountMeta::new(get_ata(user, mint), false),
            AccountMeta::new(DEV_TOKEN_DISTRIBUTOR_ADMIN, false),
            AccountMeta::new_readonly(spl_token::ID, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
        ],
        data: vec![],
    }
}

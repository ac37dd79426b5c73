use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::instruction_data;
use crate::{
    programs::{RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID, WHIRLPOOL_ID},
    types::WhirlpoolBumps,
};

pub const INITIALIZE_POOL_DISCRIMINATOR: [u8; 8] = [95, 180, 10, 172, 84, 174, 232, 40];
pub const INITIALIZE_TICK_ARRAY_DISCRIMINATOR: [u8; 8] = [11, 188, 193, 214, 141, 91, 149, 184];

#[derive(Clone, Debug)]
pub struct InitializePool {
    pub whirlpools_config: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub funder: Pubkey,
    pub whirlpool: Pubkey,
    /// Fresh keypair addresses, they sign the instruction.
    pub token_vault_a: Pubkey,
    pub token_vault_b: Pubkey,
    pub fee_tier: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct InitializePoolInstructionArgs {
    pub bumps: WhirlpoolBumps,
    pub tick_spacing: u16,
    pub initial_sqrt_price: u128,
}

impl InitializePool {
    pub fn instruction(
        &self,
        args: InitializePoolInstructionArgs,
    ) -> borsh::io::Result<Instruction> {
        Ok(Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: vec![
                AccountMeta::new_readonly(self.whirlpools_config, false),
                AccountMeta::new_readonly(self.token_mint_a, false),
                AccountMeta::new_readonly(self.token_mint_b, false),
                AccountMeta::new(self.funder, true),
                AccountMeta::new(self.whirlpool, false),
                AccountMeta::new(self.token_vault_a, true),
                AccountMeta::new(self.token_vault_b, true),
                AccountMeta::new_readonly(self.fee_tier, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            ],
            data: instruction_data(INITIALIZE_POOL_DISCRIMINATOR, &args)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct InitializeTickArray {
    pub whirlpool: Pubkey,
    pub funder: Pubkey,
    pub tick_array: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct InitializeTickArrayInstructionArgs {
    pub start_tick_index: i32,
}

impl InitializeTickArray {
    pub fn instruction(
        &self,
        args: InitializeTickArrayInstructionArgs,
    ) -> borsh::io::Result<Instruction> {
        Ok(Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: vec![
                AccountMeta::new_readonly(self.whirlpool, false),
                AccountMeta::new(self.funder, true),
                AccountMeta::new(self.tick_array, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
            data: instruction_data(INITIALIZE_TICK_ARRAY_DISCRIMINATOR, &args)?,
        })
    }
}

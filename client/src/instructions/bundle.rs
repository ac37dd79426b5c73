use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::instruction_data;
use crate::programs::{
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
    WHIRLPOOL_ID,
};

pub const INITIALIZE_POSITION_BUNDLE_DISCRIMINATOR: [u8; 8] =
    [117, 45, 241, 149, 24, 18, 194, 65];
pub const OPEN_BUNDLED_POSITION_DISCRIMINATOR: [u8; 8] = [169, 113, 126, 171, 213, 172, 212, 49];

#[derive(Clone, Debug)]
pub struct InitializePositionBundle {
    pub position_bundle: Pubkey,
    pub position_bundle_mint: Pubkey,
    pub position_bundle_token_account: Pubkey,
    pub position_bundle_owner: Pubkey,
    pub funder: Pubkey,
}

impl InitializePositionBundle {
    pub fn instruction(&self) -> Instruction {
        Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: vec![
                AccountMeta::new(self.position_bundle, false),
                AccountMeta::new(self.position_bundle_mint, true),
                AccountMeta::new(self.position_bundle_token_account, false),
                AccountMeta::new_readonly(self.position_bundle_owner, false),
                AccountMeta::new(self.funder, true),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
                AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            ],
            data: INITIALIZE_POSITION_BUNDLE_DISCRIMINATOR.to_vec(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct OpenBundledPosition {
    pub bundled_position: Pubkey,
    pub position_bundle: Pubkey,
    pub position_bundle_token_account: Pubkey,
    pub position_bundle_authority: Pubkey,
    pub whirlpool: Pubkey,
    pub funder: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct OpenBundledPositionInstructionArgs {
    pub bundle_index: u16,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
}

impl OpenBundledPosition {
    pub fn instruction(
        &self,
        args: OpenBundledPositionInstructionArgs,
    ) -> borsh::io::Result<Instruction> {
        Ok(Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: vec![
                AccountMeta::new(self.bundled_position, false),
                AccountMeta::new(self.position_bundle, false),
                AccountMeta::new_readonly(self.position_bundle_token_account, false),
                AccountMeta::new_readonly(self.position_bundle_authority, true),
                AccountMeta::new_readonly(self.whirlpool, false),
                AccountMeta::new(self.funder, true),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            ],
            data: instruction_data(OPEN_BUNDLED_POSITION_DISCRIMINATOR, &args)?,
        })
    }
}

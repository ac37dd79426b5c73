use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::instruction_data;
use crate::programs::{TOKEN_PROGRAM_ID, WHIRLPOOL_ID};

pub const SWAP_DISCRIMINATOR: [u8; 8] = [248, 198, 158, 145, 225, 117, 135, 200];

/// Accounts of the `swap` instruction, in program order.
#[derive(Clone, Debug)]
pub struct Swap {
    pub token_authority: Pubkey,
    pub whirlpool: Pubkey,
    pub token_owner_account_a: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_owner_account_b: Pubkey,
    pub token_vault_b: Pubkey,
    pub tick_array0: Pubkey,
    pub tick_array1: Pubkey,
    pub tick_array2: Pubkey,
    pub oracle: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct SwapInstructionArgs {
    pub amount: u64,
    pub other_amount_threshold: u64,
    /// 0 lets the program pick the bound in the swap direction.
    pub sqrt_price_limit: u128,
    pub amount_specified_is_input: bool,
    pub a_to_b: bool,
}

impl Swap {
    pub fn instruction(
        &self,
        args: SwapInstructionArgs,
    ) -> borsh::io::Result<Instruction> {
        let accounts = vec![
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(self.token_authority, true),
            AccountMeta::new(self.whirlpool, false),
            AccountMeta::new(self.token_owner_account_a, false),
            AccountMeta::new(self.token_vault_a, false),
            AccountMeta::new(self.token_owner_account_b, false),
            AccountMeta::new(self.token_vault_b, false),
            AccountMeta::new(self.tick_array0, false),
            AccountMeta::new(self.tick_array1, false),
            AccountMeta::new(self.tick_array2, false),
            AccountMeta::new(self.oracle, false),
        ];

        Ok(Instruction {
            program_id: WHIRLPOOL_ID,
            accounts,
            data: instruction_data(SWAP_DISCRIMINATOR, &args)?,
        })
    }
}

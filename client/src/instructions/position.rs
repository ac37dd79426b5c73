use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::instruction_data;
use crate::{
    programs::{
        ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
        WHIRLPOOL_ID,
    },
    types::OpenPositionBumps,
};

pub const OPEN_POSITION_DISCRIMINATOR: [u8; 8] = [135, 128, 47, 77, 15, 152, 240, 49];
pub const INCREASE_LIQUIDITY_DISCRIMINATOR: [u8; 8] = [46, 156, 243, 118, 13, 205, 251, 178];
pub const DECREASE_LIQUIDITY_DISCRIMINATOR: [u8; 8] = [160, 38, 208, 111, 104, 91, 44, 1];
pub const UPDATE_FEES_AND_REWARDS_DISCRIMINATOR: [u8; 8] =
    [154, 230, 250, 13, 236, 209, 75, 223];
pub const COLLECT_FEES_DISCRIMINATOR: [u8; 8] = [164, 152, 207, 99, 30, 186, 19, 182];
pub const COLLECT_REWARD_DISCRIMINATOR: [u8; 8] = [70, 5, 132, 87, 86, 235, 177, 34];
pub const CLOSE_POSITION_DISCRIMINATOR: [u8; 8] = [123, 134, 81, 0, 49, 68, 98, 98];

#[derive(Clone, Debug)]
pub struct OpenPosition {
    pub funder: Pubkey,
    pub owner: Pubkey,
    pub position: Pubkey,
    pub position_mint: Pubkey,
    pub position_token_account: Pubkey,
    pub whirlpool: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct OpenPositionInstructionArgs {
    pub bumps: OpenPositionBumps,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
}

impl OpenPosition {
    pub fn instruction(
        &self,
        args: OpenPositionInstructionArgs,
    ) -> borsh::io::Result<Instruction> {
        Ok(Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: vec![
                AccountMeta::new(self.funder, true),
                AccountMeta::new_readonly(self.owner, false),
                AccountMeta::new(self.position, false),
                AccountMeta::new(self.position_mint, true),
                AccountMeta::new(self.position_token_account, false),
                AccountMeta::new_readonly(self.whirlpool, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
                AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            ],
            data: instruction_data(OPEN_POSITION_DISCRIMINATOR, &args)?,
        })
    }
}

/// Accounts shared by `increase_liquidity` and `decrease_liquidity`.
#[derive(Clone, Debug)]
pub struct ModifyLiquidity {
    pub whirlpool: Pubkey,
    pub position_authority: Pubkey,
    pub position: Pubkey,
    pub position_token_account: Pubkey,
    pub token_owner_account_a: Pubkey,
    pub token_owner_account_b: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_vault_b: Pubkey,
    pub tick_array_lower: Pubkey,
    pub tick_array_upper: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct IncreaseLiquidityInstructionArgs {
    pub liquidity_amount: u128,
    pub token_max_a: u64,
    pub token_max_b: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct DecreaseLiquidityInstructionArgs {
    pub liquidity_amount: u128,
    pub token_min_a: u64,
    pub token_min_b: u64,
}

impl ModifyLiquidity {
    fn account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.whirlpool, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(self.position_authority, true),
            AccountMeta::new(self.position, false),
            AccountMeta::new_readonly(self.position_token_account, false),
            AccountMeta::new(self.token_owner_account_a, false),
            AccountMeta::new(self.token_owner_account_b, false),
            AccountMeta::new(self.token_vault_a, false),
            AccountMeta::new(self.token_vault_b, false),
            AccountMeta::new(self.tick_array_lower, false),
            AccountMeta::new(self.tick_array_upper, false),
        ]
    }

    pub fn increase_instruction(
        &self,
        args: IncreaseLiquidityInstructionArgs,
    ) -> borsh::io::Result<Instruction> {
        Ok(Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: self.account_metas(),
            data: instruction_data(INCREASE_LIQUIDITY_DISCRIMINATOR, &args)?,
        })
    }

    pub fn decrease_instruction(
        &self,
        args: DecreaseLiquidityInstructionArgs,
    ) -> borsh::io::Result<Instruction> {
        Ok(Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: self.account_metas(),
            data: instruction_data(DECREASE_LIQUIDITY_DISCRIMINATOR, &args)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct UpdateFeesAndRewards {
    pub whirlpool: Pubkey,
    pub position: Pubkey,
    pub tick_array_lower: Pubkey,
    pub tick_array_upper: Pubkey,
}

impl UpdateFeesAndRewards {
    pub fn instruction(&self) -> Instruction {
        Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: vec![
                AccountMeta::new(self.whirlpool, false),
                AccountMeta::new(self.position, false),
                AccountMeta::new_readonly(self.tick_array_lower, false),
                AccountMeta::new_readonly(self.tick_array_upper, false),
            ],
            data: UPDATE_FEES_AND_REWARDS_DISCRIMINATOR.to_vec(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CollectFees {
    pub whirlpool: Pubkey,
    pub position_authority: Pubkey,
    pub position: Pubkey,
    pub position_token_account: Pubkey,
    pub token_owner_account_a: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_owner_account_b: Pubkey,
    pub token_vault_b: Pubkey,
}

impl CollectFees {
    pub fn instruction(&self) -> Instruction {
        Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: vec![
                AccountMeta::new_readonly(self.whirlpool, false),
                AccountMeta::new_readonly(self.position_authority, true),
                AccountMeta::new(self.position, false),
                AccountMeta::new_readonly(self.position_token_account, false),
                AccountMeta::new(self.token_owner_account_a, false),
                AccountMeta::new(self.token_vault_a, false),
                AccountMeta::new(self.token_owner_account_b, false),
                AccountMeta::new(self.token_vault_b, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            ],
            data: COLLECT_FEES_DISCRIMINATOR.to_vec(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CollectReward {
    pub whirlpool: Pubkey,
    pub position_authority: Pubkey,
    pub position: Pubkey,
    pub position_token_account: Pubkey,
    pub reward_owner_account: Pubkey,
    pub reward_vault: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct CollectRewardInstructionArgs {
    pub reward_index: u8,
}

impl CollectReward {
    pub fn instruction(
        &self,
        args: CollectRewardInstructionArgs,
    ) -> borsh::io::Result<Instruction> {
        Ok(Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: vec![
                AccountMeta::new_readonly(self.whirlpool, false),
                AccountMeta::new_readonly(self.position_authority, true),
                AccountMeta::new(self.position, false),
                AccountMeta::new_readonly(self.position_token_account, false),
                AccountMeta::new(self.reward_owner_account, false),
                AccountMeta::new(self.reward_vault, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            ],
            data: instruction_data(COLLECT_REWARD_DISCRIMINATOR, &args)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ClosePosition {
    pub position_authority: Pubkey,
    pub receiver: Pubkey,
    pub position: Pubkey,
    pub position_mint: Pubkey,
    pub position_token_account: Pubkey,
}

impl ClosePosition {
    pub fn instruction(&self) -> Instruction {
        Instruction {
            program_id: WHIRLPOOL_ID,
            accounts: vec![
                AccountMeta::new_readonly(self.position_authority, true),
                AccountMeta::new(self.receiver, false),
                AccountMeta::new(self.position, false),
                AccountMeta::new(self.position_mint, false),
                AccountMeta::new(self.position_token_account, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            ],
            data: CLOSE_POSITION_DISCRIMINATOR.to_vec(),
        }
    }
}

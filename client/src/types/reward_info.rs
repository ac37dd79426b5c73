use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WhirlpoolRewardInfo {
    /// Reward token mint, `Pubkey::default()` when the slot is unused.
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub authority: Pubkey,
    /// Q64.64 tokens emitted per second.
    pub emissions_per_second_x64: u128,
    /// Q64.64 reward tokens emitted per unit of liquidity since pool creation.
    pub growth_global_x64: u128,
}

impl WhirlpoolRewardInfo {
    pub fn initialized(&self) -> bool {
        self.mint != Pubkey::default()
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PositionRewardInfo {
    pub growth_inside_checkpoint: u128,
    pub amount_owed: u64,
}

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use super::check_discriminator;
use crate::types::{NUM_REWARDS, WhirlpoolRewardInfo};

pub const WHIRLPOOL_DISCRIMINATOR: [u8; 8] = [63, 149, 209, 12, 225, 128, 99, 9];

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Whirlpool {
    pub discriminator: [u8; 8],
    pub whirlpools_config: Pubkey,
    pub whirlpool_bump: [u8; 1],
    pub tick_spacing: u16,
    pub fee_tier_index_seed: [u8; 2],
    /// Hundredths of a basis point, i.e. per 1_000_000.
    pub fee_rate: u16,
    pub protocol_fee_rate: u16,
    pub liquidity: u128,
    /// Q64.64 square root of the price of token A in token B.
    pub sqrt_price: u128,
    pub tick_current_index: i32,
    pub protocol_fee_owed_a: u64,
    pub protocol_fee_owed_b: u64,
    pub token_mint_a: Pubkey,
    pub token_vault_a: Pubkey,
    pub fee_growth_global_a: u128,
    pub token_mint_b: Pubkey,
    pub token_vault_b: Pubkey,
    pub fee_growth_global_b: u128,
    pub reward_last_updated_timestamp: u64,
    pub reward_infos: [WhirlpoolRewardInfo; NUM_REWARDS],
}

impl Whirlpool {
    pub const LEN: usize = 653;

    #[inline(always)]
    pub fn from_bytes(data: &[u8]) -> Result<Self, std::io::Error> {
        let mut data = data;
        let whirlpool = Self::deserialize(&mut data)?;
        check_discriminator(&whirlpool.discriminator, &WHIRLPOOL_DISCRIMINATOR, "Whirlpool")?;
        Ok(whirlpool)
    }
}

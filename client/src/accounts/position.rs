use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use super::check_discriminator;
use crate::types::{NUM_REWARDS, PositionRewardInfo};

pub const POSITION_DISCRIMINATOR: [u8; 8] = [170, 188, 143, 228, 122, 64, 247, 208];

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub discriminator: [u8; 8],
    pub whirlpool: Pubkey,
    pub position_mint: Pubkey,
    pub liquidity: u128,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    pub fee_growth_checkpoint_a: u128,
    pub fee_owed_a: u64,
    pub fee_growth_checkpoint_b: u128,
    pub fee_owed_b: u64,
    pub reward_infos: [PositionRewardInfo; NUM_REWARDS],
}

impl Default for Position {
    fn default() -> Self {
        Self {
            discriminator: POSITION_DISCRIMINATOR,
            whirlpool: Pubkey::default(),
            position_mint: Pubkey::default(),
            liquidity: 0,
            tick_lower_index: 0,
            tick_upper_index: 0,
            fee_growth_checkpoint_a: 0,
            fee_owed_a: 0,
            fee_growth_checkpoint_b: 0,
            fee_owed_b: 0,
            reward_infos: [PositionRewardInfo::default(); NUM_REWARDS],
        }
    }
}

impl Position {
    pub const LEN: usize = 216;

    #[inline(always)]
    pub fn from_bytes(data: &[u8]) -> Result<Self, std::io::Error> {
        let mut data = data;
        let position = Self::deserialize(&mut data)?;
        check_discriminator(&position.discriminator, &POSITION_DISCRIMINATOR, "Position")?;
        Ok(position)
    }
}

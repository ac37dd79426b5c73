use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use super::check_discriminator;

pub const FEE_TIER_DISCRIMINATOR: [u8; 8] = [56, 75, 159, 76, 142, 68, 190, 105];

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct FeeTier {
    pub discriminator: [u8; 8],
    pub whirlpools_config: Pubkey,
    pub tick_spacing: u16,
    pub default_fee_rate: u16,
}

impl FeeTier {
    pub const LEN: usize = 44;

    #[inline(always)]
    pub fn from_bytes(data: &[u8]) -> Result<Self, std::io::Error> {
        let mut data = data;
        let fee_tier = Self::deserialize(&mut data)?;
        check_discriminator(&fee_tier.discriminator, &FEE_TIER_DISCRIMINATOR, "FeeTier")?;
        Ok(fee_tier)
    }
}

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use super::check_discriminator;

pub const POSITION_BUNDLE_DISCRIMINATOR: [u8; 8] = [129, 169, 175, 65, 185, 95, 32, 100];

/// Number of bundled positions a single bundle can hold, one bit each in the bitmap.
pub const POSITION_BUNDLE_SIZE: usize = 256;

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct PositionBundle {
    pub discriminator: [u8; 8],
    pub position_bundle_mint: Pubkey,
    pub position_bitmap: [u8; POSITION_BUNDLE_SIZE / 8],
}

impl PositionBundle {
    /// On-chain size, including 64 reserved bytes that are not decoded.
    pub const LEN: usize = 8 + 32 + 32 + 64;

    #[inline(always)]
    pub fn from_bytes(data: &[u8]) -> Result<Self, std::io::Error> {
        let mut data = data;
        let bundle = Self::deserialize(&mut data)?;
        check_discriminator(
            &bundle.discriminator,
            &POSITION_BUNDLE_DISCRIMINATOR,
            "PositionBundle",
        )?;
        Ok(bundle)
    }
}

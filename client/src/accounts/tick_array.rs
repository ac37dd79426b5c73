use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use super::check_discriminator;
use crate::types::Tick;

pub const TICK_ARRAY_DISCRIMINATOR: [u8; 8] = [69, 97, 189, 190, 110, 7, 66, 187];

/// Number of ticks stored in one tick array.
pub const TICK_ARRAY_SIZE: usize = 88;

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct TickArray {
    pub discriminator: [u8; 8],
    pub start_tick_index: i32,
    pub ticks: [Tick; TICK_ARRAY_SIZE],
    pub whirlpool: Pubkey,
}

impl TickArray {
    pub const LEN: usize = 9988;

    /// Byte offset of `whirlpool`, used to filter tick arrays of one pool.
    pub const WHIRLPOOL_OFFSET: usize = 8 + 4 + 113 * TICK_ARRAY_SIZE;

    #[inline(always)]
    pub fn from_bytes(data: &[u8]) -> Result<Self, std::io::Error> {
        let mut data = data;
        let tick_array = Self::deserialize(&mut data)?;
        check_discriminator(&tick_array.discriminator, &TICK_ARRAY_DISCRIMINATOR, "TickArray")?;
        Ok(tick_array)
    }

    /// An all-uninitialized array, standing in for tick arrays that do not exist yet.
    pub fn empty(whirlpool: Pubkey, start_tick_index: i32) -> Self {
        Self {
            discriminator: TICK_ARRAY_DISCRIMINATOR,
            start_tick_index,
            ticks: [Tick::default(); TICK_ARRAY_SIZE],
            whirlpool,
        }
    }
}

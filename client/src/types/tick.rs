use borsh::{BorshDeserialize, BorshSerialize};

use super::NUM_REWARDS;

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tick {
    pub initialized: bool,
    /// Amount of liquidity added (removed, if negative) when the tick is crossed going
    /// left to right.
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_a: u128,
    pub fee_growth_outside_b: u128,
    pub reward_growths_outside: [u128; NUM_REWARDS],
}

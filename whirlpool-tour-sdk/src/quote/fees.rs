use anyhow::Result;
use ruint::aliases::U256;
use whirlpool_tour_client::{
    accounts::{Position, Whirlpool},
    types::{NUM_REWARDS, Tick},
};

use super::math::{mul_div, mul_shift_right_64, to_u64};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CollectFeesQuote {
    pub fee_owed_a: u64,
    pub fee_owed_b: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CollectRewardQuote {
    pub rewards_owed: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CollectRewardsQuote {
    pub rewards: [CollectRewardQuote; NUM_REWARDS],
}

/// Growth accumulated inside `[lower, upper]` given the global growth and the
/// "outside" snapshots of both boundary ticks. All values wrap by construction.
fn growth_inside(
    tick_current_index: i32,
    tick_lower_index: i32,
    tick_upper_index: i32,
    growth_global: u128,
    growth_outside_lower: u128,
    growth_outside_upper: u128,
) -> u128 {
    let growth_below = if tick_current_index < tick_lower_index {
        growth_global.wrapping_sub(growth_outside_lower)
    } else {
        growth_outside_lower
    };

    let growth_above = if tick_current_index < tick_upper_index {
        growth_outside_upper
    } else {
        growth_global.wrapping_sub(growth_outside_upper)
    };

    growth_global
        .wrapping_sub(growth_below)
        .wrapping_sub(growth_above)
}

fn owed_since_checkpoint(growth_inside: u128, checkpoint: u128, liquidity: u128) -> Result<u64> {
    to_u64(mul_shift_right_64(growth_inside.wrapping_sub(checkpoint), liquidity)?)
}

/// Fees a position can collect right now, including fees accrued since its last update.
pub fn collect_fees_quote(
    whirlpool: &Whirlpool,
    position: &Position,
    tick_lower: &Tick,
    tick_upper: &Tick,
) -> Result<CollectFeesQuote> {
    let inside_a = growth_inside(
        whirlpool.tick_current_index,
        position.tick_lower_index,
        position.tick_upper_index,
        whirlpool.fee_growth_global_a,
        tick_lower.fee_growth_outside_a,
        tick_upper.fee_growth_outside_a,
    );
    let inside_b = growth_inside(
        whirlpool.tick_current_index,
        position.tick_lower_index,
        position.tick_upper_index,
        whirlpool.fee_growth_global_b,
        tick_lower.fee_growth_outside_b,
        tick_upper.fee_growth_outside_b,
    );

    let delta_a = owed_since_checkpoint(inside_a, position.fee_growth_checkpoint_a, position.liquidity)?;
    let delta_b = owed_since_checkpoint(inside_b, position.fee_growth_checkpoint_b, position.liquidity)?;

    Ok(CollectFeesQuote {
        fee_owed_a: position.fee_owed_a.saturating_add(delta_a),
        fee_owed_b: position.fee_owed_b.saturating_add(delta_b),
    })
}

/// Rewards a position can collect at `current_timestamp` (unix seconds). Emissions since
/// the pool's last reward update are accrued first.
pub fn collect_rewards_quote(
    whirlpool: &Whirlpool,
    position: &Position,
    tick_lower: &Tick,
    tick_upper: &Tick,
    current_timestamp: u64,
) -> Result<CollectRewardsQuote> {
    let elapsed = current_timestamp.saturating_sub(whirlpool.reward_last_updated_timestamp);
    let mut quote = CollectRewardsQuote::default();

    for (index, reward_info) in whirlpool.reward_infos.iter().enumerate() {
        if !reward_info.initialized() {
            continue;
        }

        let mut growth_global = reward_info.growth_global_x64;
        if whirlpool.liquidity != 0 {
            let growth_delta = mul_div(
                U256::from(reward_info.emissions_per_second_x64),
                U256::from(elapsed),
                U256::from(whirlpool.liquidity),
            )?;
            growth_global = growth_global.wrapping_add(growth_delta);
        }

        let inside = growth_inside(
            whirlpool.tick_current_index,
            position.tick_lower_index,
            position.tick_upper_index,
            growth_global,
            tick_lower.reward_growths_outside[index],
            tick_upper.reward_growths_outside[index],
        );

        let position_reward = &position.reward_infos[index];
        let delta = owed_since_checkpoint(
            inside,
            position_reward.growth_inside_checkpoint,
            position.liquidity,
        )?;

        quote.rewards[index].rewards_owed = position_reward.amount_owed.saturating_add(delta);
    }

    Ok(quote)
}

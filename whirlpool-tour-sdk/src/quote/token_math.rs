use anyhow::Result;
use ruint::aliases::U256;
use whirlpool_tour_client::errors::WhirlpoolError::*;

use super::{
    math::{mul_div, mul_div_round_up, to_u64},
    tick_math::{MAX_SQRT_PRICE, MIN_SQRT_PRICE},
};

/// Fee rates are expressed per million.
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;
pub const BPS_DENOMINATOR: u16 = 10_000;

fn order_sqrt_prices(sqrt_price_1: u128, sqrt_price_2: u128) -> (u128, u128) {
    if sqrt_price_1 < sqrt_price_2 {
        (sqrt_price_1, sqrt_price_2)
    } else {
        (sqrt_price_2, sqrt_price_1)
    }
}

/// Amount of token A backing `liquidity` between two sqrt prices.
pub fn try_get_amount_delta_a(
    sqrt_price_1: u128,
    sqrt_price_2: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64> {
    let (sqrt_price_lower, sqrt_price_upper) = order_sqrt_prices(sqrt_price_1, sqrt_price_2);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let numerator = U256::from(liquidity) << 64;
    let denominator = U256::from(sqrt_price_lower) * U256::from(sqrt_price_upper);

    let amount = if round_up {
        mul_div_round_up(numerator, U256::from(sqrt_price_diff), denominator)
    } else {
        mul_div(numerator, U256::from(sqrt_price_diff), denominator)
    }
    .map_err(|_| AmountCalcOverflow)?;

    to_u64(amount)
}

/// Amount of token B backing `liquidity` between two sqrt prices.
pub fn try_get_amount_delta_b(
    sqrt_price_1: u128,
    sqrt_price_2: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64> {
    let (sqrt_price_lower, sqrt_price_upper) = order_sqrt_prices(sqrt_price_1, sqrt_price_2);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(liquidity) * U256::from(sqrt_price_diff);
    let quotient = product >> 64usize;
    let has_remainder = !(product & U256::from(u64::MAX)).is_zero();

    let amount: u128 = quotient.try_into().map_err(|_| AmountCalcOverflow)?;
    if round_up && has_remainder {
        to_u64(amount + 1)
    } else {
        to_u64(amount)
    }
}

fn check_sqrt_price_bounds(sqrt_price: u128) -> Result<u128> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return Err(SqrtPriceOutOfBounds.into());
    }
    Ok(sqrt_price)
}

/// Sqrt price reached after adding (input) or removing (output) `amount` of token A.
pub fn try_get_next_sqrt_price_from_a(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    specified_input: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }

    let liquidity_shifted = U256::from(liquidity) << 64usize;
    let product = U256::from(sqrt_price) * U256::from(amount);

    let denominator = if specified_input {
        liquidity_shifted + product
    } else {
        liquidity_shifted
            .checked_sub(product)
            .ok_or(DivideByZero)?
    };

    let next_sqrt_price = mul_div_round_up(liquidity_shifted, U256::from(sqrt_price), denominator)?;
    check_sqrt_price_bounds(next_sqrt_price)
}

/// Sqrt price reached after adding (input) or removing (output) `amount` of token B.
pub fn try_get_next_sqrt_price_from_b(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    specified_input: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }
    if liquidity == 0 {
        return Err(DivideByZero.into());
    }

    let amount_shifted = U256::from(amount) << 64usize;
    let (quotient, remainder) = amount_shifted.div_rem(U256::from(liquidity));
    let delta = if !specified_input && !remainder.is_zero() {
        quotient + U256::from(1u8)
    } else {
        quotient
    };

    let next_sqrt_price = if specified_input {
        U256::from(sqrt_price) + delta
    } else {
        U256::from(sqrt_price)
            .checked_sub(delta)
            .ok_or(SqrtPriceOutOfBounds)?
    };

    check_sqrt_price_bounds(next_sqrt_price.try_into().map_err(|_| SqrtPriceOutOfBounds)?)
}

/// Amount left for the swap once the fee (rounded up) is taken out.
pub fn try_apply_swap_fee(amount: u64, fee_rate: u16) -> Result<u64> {
    let fee_amount = (amount as u128 * fee_rate as u128).div_ceil(FEE_RATE_DENOMINATOR as u128);
    Ok(amount - to_u64(fee_amount)?)
}

/// Gross amount that leaves `amount` after the fee is taken out.
pub fn try_reverse_apply_swap_fee(amount: u64, fee_rate: u16) -> Result<u64> {
    if fee_rate as u32 >= FEE_RATE_DENOMINATOR {
        return Err(FeeRateMaxExceeded.into());
    }
    if fee_rate == 0 {
        return Ok(amount);
    }

    let numerator = amount as u128 * FEE_RATE_DENOMINATOR as u128;
    let denominator = (FEE_RATE_DENOMINATOR - fee_rate as u32) as u128;
    to_u64(numerator.div_ceil(denominator))
}

/// Upper bound accepted for `amount` with a slippage tolerance in basis points (rounded up).
pub fn try_get_max_amount_with_slippage_tolerance(amount: u64, slippage_tolerance_bps: u16) -> Result<u64> {
    let numerator = amount as u128 * (BPS_DENOMINATOR as u128 + slippage_tolerance_bps as u128);
    to_u64(numerator.div_ceil(BPS_DENOMINATOR as u128))
}

/// Lower bound accepted for `amount` with a slippage tolerance in basis points (rounded down).
pub fn try_get_min_amount_with_slippage_tolerance(amount: u64, slippage_tolerance_bps: u16) -> u64 {
    let bps = slippage_tolerance_bps.min(BPS_DENOMINATOR) as u128;
    (amount as u128 * (BPS_DENOMINATOR as u128 - bps) / BPS_DENOMINATOR as u128) as u64
}

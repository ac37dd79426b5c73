use anyhow::Result;
use ruint::aliases::{U256, U512};
use whirlpool_tour_client::errors::WhirlpoolError::*;

use super::{
    tick_math::{order_tick_indexes, tick_index_to_sqrt_price},
    token_math::{
        try_get_amount_delta_a, try_get_amount_delta_b, try_get_max_amount_with_slippage_tolerance,
        try_get_min_amount_with_slippage_tolerance,
    },
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IncreaseLiquidityQuote {
    pub liquidity_delta: u128,
    pub token_est_a: u64,
    pub token_est_b: u64,
    pub token_max_a: u64,
    pub token_max_b: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DecreaseLiquidityQuote {
    pub liquidity_delta: u128,
    pub token_est_a: u64,
    pub token_est_b: u64,
    pub token_min_a: u64,
    pub token_min_b: u64,
}

/// Token amounts held by `liquidity` over a tick range at the current pool price.
pub fn get_token_estimates_from_liquidity(
    liquidity: u128,
    current_sqrt_price: u128,
    tick_lower_index: i32,
    tick_upper_index: i32,
    round_up: bool,
) -> Result<(u64, u64)> {
    let sqrt_price_lower = tick_index_to_sqrt_price(tick_lower_index)?;
    let sqrt_price_upper = tick_index_to_sqrt_price(tick_upper_index)?;

    if current_sqrt_price < sqrt_price_lower {
        let token_a = try_get_amount_delta_a(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok((token_a, 0))
    } else if current_sqrt_price < sqrt_price_upper {
        let token_a = try_get_amount_delta_a(current_sqrt_price, sqrt_price_upper, liquidity, round_up)?;
        let token_b = try_get_amount_delta_b(sqrt_price_lower, current_sqrt_price, liquidity, round_up)?;
        Ok((token_a, token_b))
    } else {
        let token_b = try_get_amount_delta_b(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok((0, token_b))
    }
}

fn liquidity_from_a(token_amount: u64, sqrt_price_lower: u128, sqrt_price_upper: u128) -> Result<u128> {
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;
    if sqrt_price_diff == 0 {
        return Err(DivideByZero.into());
    }

    let product = U512::from(token_amount) * U512::from(sqrt_price_lower) * U512::from(sqrt_price_upper);
    let liquidity = (product / U512::from(sqrt_price_diff)) >> 64usize;

    liquidity.try_into().map_err(|_| LiquidityOverflow.into())
}

fn liquidity_from_b(token_amount: u64, sqrt_price_lower: u128, sqrt_price_upper: u128) -> Result<u128> {
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;
    if sqrt_price_diff == 0 {
        return Err(DivideByZero.into());
    }

    ((U256::from(token_amount) << 64usize) / U256::from(sqrt_price_diff))
        .try_into()
        .map_err(|_| LiquidityOverflow.into())
}

/// Token estimates and slippage-adjusted maximums to deposit `liquidity_delta`.
pub fn increase_liquidity_quote(
    liquidity_delta: u128,
    slippage_tolerance_bps: u16,
    current_sqrt_price: u128,
    tick_index_1: i32,
    tick_index_2: i32,
) -> Result<IncreaseLiquidityQuote> {
    if liquidity_delta == 0 {
        return Ok(IncreaseLiquidityQuote::default());
    }

    let (tick_lower_index, tick_upper_index) = order_tick_indexes(tick_index_1, tick_index_2);
    let (token_est_a, token_est_b) = get_token_estimates_from_liquidity(
        liquidity_delta,
        current_sqrt_price,
        tick_lower_index,
        tick_upper_index,
        true,
    )?;

    Ok(IncreaseLiquidityQuote {
        liquidity_delta,
        token_est_a,
        token_est_b,
        token_max_a: try_get_max_amount_with_slippage_tolerance(token_est_a, slippage_tolerance_bps)?,
        token_max_b: try_get_max_amount_with_slippage_tolerance(token_est_b, slippage_tolerance_bps)?,
    })
}

/// Quote for depositing `token_amount_a` of token A. Empty when the range lies entirely
/// below the current price, since such a position holds no token A.
pub fn increase_liquidity_quote_a(
    token_amount_a: u64,
    slippage_tolerance_bps: u16,
    current_sqrt_price: u128,
    tick_index_1: i32,
    tick_index_2: i32,
) -> Result<IncreaseLiquidityQuote> {
    let (tick_lower_index, tick_upper_index) = order_tick_indexes(tick_index_1, tick_index_2);
    let sqrt_price_lower = tick_index_to_sqrt_price(tick_lower_index)?;
    let sqrt_price_upper = tick_index_to_sqrt_price(tick_upper_index)?;

    if current_sqrt_price >= sqrt_price_upper {
        return Ok(IncreaseLiquidityQuote::default());
    }

    let liquidity = if current_sqrt_price < sqrt_price_lower {
        liquidity_from_a(token_amount_a, sqrt_price_lower, sqrt_price_upper)?
    } else {
        liquidity_from_a(token_amount_a, current_sqrt_price, sqrt_price_upper)?
    };

    increase_liquidity_quote(
        liquidity,
        slippage_tolerance_bps,
        current_sqrt_price,
        tick_lower_index,
        tick_upper_index,
    )
}

/// Quote for depositing `token_amount_b` of token B. Empty when the range lies entirely
/// above the current price.
pub fn increase_liquidity_quote_b(
    token_amount_b: u64,
    slippage_tolerance_bps: u16,
    current_sqrt_price: u128,
    tick_index_1: i32,
    tick_index_2: i32,
) -> Result<IncreaseLiquidityQuote> {
    let (tick_lower_index, tick_upper_index) = order_tick_indexes(tick_index_1, tick_index_2);
    let sqrt_price_lower = tick_index_to_sqrt_price(tick_lower_index)?;
    let sqrt_price_upper = tick_index_to_sqrt_price(tick_upper_index)?;

    if current_sqrt_price <= sqrt_price_lower {
        return Ok(IncreaseLiquidityQuote::default());
    }

    let liquidity = liquidity_from_b(
        token_amount_b,
        sqrt_price_lower,
        current_sqrt_price.min(sqrt_price_upper),
    )?;

    increase_liquidity_quote(
        liquidity,
        slippage_tolerance_bps,
        current_sqrt_price,
        tick_lower_index,
        tick_upper_index,
    )
}

/// Token estimates and slippage-adjusted minimums when withdrawing `liquidity_delta`.
pub fn decrease_liquidity_quote(
    liquidity_delta: u128,
    slippage_tolerance_bps: u16,
    current_sqrt_price: u128,
    tick_index_1: i32,
    tick_index_2: i32,
) -> Result<DecreaseLiquidityQuote> {
    if liquidity_delta == 0 {
        return Ok(DecreaseLiquidityQuote::default());
    }

    let (tick_lower_index, tick_upper_index) = order_tick_indexes(tick_index_1, tick_index_2);
    let (token_est_a, token_est_b) = get_token_estimates_from_liquidity(
        liquidity_delta,
        current_sqrt_price,
        tick_lower_index,
        tick_upper_index,
        false,
    )?;

    Ok(DecreaseLiquidityQuote {
        liquidity_delta,
        token_est_a,
        token_est_b,
        token_min_a: try_get_min_amount_with_slippage_tolerance(token_est_a, slippage_tolerance_bps),
        token_min_b: try_get_min_amount_with_slippage_tolerance(token_est_b, slippage_tolerance_bps),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQRT_PRICE_AT_0: u128 = 1 << 64;

    #[test]
    fn test_quote_b_below_range_is_empty() {
        let quote = increase_liquidity_quote_b(1_000_000, 100, SQRT_PRICE_AT_0, 64, 128).unwrap();
        assert_eq!(quote, IncreaseLiquidityQuote::default());
    }

    #[test]
    fn test_quote_a_above_range_is_empty() {
        let quote = increase_liquidity_quote_a(1_000_000, 100, SQRT_PRICE_AT_0, -128, -64).unwrap();
        assert_eq!(quote, IncreaseLiquidityQuote::default());
    }

    #[test]
    fn test_quote_b_in_range() {
        let quote = increase_liquidity_quote_b(1_000_000, 100, SQRT_PRICE_AT_0, -640, 640).unwrap();
        assert!(quote.liquidity_delta > 0);
        // the deposit is rounded in favour of the pool, within one unit of the request
        assert!(quote.token_est_b >= 999_999 && quote.token_est_b <= 1_000_001);
        assert!(quote.token_est_a > 0);
        assert!(quote.token_max_b >= quote.token_est_b * 101 / 100);
    }

    #[test]
    fn test_quote_a_below_range_only_uses_a() {
        let quote = increase_liquidity_quote_a(1_000_000, 0, SQRT_PRICE_AT_0, 64, 640).unwrap();
        assert_eq!(quote.token_est_b, 0);
        assert!(quote.token_est_a <= 1_000_001);
        assert_eq!(quote.token_max_a, quote.token_est_a);
    }

    #[test]
    fn test_decrease_rounds_down() {
        let increase = increase_liquidity_quote(1_000_000_000, 0, SQRT_PRICE_AT_0, -640, 640).unwrap();
        let decrease = decrease_liquidity_quote(1_000_000_000, 100, SQRT_PRICE_AT_0, 640, -640).unwrap();
        assert!(decrease.token_est_a <= increase.token_est_a);
        assert!(decrease.token_est_b <= increase.token_est_b);
        assert!(decrease.token_min_a <= decrease.token_est_a);
        assert_eq!(
            decrease_liquidity_quote(0, 100, SQRT_PRICE_AT_0, -640, 640).unwrap(),
            DecreaseLiquidityQuote::default()
        );
    }
}

use anyhow::Result;
use whirlpool_tour_client::{
    accounts::{TICK_ARRAY_SIZE, TickArray, Whirlpool},
    errors::WhirlpoolError::{self, *},
    types::Tick,
};

use super::{
    tick_math::{
        MAX_SQRT_PRICE, MIN_SQRT_PRICE, get_initializable_tick_index,
        get_next_initializable_tick_index, get_prev_initializable_tick_index,
        sqrt_price_to_tick_index, tick_index_to_sqrt_price,
    },
    token_math::{
        try_apply_swap_fee, try_get_amount_delta_a, try_get_amount_delta_b,
        try_get_max_amount_with_slippage_tolerance, try_get_min_amount_with_slippage_tolerance,
        try_get_next_sqrt_price_from_a, try_get_next_sqrt_price_from_b,
        try_reverse_apply_swap_fee,
    },
};

/// Consecutive tick arrays a swap may traverse, sorted by start index.
#[derive(Clone, Debug)]
pub struct TickArraySequence {
    tick_arrays: Vec<TickArray>,
    tick_spacing: u16,
}

impl TickArraySequence {
    pub fn new(mut tick_arrays: Vec<TickArray>, tick_spacing: u16) -> Result<Self> {
        if tick_arrays.is_empty() {
            return Err(InvalidTickArraySequence.into());
        }
        tick_arrays.sort_by_key(|tick_array| tick_array.start_tick_index);

        let ticks_in_array = TICK_ARRAY_SIZE as i32 * tick_spacing as i32;
        for window in tick_arrays.windows(2) {
            if window[1].start_tick_index != window[0].start_tick_index + ticks_in_array {
                return Err(InvalidTickArraySequence.into());
            }
        }

        Ok(Self {
            tick_arrays,
            tick_spacing,
        })
    }

    fn ticks_in_array(&self) -> i32 {
        TICK_ARRAY_SIZE as i32 * self.tick_spacing as i32
    }

    pub fn start_index(&self) -> i32 {
        self.tick_arrays[0].start_tick_index
    }

    pub fn end_index(&self) -> i32 {
        self.tick_arrays[self.tick_arrays.len() - 1].start_tick_index + self.ticks_in_array() - 1
    }

    pub fn tick(&self, tick_index: i32) -> Result<&Tick> {
        if tick_index < self.start_index() || tick_index > self.end_index() {
            return Err(TickArraySequenceInvalidIndex.into());
        }
        if tick_index % self.tick_spacing as i32 != 0 {
            return Err(InvalidTickIndex.into());
        }

        let offset = tick_index - self.start_index();
        let tick_array = &self.tick_arrays[(offset / self.ticks_in_array()) as usize];
        let index_in_array = (offset % self.ticks_in_array()) / self.tick_spacing as i32;
        Ok(&tick_array.ticks[index_in_array as usize])
    }

    /// First initialized tick strictly above `tick_index`, or the sequence end without a tick.
    pub fn next_initialized_tick(&self, tick_index: i32) -> Result<(Option<&Tick>, i32)> {
        let end_index = self.end_index();
        let mut next_index = tick_index;
        loop {
            next_index = get_next_initializable_tick_index(next_index, self.tick_spacing);
            if next_index > end_index {
                return Ok((None, end_index));
            }
            let tick = self.tick(next_index)?;
            if tick.initialized {
                return Ok((Some(tick), next_index));
            }
        }
    }

    /// Last initialized tick at or below `tick_index`, or the sequence start without a tick.
    pub fn prev_initialized_tick(&self, tick_index: i32) -> Result<(Option<&Tick>, i32)> {
        let start_index = self.start_index();
        let mut prev_index = get_initializable_tick_index(tick_index, self.tick_spacing, Some(false));
        loop {
            if prev_index < start_index {
                return Ok((None, start_index));
            }
            let tick = self.tick(prev_index)?;
            if tick.initialized {
                return Ok((Some(tick), prev_index));
            }
            prev_index = get_prev_initializable_tick_index(prev_index, self.tick_spacing);
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExactInSwapQuote {
    pub token_in: u64,
    pub token_est_out: u64,
    pub token_min_out: u64,
    pub trade_fee: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExactOutSwapQuote {
    pub token_out: u64,
    pub token_est_in: u64,
    pub token_max_in: u64,
    pub trade_fee: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SwapResult {
    pub token_a: u64,
    pub token_b: u64,
    pub trade_fee: u64,
    pub next_sqrt_price: u128,
    pub next_tick_index: i32,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct SwapStepQuote {
    amount_in: u64,
    amount_out: u64,
    next_sqrt_price: u128,
    fee_amount: u64,
}

/// Quote a swap where the input amount is fixed. `specified_token_a` selects the input mint.
pub fn swap_quote_by_input_token(
    token_in: u64,
    specified_token_a: bool,
    slippage_tolerance_bps: u16,
    whirlpool: &Whirlpool,
    tick_sequence: &TickArraySequence,
) -> Result<ExactInSwapQuote> {
    let a_to_b = specified_token_a;
    let result = compute_swap(token_in, 0, whirlpool, tick_sequence, a_to_b, true)?;

    let (token_in, token_est_out) = if a_to_b {
        (result.token_a, result.token_b)
    } else {
        (result.token_b, result.token_a)
    };

    Ok(ExactInSwapQuote {
        token_in,
        token_est_out,
        token_min_out: try_get_min_amount_with_slippage_tolerance(token_est_out, slippage_tolerance_bps),
        trade_fee: result.trade_fee,
    })
}

/// Quote a swap where the output amount is fixed. `specified_token_a` selects the output mint.
pub fn swap_quote_by_output_token(
    token_out: u64,
    specified_token_a: bool,
    slippage_tolerance_bps: u16,
    whirlpool: &Whirlpool,
    tick_sequence: &TickArraySequence,
) -> Result<ExactOutSwapQuote> {
    let a_to_b = !specified_token_a;
    let result = compute_swap(token_out, 0, whirlpool, tick_sequence, a_to_b, false)?;

    let (token_est_in, token_out) = if a_to_b {
        (result.token_a, result.token_b)
    } else {
        (result.token_b, result.token_a)
    };

    Ok(ExactOutSwapQuote {
        token_out,
        token_est_in,
        token_max_in: try_get_max_amount_with_slippage_tolerance(token_est_in, slippage_tolerance_bps)?,
        trade_fee: result.trade_fee,
    })
}

/// Walk the tick sequence until `token_amount` is consumed or the price limit is reached.
/// A `sqrt_price_limit` of 0 means the price bound in the swap direction.
pub fn compute_swap(
    token_amount: u64,
    sqrt_price_limit: u128,
    whirlpool: &Whirlpool,
    tick_sequence: &TickArraySequence,
    a_to_b: bool,
    specified_input: bool,
) -> Result<SwapResult> {
    let sqrt_price_limit = match (sqrt_price_limit, a_to_b) {
        (0, true) => MIN_SQRT_PRICE,
        (0, false) => MAX_SQRT_PRICE,
        (limit, _) => limit,
    };

    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price_limit) {
        return Err(SqrtPriceOutOfBounds.into());
    }
    if (a_to_b && sqrt_price_limit > whirlpool.sqrt_price)
        || (!a_to_b && sqrt_price_limit < whirlpool.sqrt_price)
    {
        return Err(InvalidSqrtPriceLimitDirection.into());
    }
    if token_amount == 0 {
        return Err(ZeroTradableAmount.into());
    }

    let mut amount_remaining = token_amount;
    let mut amount_calculated = 0u64;
    let mut current_sqrt_price = whirlpool.sqrt_price;
    let mut current_tick_index = whirlpool.tick_current_index;
    let mut current_liquidity = whirlpool.liquidity;
    let mut trade_fee = 0u64;

    while amount_remaining > 0 && sqrt_price_limit != current_sqrt_price {
        let (next_tick, next_tick_index) = if a_to_b {
            tick_sequence.prev_initialized_tick(current_tick_index)?
        } else {
            tick_sequence.next_initialized_tick(current_tick_index)?
        };

        let next_tick_sqrt_price = tick_index_to_sqrt_price(next_tick_index)?;
        let target_sqrt_price = if a_to_b {
            next_tick_sqrt_price.max(sqrt_price_limit)
        } else {
            next_tick_sqrt_price.min(sqrt_price_limit)
        };

        let step = compute_swap_step(
            amount_remaining,
            whirlpool.fee_rate,
            current_liquidity,
            current_sqrt_price,
            target_sqrt_price,
            a_to_b,
            specified_input,
        )?;

        trade_fee = trade_fee.checked_add(step.fee_amount).ok_or(AmountCalcOverflow)?;

        if specified_input {
            amount_remaining = amount_remaining
                .checked_sub(step.amount_in)
                .and_then(|amount| amount.checked_sub(step.fee_amount))
                .ok_or(AmountRemainingOverflow)?;
            amount_calculated = amount_calculated
                .checked_add(step.amount_out)
                .ok_or(AmountCalcOverflow)?;
        } else {
            amount_remaining = amount_remaining
                .checked_sub(step.amount_out)
                .ok_or(AmountRemainingOverflow)?;
            amount_calculated = amount_calculated
                .checked_add(step.amount_in)
                .and_then(|amount| amount.checked_add(step.fee_amount))
                .ok_or(AmountCalcOverflow)?;
        }

        if step.next_sqrt_price == next_tick_sqrt_price {
            // edge of the loaded tick arrays: more arrays are needed to go further
            if next_tick.is_none() && amount_remaining > 0 && next_tick_sqrt_price != sqrt_price_limit {
                return Err(TickArraySequenceInvalidIndex.into());
            }
            current_liquidity = get_next_liquidity(current_liquidity, next_tick, a_to_b)?;
            current_tick_index = if a_to_b {
                next_tick_index - 1
            } else {
                next_tick_index
            };
        } else if step.next_sqrt_price != current_sqrt_price {
            current_tick_index = sqrt_price_to_tick_index(step.next_sqrt_price)?;
        }

        current_sqrt_price = step.next_sqrt_price;
    }

    let swapped_amount = token_amount - amount_remaining;
    let (token_a, token_b) = if a_to_b == specified_input {
        (swapped_amount, amount_calculated)
    } else {
        (amount_calculated, swapped_amount)
    };

    Ok(SwapResult {
        token_a,
        token_b,
        trade_fee,
        next_sqrt_price: current_sqrt_price,
        next_tick_index: current_tick_index,
    })
}

fn get_next_liquidity(current_liquidity: u128, next_tick: Option<&Tick>, a_to_b: bool) -> Result<u128> {
    let liquidity_net = next_tick.map_or(0, |tick| tick.liquidity_net);
    let liquidity_net_abs = liquidity_net.unsigned_abs();

    // crossing right to left subtracts the net liquidity
    let adds = (liquidity_net < 0) == a_to_b;
    if adds {
        current_liquidity
            .checked_add(liquidity_net_abs)
            .ok_or(LiquidityOverflow.into())
    } else {
        current_liquidity
            .checked_sub(liquidity_net_abs)
            .ok_or(LiquidityUnderflow.into())
    }
}

fn is_amount_overflow(err: &anyhow::Error) -> bool {
    err.downcast_ref::<WhirlpoolError>()
        .is_some_and(|e| *e == AmountCalcOverflow)
}

fn compute_swap_step(
    amount_remaining: u64,
    fee_rate: u16,
    current_liquidity: u128,
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    a_to_b: bool,
    specified_input: bool,
) -> Result<SwapStepQuote> {
    // An overflow only means the target price cannot be reached with a u64 amount
    let initial_amount_fixed_delta = match get_amount_fixed_delta(
        current_sqrt_price,
        target_sqrt_price,
        current_liquidity,
        a_to_b,
        specified_input,
    ) {
        Ok(amount) => Some(amount),
        Err(err) if is_amount_overflow(&err) => None,
        Err(err) => return Err(err),
    };

    let amount_calculated = if specified_input {
        try_apply_swap_fee(amount_remaining, fee_rate)?
    } else {
        amount_remaining
    };

    let next_sqrt_price = match initial_amount_fixed_delta {
        Some(amount) if amount <= amount_calculated => target_sqrt_price,
        _ => get_next_sqrt_price(
            current_sqrt_price,
            current_liquidity,
            amount_calculated,
            a_to_b,
            specified_input,
        )?,
    };

    let is_max_swap = next_sqrt_price == target_sqrt_price;

    let amount_unfixed_delta = get_amount_unfixed_delta(
        current_sqrt_price,
        next_sqrt_price,
        current_liquidity,
        a_to_b,
        specified_input,
    )?;

    let amount_fixed_delta = match initial_amount_fixed_delta {
        Some(amount) if is_max_swap => amount,
        _ => get_amount_fixed_delta(
            current_sqrt_price,
            next_sqrt_price,
            current_liquidity,
            a_to_b,
            specified_input,
        )?,
    };

    let (amount_in, mut amount_out) = if specified_input {
        (amount_fixed_delta, amount_unfixed_delta)
    } else {
        (amount_unfixed_delta, amount_fixed_delta)
    };

    if !specified_input && amount_out > amount_remaining {
        amount_out = amount_remaining;
    }

    let fee_amount = if specified_input && !is_max_swap {
        amount_remaining - amount_in
    } else {
        try_reverse_apply_swap_fee(amount_in, fee_rate)? - amount_in
    };

    Ok(SwapStepQuote {
        amount_in,
        amount_out,
        next_sqrt_price,
        fee_amount,
    })
}

// The fixed side is the token whose amount was specified by the caller.
fn get_amount_fixed_delta(
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    liquidity: u128,
    a_to_b: bool,
    specified_input: bool,
) -> Result<u64> {
    if a_to_b == specified_input {
        try_get_amount_delta_a(current_sqrt_price, target_sqrt_price, liquidity, specified_input)
    } else {
        try_get_amount_delta_b(current_sqrt_price, target_sqrt_price, liquidity, specified_input)
    }
}

fn get_amount_unfixed_delta(
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    liquidity: u128,
    a_to_b: bool,
    specified_input: bool,
) -> Result<u64> {
    if a_to_b == specified_input {
        try_get_amount_delta_b(current_sqrt_price, target_sqrt_price, liquidity, !specified_input)
    } else {
        try_get_amount_delta_a(current_sqrt_price, target_sqrt_price, liquidity, !specified_input)
    }
}

fn get_next_sqrt_price(
    current_sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    a_to_b: bool,
    specified_input: bool,
) -> Result<u128> {
    if a_to_b == specified_input {
        try_get_next_sqrt_price_from_a(current_sqrt_price, liquidity, amount, specified_input)
    } else {
        try_get_next_sqrt_price_from_b(current_sqrt_price, liquidity, amount, specified_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{tick_array_with_liquidity, whirlpool_at_tick};

    const TICK_SPACING: u16 = 64;

    fn sequence(starts: &[i32], liquidity: u128) -> TickArraySequence {
        TickArraySequence::new(
            starts
                .iter()
                .map(|start| tick_array_with_liquidity(*start, TICK_SPACING, liquidity))
                .collect(),
            TICK_SPACING,
        )
        .unwrap()
    }

    #[test]
    fn test_sequence_must_be_contiguous() {
        let arrays = vec![
            tick_array_with_liquidity(0, TICK_SPACING, 0),
            tick_array_with_liquidity(11_264, TICK_SPACING, 0),
        ];
        assert!(TickArraySequence::new(arrays, TICK_SPACING).is_err());
        assert!(TickArraySequence::new(vec![], TICK_SPACING).is_err());
    }

    #[test]
    fn test_sequence_navigation() {
        let sequence = sequence(&[-5_632, 0, 5_632], 0);
        assert_eq!(sequence.start_index(), -5_632);
        assert_eq!(sequence.end_index(), 11_263);
        assert!(sequence.tick(11_264).is_err());

        // no initialized ticks: the walk stops at the sequence edges
        let (tick, index) = sequence.next_initialized_tick(0).unwrap();
        assert!(tick.is_none());
        assert_eq!(index, 11_263);
        let (tick, index) = sequence.prev_initialized_tick(0).unwrap();
        assert!(tick.is_none());
        assert_eq!(index, -5_632);
    }

    #[test]
    fn test_exact_in_b_to_a_within_one_array() {
        let liquidity = 1_000_000_000_000;
        let whirlpool = whirlpool_at_tick(0, TICK_SPACING, liquidity, 3_000);
        let sequence = sequence(&[0, 5_632, 11_264], 0);

        let quote = swap_quote_by_input_token(100_000, false, 100, &whirlpool, &sequence).unwrap();
        assert_eq!(quote.token_in, 100_000);
        assert_eq!(quote.trade_fee, 300);
        // price ~1, so output is close to the input minus the fee
        assert!(quote.token_est_out > 99_000 && quote.token_est_out < 99_700);
        assert_eq!(quote.token_min_out, quote.token_est_out * 9_900 / 10_000);
    }

    #[test]
    fn test_exact_out_a_to_b() {
        let liquidity = 1_000_000_000_000;
        let whirlpool = whirlpool_at_tick(0, TICK_SPACING, liquidity, 3_000);
        let sequence = sequence(&[0, -5_632, -11_264], 0);

        let quote = swap_quote_by_output_token(50_000, false, 100, &whirlpool, &sequence).unwrap();
        assert_eq!(quote.token_out, 50_000);
        assert!(quote.token_est_in > 50_000);
        assert!(quote.token_max_in >= quote.token_est_in);
        assert!(quote.trade_fee > 0);
    }

    #[test]
    fn test_running_out_of_tick_arrays() {
        let whirlpool = whirlpool_at_tick(0, TICK_SPACING, 1_000, 3_000);
        let sequence = sequence(&[0], 0);

        let err = swap_quote_by_input_token(u64::MAX / 2, false, 100, &whirlpool, &sequence).unwrap_err();
        assert_eq!(
            err.downcast_ref::<WhirlpoolError>(),
            Some(&TickArraySequenceInvalidIndex)
        );
    }

    #[test]
    fn test_zero_amount() {
        let whirlpool = whirlpool_at_tick(0, TICK_SPACING, 1_000, 3_000);
        let sequence = sequence(&[0], 0);
        let err = compute_swap(0, 0, &whirlpool, &sequence, true, true).unwrap_err();
        assert_eq!(err.downcast_ref::<WhirlpoolError>(), Some(&ZeroTradableAmount));
    }
}

use anyhow::Result;
use ruint::aliases::{U256, U512};
use whirlpool_tour_client::errors::WhirlpoolError;

/// `x * y / denominator` with a 512-bit intermediate product, rounded down.
pub fn mul_div(x: U256, y: U256, denominator: U256) -> Result<u128> {
    if denominator.is_zero() {
        return Err(WhirlpoolError::DivideByZero.into());
    }

    let prod = U512::from(x).wrapping_mul(U512::from(y));
    let (quotient, _) = prod.div_rem(U512::from(denominator));

    quotient
        .try_into()
        .map_err(|_| WhirlpoolError::MulDivOverflow.into())
}

/// `x * y / denominator` rounded up.
pub fn mul_div_round_up(x: U256, y: U256, denominator: U256) -> Result<u128> {
    if denominator.is_zero() {
        return Err(WhirlpoolError::DivideByZero.into());
    }

    let prod = U512::from(x).wrapping_mul(U512::from(y));
    let (quotient, remainder) = prod.div_rem(U512::from(denominator));

    let quotient: u128 = quotient
        .try_into()
        .map_err(|_| WhirlpoolError::MulDivOverflow)?;

    if remainder.is_zero() {
        Ok(quotient)
    } else {
        quotient
            .checked_add(1)
            .ok_or(WhirlpoolError::MulDivOverflow.into())
    }
}

/// `(x * y) >> 64`, the product of two Q64.64 values (or a Q64.64 value and an integer).
pub fn mul_shift_right_64(x: u128, y: u128) -> Result<u128> {
    ((U256::from(x) * U256::from(y)) >> 64usize)
        .try_into()
        .map_err(|_| WhirlpoolError::MultiplicationShiftRightOverflow.into())
}

pub fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| WhirlpoolError::AmountCalcOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounding() {
        let (x, y, d) = (U256::from(10u8), U256::from(10u8), U256::from(3u8));
        assert_eq!(mul_div(x, y, d).unwrap(), 33);
        assert_eq!(mul_div_round_up(x, y, d).unwrap(), 34);
        assert_eq!(mul_div_round_up(x, y, U256::from(4u8)).unwrap(), 25);
    }

    #[test]
    fn test_mul_div_errors() {
        let err = mul_div(U256::from(1u8), U256::from(1u8), U256::ZERO).unwrap_err();
        assert_eq!(
            err.downcast_ref::<WhirlpoolError>(),
            Some(&WhirlpoolError::DivideByZero)
        );

        let big = U256::from(u128::MAX);
        let err = mul_div(big, big, U256::from(1u8)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<WhirlpoolError>(),
            Some(&WhirlpoolError::MulDivOverflow)
        );
    }

    #[test]
    fn test_mul_shift_right_64() {
        assert_eq!(mul_shift_right_64(3 << 64, 5).unwrap(), 15);
        assert!(to_u64(u64::MAX as u128 + 1).is_err());
    }
}

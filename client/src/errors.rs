use num_derive::FromPrimitive;
use solana_program::program_error::ProgramError;
use thiserror::Error;

/// Custom error codes returned by the Whirlpool program.
///
/// The same variants are used by the off-chain quote math so that a failed quote and a
/// failed simulation read the same way.
#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum WhirlpoolError {
    /// 6000 - Enum value could not be converted
    #[error("Enum value could not be converted")]
    InvalidEnum = 0x1770,
    /// 6001 - Invalid start tick index provided.
    #[error("Invalid start tick index provided.")]
    InvalidStartTick = 0x1771,
    /// 6002 - Tick-array already exists in this whirlpool
    #[error("Tick-array already exists in this whirlpool")]
    TickArrayExistInPool = 0x1772,
    /// 6003 - Attempt to search for a tick-array failed
    #[error("Attempt to search for a tick-array failed")]
    TickArrayIndexOutofBounds = 0x1773,
    /// 6004 - Tick-spacing is not supported
    #[error("Tick-spacing is not supported")]
    InvalidTickSpacing = 0x1774,
    /// 6005 - Position is not empty It cannot be closed
    #[error("Position is not empty It cannot be closed")]
    ClosePositionNotEmpty = 0x1775,
    /// 6006 - Unable to divide by zero
    #[error("Unable to divide by zero")]
    DivideByZero = 0x1776,
    /// 6007 - Unable to cast number into BigInt
    #[error("Unable to cast number into BigInt")]
    NumberCastError = 0x1777,
    /// 6008 - Unable to down cast number
    #[error("Unable to down cast number")]
    NumberDownCastError = 0x1778,
    /// 6009 - Tick not found within tick array
    #[error("Tick not found within tick array")]
    TickNotFound = 0x1779,
    /// 6010 - Provided tick index is either out of bounds or uninitializable
    #[error("Provided tick index is either out of bounds or uninitializable")]
    InvalidTickIndex = 0x177a,
    /// 6011 - Provided sqrt price out of bounds
    #[error("Provided sqrt price out of bounds")]
    SqrtPriceOutOfBounds = 0x177b,
    /// 6012 - Liquidity amount must be greater than zero
    #[error("Liquidity amount must be greater than zero")]
    LiquidityZero = 0x177c,
    /// 6013 - Liquidity amount must be less than i64::MAX
    #[error("Liquidity amount must be less than i64::MAX")]
    LiquidityTooHigh = 0x177d,
    /// 6014 - Liquidity overflow
    #[error("Liquidity overflow")]
    LiquidityOverflow = 0x177e,
    /// 6015 - Liquidity underflow
    #[error("Liquidity underflow")]
    LiquidityUnderflow = 0x177f,
    /// 6016 - Tick liquidity net underflowed or overflowed
    #[error("Tick liquidity net underflowed or overflowed")]
    LiquidityNetError = 0x1780,
    /// 6017 - Exceeded token max
    #[error("Exceeded token max")]
    TokenMaxExceeded = 0x1781,
    /// 6018 - Did not meet token min
    #[error("Did not meet token min")]
    TokenMinSubceeded = 0x1782,
    /// 6019 - Position token account has a missing or invalid delegate
    #[error("Position token account has a missing or invalid delegate")]
    MissingOrInvalidDelegate = 0x1783,
    /// 6020 - Position token amount must be 1
    #[error("Position token amount must be 1")]
    InvalidPositionTokenAmount = 0x1784,
    /// 6021 - Timestamp should be convertible from i64 to u64
    #[error("Timestamp should be convertible from i64 to u64")]
    InvalidTimestampConversion = 0x1785,
    /// 6022 - Timestamp should be greater than the last updated timestamp
    #[error("Timestamp should be greater than the last updated timestamp")]
    InvalidTimestamp = 0x1786,
    /// 6023 - Invalid tick array sequence provided for instruction.
    #[error("Invalid tick array sequence provided for instruction.")]
    InvalidTickArraySequence = 0x1787,
    /// 6024 - Token Mint in wrong order
    #[error("Token Mint in wrong order")]
    InvalidTokenMintOrder = 0x1788,
    /// 6025 - Reward not initialized
    #[error("Reward not initialized")]
    RewardNotInitialized = 0x1789,
    /// 6026 - Invalid reward index
    #[error("Invalid reward index")]
    InvalidRewardIndex = 0x178a,
    /// 6027 - Reward vault requires amount to support emissions for at least one day
    #[error("Reward vault requires amount to support emissions for at least one day")]
    RewardVaultAmountInsufficient = 0x178b,
    /// 6028 - Exceeded max fee rate
    #[error("Exceeded max fee rate")]
    FeeRateMaxExceeded = 0x178c,
    /// 6029 - Exceeded max protocol fee rate
    #[error("Exceeded max protocol fee rate")]
    ProtocolFeeRateMaxExceeded = 0x178d,
    /// 6030 - Multiplication with shift right overflow
    #[error("Multiplication with shift right overflow")]
    MultiplicationShiftRightOverflow = 0x178e,
    /// 6031 - Muldiv overflow
    #[error("Muldiv overflow")]
    MulDivOverflow = 0x178f,
    /// 6032 - Invalid div_u256 input
    #[error("Invalid div_u256 input")]
    MulDivInvalidInput = 0x1790,
    /// 6033 - Multiplication overflow
    #[error("Multiplication overflow")]
    MultiplicationOverflow = 0x1791,
    /// 6034 - Provided SqrtPriceLimit not in the same direction as the swap.
    #[error("Provided SqrtPriceLimit not in the same direction as the swap.")]
    InvalidSqrtPriceLimitDirection = 0x1792,
    /// 6035 - There are no tradable amount to swap.
    #[error("There are no tradable amount to swap.")]
    ZeroTradableAmount = 0x1793,
    /// 6036 - Amount out below minimum threshold
    #[error("Amount out below minimum threshold")]
    AmountOutBelowMinimum = 0x1794,
    /// 6037 - Amount in above maximum threshold
    #[error("Amount in above maximum threshold")]
    AmountInAboveMaximum = 0x1795,
    /// 6038 - Invalid index for tick array sequence
    #[error("Invalid index for tick array sequence")]
    TickArraySequenceInvalidIndex = 0x1796,
    /// 6039 - Amount calculated overflows
    #[error("Amount calculated overflows")]
    AmountCalcOverflow = 0x1797,
    /// 6040 - Amount remaining overflows
    #[error("Amount remaining overflows")]
    AmountRemainingOverflow = 0x1798,
    /// 6041 - Invalid intermediary mint
    #[error("Invalid intermediary mint")]
    InvalidIntermediaryMint = 0x1799,
    /// 6042 - Duplicate two hop pool
    #[error("Duplicate two hop pool")]
    DuplicateTwoHopPool = 0x179a,
    /// 6043 - Bundle index is out of bounds
    #[error("Bundle index is out of bounds")]
    InvalidBundleIndex = 0x179b,
    /// 6044 - Position has already been opened
    #[error("Position has already been opened")]
    BundledPositionAlreadyOpened = 0x179c,
    /// 6045 - Position has already been closed
    #[error("Position has already been closed")]
    BundledPositionAlreadyClosed = 0x179d,
    /// 6046 - Unable to delete PositionBundle with open positions
    #[error("Unable to delete PositionBundle with open positions")]
    PositionBundleNotDeletable = 0x179e,
}

impl From<WhirlpoolError> for ProgramError {
    fn from(e: WhirlpoolError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

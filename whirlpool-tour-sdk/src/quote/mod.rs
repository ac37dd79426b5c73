//! Off-chain Whirlpool math: Q64.64 prices, liquidity and swap quotes, fee and reward accrual.

pub mod bundle;
pub mod fees;
pub mod liquidity;
pub mod math;
pub mod swap_math;
pub mod tick_math;
pub mod token_math;

pub use bundle::*;
pub use fees::*;
pub use liquidity::*;
pub use swap_math::{
    ExactInSwapQuote, ExactOutSwapQuote, TickArraySequence, swap_quote_by_input_token,
    swap_quote_by_output_token,
};
pub use tick_math::*;

mod bumps;
mod reward_info;
mod tick;

pub use bumps::*;
pub use reward_info::*;
pub use tick::*;

/// Number of reward slots carried by every whirlpool and position.
pub const NUM_REWARDS: usize = 3;

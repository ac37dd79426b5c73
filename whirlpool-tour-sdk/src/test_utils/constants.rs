use solana_sdk::{pubkey, pubkey::Pubkey};

// Actors
pub const ALICE: Pubkey = pubkey!("7ZJRjoNm7DjokzybCnaMqJ9bNQWTPkW4BuackD6zr9PD");
pub const BOB: Pubkey = pubkey!("7dFTnr8mvkHEQABLrsnybnHAm84HhEAJdn4ZpMccEhHh");

// Pool accounts, mint A sorts before mint B
pub const TOKEN_MINT_A: Pubkey = pubkey!("3CtwCcU8LKdLkb8fLjutPK5D3AYG5HZWUVCHvoerTMKH");
pub const TOKEN_MINT_B: Pubkey = pubkey!("9dDkU81CEPAXMZUye7tUFgC67xe9sy3bCVRCYwb8f2S1");
pub const TOKEN_VAULT_A: Pubkey = pubkey!("6QKxp3SuinsUaVWBAo1xMVwjx8oujEWw7NkdM1VSdWGZ");
pub const TOKEN_VAULT_B: Pubkey = pubkey!("7X6F5FSJsWDvKH8PXPAAnksqDDuTcJY7VgW1YgbBEa44");
pub const POOL: Pubkey = pubkey!("8bmLCMDMxfrQC9R1rdMVj7SQotmDpqBe6tSqY1LXLLVJ");
pub const POSITION_MINT: Pubkey = pubkey!("Aj73gBnE3QH5n6QuBvx2wS1JuXd6m9U9sxVd7Yznt1SA");

pub const TICK_SPACING: u16 = 64;
pub const FEE_RATE: u16 = 3_000; // 0.3%

// Test settings
pub const CLOCK: i64 = 1_700_000_000;

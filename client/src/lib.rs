pub mod accounts;
pub mod errors;
pub mod instructions;
pub mod pda;
pub mod programs;
pub mod types;

pub use programs::WHIRLPOOL_ID;

pub mod actions;
pub mod cli;
pub mod config;
pub mod i18n;
pub mod ledger;
pub mod quote;
pub mod report;
pub mod scripts;
pub mod sender;
pub mod token;
pub mod wallet;

#[cfg(test)]
mod test_utils;

use std::{path::PathBuf, str::FromStr, time::Duration};

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;
use whirlpool_tour_client::pda::get_position_address;

use crate::{i18n::Lang, sender::SenderConfig};

pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_WALLET_PATH: &str = "wallet.json";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),
    #[error("environment variable {name} is not a valid address: {value}")]
    InvalidAddress { name: &'static str, value: String },
    #[error("cannot read wallet {path}: {message}")]
    Wallet { path: String, message: String },
}

/// Settings of one run, built once at start-up.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub rpc_url: String,
    pub ws_url: Option<String>,
    pub wallet_path: PathBuf,
    pub lang: Lang,
    pub dry_run: bool,
    pub confirm_timeout: Duration,
    pub whirlpool_position: Option<String>,
    pub position_mint: Option<String>,
    pub position_bundle: Option<String>,
    pub pool_address: Option<String>,
    pub sender: SenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEVNET_RPC_URL.to_string(),
            ws_url: None,
            wallet_path: PathBuf::from(DEFAULT_WALLET_PATH),
            lang: Lang::En,
            dry_run: false,
            confirm_timeout: Duration::from_secs(60),
            whirlpool_position: None,
            position_mint: None,
            position_bundle: None,
            pool_address: None,
            sender: SenderConfig::default(),
        }
    }
}

impl Config {
    /// Position address from `WHIRLPOOL_POSITION`, or derived from `POSITION_MINT`.
    pub fn position_address(&self) -> Result<Pubkey, ConfigError> {
        match (&self.whirlpool_position, &self.position_mint) {
            (Some(position), _) => parse_address("WHIRLPOOL_POSITION", Some(position)),
            (None, Some(mint)) => {
                let mint = parse_address("POSITION_MINT", Some(mint))?;
                Ok(get_position_address(&mint).0)
            }
            (None, None) => Err(ConfigError::MissingVariable("WHIRLPOOL_POSITION")),
        }
    }

    pub fn position_bundle_address(&self) -> Result<Pubkey, ConfigError> {
        parse_address("WHIRLPOOL_POSITION_BUNDLE", self.position_bundle.as_deref())
    }

    pub fn pool_address(&self) -> Result<Pubkey, ConfigError> {
        parse_address("POOL_ADDRESS", self.pool_address.as_deref())
    }
}

pub fn parse_address(name: &'static str, value: Option<&str>) -> Result<Pubkey, ConfigError> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVariable(name))?;

    Pubkey::from_str(value).map_err(|_| ConfigError::InvalidAddress {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey;

    const POSITION: Pubkey = pubkey!("9bGk6SZKpEaxC2vqsUBV4RtDfMHbB5H8v4f5DAmLPvNR");

    #[test]
    fn test_missing_address() {
        let config = Config::default();

        assert_eq!(
            config.position_address(),
            Err(ConfigError::MissingVariable("WHIRLPOOL_POSITION"))
        );
        assert_eq!(
            config.position_bundle_address(),
            Err(ConfigError::MissingVariable("WHIRLPOOL_POSITION_BUNDLE"))
        );
        assert_eq!(
            config.pool_address().unwrap_err().to_string(),
            "environment variable POOL_ADDRESS is not set"
        );
        assert_eq!(
            parse_address("POOL_ADDRESS", Some("  ")),
            Err(ConfigError::MissingVariable("POOL_ADDRESS"))
        );
    }

    #[test]
    fn test_invalid_address() {
        assert_eq!(
            parse_address("POOL_ADDRESS", Some("not-an-address")),
            Err(ConfigError::InvalidAddress {
                name: "POOL_ADDRESS",
                value: "not-an-address".to_string()
            })
        );
    }

    #[test]
    fn test_position_address() {
        let config = Config {
            whirlpool_position: Some(POSITION.to_string()),
            ..Config::default()
        };
        assert_eq!(config.position_address(), Ok(POSITION));

        let mint = Pubkey::new_unique();
        let config = Config {
            position_mint: Some(mint.to_string()),
            ..Config::default()
        };
        assert_eq!(config.position_address(), Ok(get_position_address(&mint).0));
    }
}

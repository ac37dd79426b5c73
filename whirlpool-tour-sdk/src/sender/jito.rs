use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use solana_sdk::{hash::Hash, pubkey, pubkey::Pubkey};

pub const JITO_TIP_FLOOR_URL: &str = "https://bundles.jito.wtf/api/v1/bundles/tip_floor";

pub const JITO_TIP_ACCOUNTS: [Pubkey; 8] = [
    pubkey!("96gYZGLnJYVFmbjzopPSU6QiEV5fGqZNyN9nmNhvrZU5"),
    pubkey!("HFqU5x63VTqvQss8hp11i4wVV8bD44PvwucfZ2bU7gRe"),
    pubkey!("Cw8CFyM9FkoMi7K7Crf6HNQqf4uEMzpKw6QNghXLvLkY"),
    pubkey!("ADaUMid9yfUytqMBgopwjb2DTLSokTSzL1zt6iGPaS49"),
    pubkey!("DfXygSm4jCyNCybVYYK6DwvWqjKee8pbDmJGcLWNDXjh"),
    pubkey!("ADuUkR4vqLUMWXxW9gh6D6L8pMSawimctcNZ5pGwDcEt"),
    pubkey!("DttWaMuVvTiduZRnguLF7jNxTgiMBZ1hyAumKUiL2KRL"),
    pubkey!("3AVi9Tg9Uo68tJfuvoKvqKNWKkC5wPdSSdeBnizKZ6jT"),
];

/// Which landed-tip statistic of the tip floor to pay.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum JitoPercentile {
    P25,
    #[default]
    P50,
    P50Ema,
    P75,
    P95,
    P99,
}

/// One entry of the tip-floor API response. Values are in SOL.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TipFloor {
    pub landed_tips_25th_percentile: f64,
    pub landed_tips_50th_percentile: f64,
    pub landed_tips_75th_percentile: f64,
    pub landed_tips_95th_percentile: f64,
    pub landed_tips_99th_percentile: f64,
    pub ema_landed_tips_50th_percentile: f64,
}

impl TipFloor {
    pub fn lamports(&self, percentile: JitoPercentile) -> u64 {
        let sol = match percentile {
            JitoPercentile::P25 => self.landed_tips_25th_percentile,
            JitoPercentile::P50 => self.landed_tips_50th_percentile,
            JitoPercentile::P50Ema => self.ema_landed_tips_50th_percentile,
            JitoPercentile::P75 => self.landed_tips_75th_percentile,
            JitoPercentile::P95 => self.landed_tips_95th_percentile,
            JitoPercentile::P99 => self.landed_tips_99th_percentile,
        };

        (sol * 1e9).round() as u64
    }
}

pub fn fetch_tip_floor(url: &str) -> Result<TipFloor> {
    let client = reqwest::blocking::ClientBuilder::new()
        .use_rustls_tls()
        .build()?;

    let floors: Vec<TipFloor> = client
        .get(url)
        .header("Content-Type", "application/json")
        .send()?
        .error_for_status()?
        .json()
        .context("invalid tip floor response")?;

    floors
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("tip floor response is empty"))
}

/// Tip account picked from the first byte of the blockhash.
pub fn tip_account(blockhash: &Hash) -> Pubkey {
    JITO_TIP_ACCOUNTS[blockhash.as_ref()[0] as usize % JITO_TIP_ACCOUNTS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIP_FLOOR_BODY: &str = r#"[{
        "time": "2024-09-01T12:58:00Z",
        "landed_tips_25th_percentile": 0.000001,
        "landed_tips_50th_percentile": 0.00001,
        "landed_tips_75th_percentile": 0.0000365,
        "landed_tips_95th_percentile": 0.0014479,
        "landed_tips_99th_percentile": 0.01,
        "ema_landed_tips_50th_percentile": 0.0000194
    }]"#;

    #[test]
    fn test_fetch_tip_floor() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v1/bundles/tip_floor")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TIP_FLOOR_BODY)
            .create();

        let floor =
            fetch_tip_floor(&format!("{}/api/v1/bundles/tip_floor", server.url())).unwrap();

        mock.assert();
        assert_eq!(floor.lamports(JitoPercentile::P25), 1_000);
        assert_eq!(floor.lamports(JitoPercentile::P50), 10_000);
        assert_eq!(floor.lamports(JitoPercentile::P50Ema), 19_400);
        assert_eq!(floor.lamports(JitoPercentile::P99), 10_000_000);
    }

    #[test]
    fn test_fetch_tip_floor_empty() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/").with_body("[]").create();

        assert!(fetch_tip_floor(&server.url()).is_err());
    }

    #[test]
    fn test_tip_account() {
        let mut bytes = [0u8; 32];
        bytes[0] = 10;
        assert_eq!(tip_account(&Hash::new_from_array(bytes)), JITO_TIP_ACCOUNTS[2]);
    }
}

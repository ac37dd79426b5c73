use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    config::{Config, DEFAULT_WALLET_PATH, DEVNET_RPC_URL},
    i18n::Lang,
    sender::{JitoPercentile, JitoTipSetting, PriorityFeeSetting, SenderConfig},
};

/// Percentile of recent prioritization fees used by dynamic priority fees.
pub const PRIORITY_FEE_PERCENTILE: u8 = 50;
/// Upper bound of the total priority fee of one transaction.
pub const PRIORITY_FEE_MAX_CAP_LAMPORTS: u64 = 5_000_000;

/// Guided tour of the Whirlpool program on Solana devnet.
///
/// Every subcommand is one step of the tour: read balances, move tokens, swap,
/// manage positions and create pools.
#[derive(Parser, Debug, Clone, PartialEq)]
#[clap(name = "whirlpool-tour", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// JSON-RPC endpoint.
    #[clap(long, env = "RPC_ENDPOINT_URL", default_value = DEVNET_RPC_URL)]
    pub rpc_url: String,

    /// Websocket endpoint. When set, confirmations are awaited with a signature subscription.
    #[clap(long, env = "WS_ENDPOINT_URL")]
    pub ws_url: Option<String>,

    /// Key file holding the wallet secret key as a JSON array of bytes.
    #[clap(long, env = "WALLET_PATH", default_value = DEFAULT_WALLET_PATH)]
    pub wallet: PathBuf,

    /// Language of the step narration.
    #[clap(long, env = "WHIRLPOOL_TOUR_LANG", value_enum, default_value_t = Lang::En)]
    pub lang: Lang,

    /// Print the instructions instead of sending them.
    #[clap(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging.
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Seconds to wait for a transaction confirmation.
    #[clap(long, default_value = "60")]
    pub confirm_timeout: u64,

    #[clap(long, env = "WHIRLPOOL_POSITION")]
    pub whirlpool_position: Option<String>,

    #[clap(long, env = "POSITION_MINT")]
    pub position_mint: Option<String>,

    #[clap(long, env = "WHIRLPOOL_POSITION_BUNDLE")]
    pub position_bundle: Option<String>,

    #[clap(long, env = "POOL_ADDRESS")]
    pub pool_address: Option<String>,

    /// Jito tip in lamports added to every transaction.
    #[clap(long, conflicts_with = "jito_tip_percentile")]
    pub jito_tip: Option<u64>,

    /// Pay the given percentile of the current Jito tip floor.
    #[clap(long, value_enum)]
    pub jito_tip_percentile: Option<JitoPercentile>,

    /// Upper bound of a dynamic Jito tip.
    #[clap(long, default_value = "5000000")]
    pub jito_tip_cap: u64,

    /// Send position transactions without the default dynamic priority fee and Jito tip.
    #[clap(long, global = true)]
    pub no_priority_fee: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Request 1 SOL from the devnet faucet.
    Airdrop,
    /// Show the SOL balance of the wallet.
    SolBalance,
    /// List the token accounts of the wallet.
    TokenBalances,
    /// Send 0.01 SOL.
    TransferSol,
    /// Send 1 devSAMO.
    TransferToken,
    /// Swap 0.1 devUSDC for devSAMO.
    Swap {
        /// Pay a dynamic priority fee.
        #[clap(long)]
        priority_fee: bool,
    },
    /// Price of the devSAMO/devUSDC pool, fetched by address.
    PriceByAddress,
    /// Price of the devSAMO/devUSDC concentrated liquidity pool.
    PriceByPair,
    /// Price of the devSAMO/devUSDC splash pool.
    PriceSplash,
    /// Every devSAMO/devUSDC pool across the supported tick spacings.
    PriceAllPools,
    /// Quote for depositing devUSDC into a new position.
    OpenPositionQuote,
    /// Open a position in the devSAMO/devUSDC pool.
    OpenPosition {
        /// Token the deposit is denominated in.
        #[clap(long, value_enum, default_value_t = DepositToken::B)]
        token: DepositToken,
    },
    /// List the positions and position bundles of the wallet.
    Positions,
    /// Add liquidity to the first position of the wallet.
    IncreaseLiquidity,
    /// Withdraw 30% of the liquidity of the first position of the wallet.
    DecreaseLiquidity,
    /// Fees and rewards owed to a position.
    FeeRewardQuote,
    /// Collect the fees and rewards of a position.
    Collect,
    /// Withdraw everything and close a position.
    ClosePosition,
    /// Create a position bundle.
    InitPositionBundle,
    /// Open a position managed by a position bundle.
    OpenBundledPosition,
    /// Create two mints and a concentrated liquidity pool.
    CreatePool,
    /// Create two mints and a splash pool.
    CreateSplashPool,
    /// Initialized ticks of a pool.
    Ticks,
    /// Receive a devnet token from the distributor.
    DevToken {
        /// devUSDC, devUSDT, devSAMO or devTMAC
        name: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DepositToken {
    A,
    B,
}

impl Command {
    /// Position and bundle transactions pay a dynamic priority fee and Jito tip unless
    /// told otherwise.
    pub fn pays_dynamic_fees(&self) -> bool {
        matches!(
            self,
            Command::OpenPosition { .. }
                | Command::IncreaseLiquidity
                | Command::DecreaseLiquidity
                | Command::Collect
                | Command::ClosePosition
                | Command::InitPositionBundle
                | Command::OpenBundledPosition
        )
    }
}

impl Cli {
    pub fn config(&self) -> Config {
        let dynamic_fees = self.command.pays_dynamic_fees() && !self.no_priority_fee;

        let priority_fee = match self.command {
            Command::Swap { priority_fee: true } => PriorityFeeSetting::Dynamic {
                percentile: PRIORITY_FEE_PERCENTILE,
                max_cap_lamports: PRIORITY_FEE_MAX_CAP_LAMPORTS,
            },
            _ if dynamic_fees => PriorityFeeSetting::Dynamic {
                percentile: PRIORITY_FEE_PERCENTILE,
                max_cap_lamports: PRIORITY_FEE_MAX_CAP_LAMPORTS,
            },
            _ => PriorityFeeSetting::None,
        };

        let jito_tip = match (self.jito_tip, self.jito_tip_percentile) {
            (Some(lamports), _) => JitoTipSetting::Exact(lamports),
            (None, Some(percentile)) => JitoTipSetting::Dynamic {
                percentile,
                max_cap_lamports: self.jito_tip_cap,
            },
            (None, None) if dynamic_fees => JitoTipSetting::Dynamic {
                percentile: JitoPercentile::default(),
                max_cap_lamports: self.jito_tip_cap,
            },
            (None, None) => JitoTipSetting::None,
        };

        Config {
            rpc_url: self.rpc_url.clone(),
            ws_url: self.ws_url.clone(),
            wallet_path: self.wallet.clone(),
            lang: self.lang,
            dry_run: self.dry_run,
            confirm_timeout: Duration::from_secs(self.confirm_timeout),
            whirlpool_position: self.whirlpool_position.clone(),
            position_mint: self.position_mint.clone(),
            position_bundle: self.position_bundle.clone(),
            pool_address: self.pool_address.clone(),
            sender: SenderConfig {
                priority_fee,
                jito_tip,
                ..SenderConfig::default()
            },
        }
    }
}

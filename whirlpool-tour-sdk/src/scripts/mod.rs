//! One procedure per tour subcommand: narrate the steps, build the instructions,
//! print what was computed and submit unless running dry.

mod pool;
mod position;
mod wallet;

pub use pool::*;
pub use position::*;
pub use wallet::*;

use std::io::Write;

use anyhow::Result;
use solana_sdk::{
    instruction::Instruction, message::Message, pubkey::Pubkey, signature::{Keypair, Signature},
    signer::Signer, transaction::Transaction,
};
use tracing::info;
use whirlpool_tour_client::pda::get_whirlpool_address;

use crate::{
    actions::DEVNET_WHIRLPOOLS_CONFIG,
    cli::Command,
    config::Config,
    i18n::Step,
    ledger::{Ledger, RpcLedger},
    report::Reporter,
    sender::build_and_send_transaction,
    token::{DEV_SAMO, DEV_USDC, order_mints},
    wallet::load_wallet,
};

/// Tick spacing of the devSAMO/devUSDC pool the tour trades in.
pub const SAMO_USDC_TICK_SPACING: u16 = 64;

/// Everything a scenario works with.
pub struct Session<'a, L: Ledger + ?Sized, W: Write> {
    pub ledger: &'a L,
    pub wallet: &'a Keypair,
    pub config: &'a Config,
    pub report: Reporter<W>,
}

impl<'a, L: Ledger + ?Sized, W: Write> Session<'a, L, W> {
    pub fn new(ledger: &'a L, wallet: &'a Keypair, config: &'a Config, out: W) -> Self {
        Self {
            ledger,
            wallet,
            config,
            report: Reporter::new(out),
        }
    }

    pub fn owner(&self) -> Pubkey {
        self.wallet.pubkey()
    }

    pub fn step(&self, step: Step) {
        info!("{}", step.text(self.config.lang));
    }

    /// Sends `instructions` paid and signed by the wallet. A dry run prints them with
    /// the unsigned transaction instead and returns `None`.
    pub fn submit(
        &mut self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<Option<Signature>> {
        if self.config.dry_run {
            self.report.instructions(instructions)?;
            let message = Message::new(instructions, Some(&self.owner()));
            self.report.transaction(&Transaction::new_unsigned(message))?;
            return Ok(None);
        }

        self.step(Step::SendTransaction);
        let signature = build_and_send_transaction(
            self.ledger,
            instructions,
            self.wallet,
            extra_signers,
            &self.config.sender,
        )?;
        self.report.line("signature", signature)?;
        Ok(Some(signature))
    }
}

pub fn samo_usdc_pool_address() -> Pubkey {
    let (token_mint_a, token_mint_b) = order_mints(DEV_SAMO.mint, DEV_USDC.mint);
    get_whirlpool_address(
        &DEVNET_WHIRLPOOLS_CONFIG,
        &token_mint_a,
        &token_mint_b,
        SAMO_USDC_TICK_SPACING,
    )
    .0
}

/// Reads the wallet, then builds the RPC ledger. Nothing touches the network before
/// the key file has been read.
pub fn connect(config: &Config) -> Result<(Keypair, RpcLedger)> {
    info!("{}", Step::LoadWallet.text(config.lang));
    let wallet = load_wallet(&config.wallet_path)?;

    info!("{}", Step::Connect.text(config.lang));
    let ledger = RpcLedger::new(&config.rpc_url, config.ws_url.clone(), config.confirm_timeout);
    info!(rpc_url = %config.rpc_url, wallet = %wallet.pubkey(), "connected");

    Ok((wallet, ledger))
}

pub fn run<L: Ledger + ?Sized, W: Write>(command: &Command, session: &mut Session<L, W>) -> Result<()> {
    match command {
        Command::Airdrop => airdrop(session),
        Command::SolBalance => sol_balance(session),
        Command::TokenBalances => token_balances(session),
        Command::TransferSol => transfer_sol(session),
        Command::TransferToken => transfer_token(session),
        Command::Swap { .. } => swap(session),
        Command::PriceByAddress => price_by_address(session),
        Command::PriceByPair => price_by_pair(session),
        Command::PriceSplash => price_splash(session),
        Command::PriceAllPools => price_all_pools(session),
        Command::OpenPositionQuote => open_position_quote(session),
        Command::OpenPosition { token } => open_position(session, *token),
        Command::Positions => positions(session),
        Command::IncreaseLiquidity => increase_liquidity(session),
        Command::DecreaseLiquidity => decrease_liquidity(session),
        Command::FeeRewardQuote => fee_reward_quote(session),
        Command::Collect => collect(session),
        Command::ClosePosition => close_position(session),
        Command::InitPositionBundle => init_position_bundle(session),
        Command::OpenBundledPosition => open_bundled_position(session),
        Command::CreatePool => create_pool(session, false),
        Command::CreateSplashPool => create_pool(session, true),
        Command::Ticks => ticks(session),
        Command::DevToken { name } => dev_token(session, name),
    }
}

use std::io::Write;

use anyhow::Result;
use solana_sdk::signature::Keypair;
use whirlpool_tour_client::accounts::Whirlpool;

use super::{Session, samo_usdc_pool_address};
use crate::{
    actions::{
        DEFAULT_SLIPPAGE_TOLERANCE_BPS, HydratedPosition, LiquidityParam, PositionOrBundle,
        close_position_instructions, decrease_liquidity_instructions, fetch_position_earnings,
        fetch_positions_for_owner, harvest_position_instructions,
        increase_liquidity_instructions, initialize_position_bundle_instructions,
        open_bundled_position_instructions, open_position_instructions,
        price_range_to_tick_indexes,
    },
    cli::DepositToken,
    i18n::Step,
    ledger::{Ledger, fetch_mint, fetch_position, fetch_whirlpool},
    quote::{
        CollectFeesQuote, CollectRewardsQuote, increase_liquidity_quote_b, tick_index_to_price,
    },
    token::{lamports_to_sol, ui_amount},
};

/// Price range of the devUSDC deposits, in devUSDC per devSAMO.
pub const USDC_DEPOSIT_PRICE_RANGE: (f64, f64) = (0.005, 0.02);
/// Price range of the devSAMO deposit, above the current price so only devSAMO is needed.
pub const SAMO_DEPOSIT_PRICE_RANGE: (f64, f64) = (0.03, 0.04);
/// 1 devUSDC.
pub const USDC_DEPOSIT_AMOUNT: u64 = 1_000_000;
/// 10 devSAMO.
pub const SAMO_DEPOSIT_AMOUNT: u64 = 10_000_000_000;
pub const DECREASE_LIQUIDITY_PERCENT: u128 = 30;

/// `floor(liquidity * percent / 100)` without overflowing.
pub fn liquidity_share(liquidity: u128, percent: u128) -> u128 {
    liquidity / 100 * percent + liquidity % 100 * percent / 100
}

fn mint_decimals<L: Ledger + ?Sized>(ledger: &L, whirlpool: &Whirlpool) -> Result<(u8, u8)> {
    let mint_a = fetch_mint(ledger, &whirlpool.token_mint_a)?;
    let mint_b = fetch_mint(ledger, &whirlpool.token_mint_b)?;
    Ok((mint_a.decimals, mint_b.decimals))
}

fn report_tick_range<L: Ledger + ?Sized, W: Write>(
    session: &mut Session<L, W>,
    (tick_lower_index, tick_upper_index): (i32, i32),
    (decimals_a, decimals_b): (u8, u8),
) -> Result<()> {
    session.report.line("lower tick", tick_lower_index)?;
    session.report.field("price", tick_index_to_price(tick_lower_index, decimals_a, decimals_b)?)?;
    session.report.line("upper tick", tick_upper_index)?;
    session.report.field("price", tick_index_to_price(tick_upper_index, decimals_a, decimals_b)?)
}

fn report_token_amounts<L: Ledger + ?Sized, W: Write>(
    session: &mut Session<L, W>,
    label: &str,
    (amount_a, amount_b): (u64, u64),
    (decimals_a, decimals_b): (u8, u8),
) -> Result<()> {
    session.report.text(&format!("{label}:"))?;
    session.report.field("token A", ui_amount(amount_a, decimals_a as u32))?;
    session.report.field("token B", ui_amount(amount_b, decimals_b as u32))
}

pub fn open_position_quote<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::FetchPool);
    let whirlpool = fetch_whirlpool(session.ledger, &samo_usdc_pool_address())?;
    let decimals = mint_decimals(session.ledger, &whirlpool)?;

    session.step(Step::SetPriceRange);
    let (lower_price, upper_price) = USDC_DEPOSIT_PRICE_RANGE;
    let range = price_range_to_tick_indexes(
        lower_price,
        upper_price,
        decimals.0,
        decimals.1,
        whirlpool.tick_spacing,
    )?;
    report_tick_range(session, range, decimals)?;

    session.step(Step::ObtainQuote);
    let quote = increase_liquidity_quote_b(
        USDC_DEPOSIT_AMOUNT,
        DEFAULT_SLIPPAGE_TOLERANCE_BPS,
        whirlpool.sqrt_price,
        range.0,
        range.1,
    )?;
    session.report.line("liquidity", quote.liquidity_delta)?;
    report_token_amounts(session, "estimated deposit", (quote.token_est_a, quote.token_est_b), decimals)?;
    report_token_amounts(session, "maximum deposit", (quote.token_max_a, quote.token_max_b), decimals)
}

pub fn open_position<L: Ledger + ?Sized, W: Write>(
    session: &mut Session<L, W>,
    token: DepositToken,
) -> Result<()> {
    let pool_address = samo_usdc_pool_address();
    let ((lower_price, upper_price), param) = match token {
        DepositToken::A => (SAMO_DEPOSIT_PRICE_RANGE, LiquidityParam::TokenA(SAMO_DEPOSIT_AMOUNT)),
        DepositToken::B => (USDC_DEPOSIT_PRICE_RANGE, LiquidityParam::TokenB(USDC_DEPOSIT_AMOUNT)),
    };

    session.step(Step::SetPriceRange);
    let open = open_position_instructions(
        session.ledger,
        &pool_address,
        param,
        lower_price,
        upper_price,
        DEFAULT_SLIPPAGE_TOLERANCE_BPS,
        &session.owner(),
    )?;

    let whirlpool = fetch_whirlpool(session.ledger, &pool_address)?;
    let decimals = mint_decimals(session.ledger, &whirlpool)?;
    session.report.line("position mint", open.position_mint)?;
    session.report.line("position", open.position_address)?;
    report_tick_range(session, (open.tick_lower_index, open.tick_upper_index), decimals)?;
    session.report.line("liquidity", open.quote.liquidity_delta)?;
    report_token_amounts(
        session,
        "maximum deposit",
        (open.quote.token_max_a, open.quote.token_max_b),
        decimals,
    )?;
    session.report.line(
        "initialization cost (SOL)",
        lamports_to_sol(open.initialization_cost).normalize(),
    )?;

    let signers: Vec<&Keypair> = open.additional_signers.iter().collect();
    session.submit(&open.instructions, &signers)?;
    Ok(())
}

pub fn positions<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    let positions = fetch_positions_for_owner(session.ledger, &session.owner())?;
    session.report.line("positions", positions.len())?;

    for entry in positions {
        match entry {
            PositionOrBundle::Position(position) => {
                session.report.line("position", position.address)?;
                session.report.field("whirlpool", position.data.whirlpool)?;
                session.report.field("mint", position.data.position_mint)?;
                session.report.field("liquidity", position.data.liquidity)?;
                session.report.field(
                    "ticks",
                    format!("[{}, {}]", position.data.tick_lower_index, position.data.tick_upper_index),
                )?;
            }
            PositionOrBundle::PositionBundle(bundle) => {
                session.report.line("position bundle", bundle.address)?;
                session.report.field("mint", bundle.data.position_bundle_mint)?;
                for position in bundle.positions {
                    session.report.field(
                        &format!("bundle index {}", position.bundle_index),
                        format!(
                            "{} whirlpool {} liquidity {}",
                            position.address, position.data.whirlpool, position.data.liquidity
                        ),
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// First plain position of the wallet in the devSAMO/devUSDC pool.
fn first_pool_position<L: Ledger + ?Sized, W: Write>(
    session: &Session<L, W>,
) -> Result<Option<HydratedPosition>> {
    let pool_address = samo_usdc_pool_address();
    let position = fetch_positions_for_owner(session.ledger, &session.owner())?
        .into_iter()
        .find_map(|entry| match entry {
            PositionOrBundle::Position(position) if position.data.whirlpool == pool_address => {
                Some(position)
            }
            _ => None,
        });
    Ok(position)
}

pub fn increase_liquidity<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::FetchPosition);
    let Some(position) = first_pool_position(session)? else {
        return session.report.text("no position");
    };
    session.report.line("position", position.address)?;
    session.report.line("liquidity", position.data.liquidity)?;

    session.step(Step::ObtainQuote);
    let increase = increase_liquidity_instructions(
        session.ledger,
        &position.address,
        LiquidityParam::TokenB(USDC_DEPOSIT_AMOUNT),
        DEFAULT_SLIPPAGE_TOLERANCE_BPS,
        &session.owner(),
    )?;
    session.report.line("liquidity delta", increase.quote.liquidity_delta)?;
    session.report.line("token max A", increase.quote.token_max_a)?;
    session.report.line("token max B", increase.quote.token_max_b)?;

    session.submit(&increase.instructions, &[])?;
    Ok(())
}

pub fn decrease_liquidity<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::FetchPosition);
    let Some(position) = first_pool_position(session)? else {
        return session.report.text("no position");
    };
    let liquidity_delta = liquidity_share(position.data.liquidity, DECREASE_LIQUIDITY_PERCENT);
    session.report.line("position", position.address)?;
    session.report.line("liquidity", position.data.liquidity)?;
    session.report.line("liquidity delta", liquidity_delta)?;

    session.step(Step::ObtainQuote);
    let decrease = decrease_liquidity_instructions(
        session.ledger,
        &position.address,
        LiquidityParam::Liquidity(liquidity_delta),
        DEFAULT_SLIPPAGE_TOLERANCE_BPS,
        &session.owner(),
    )?;
    session.report.line("token min A", decrease.quote.token_min_a)?;
    session.report.line("token min B", decrease.quote.token_min_b)?;

    session.submit(&decrease.instructions, &[])?;
    Ok(())
}

fn report_earnings<L: Ledger + ?Sized, W: Write>(
    session: &mut Session<L, W>,
    whirlpool: &Whirlpool,
    fees: &CollectFeesQuote,
    rewards: &CollectRewardsQuote,
) -> Result<()> {
    let decimals = mint_decimals(session.ledger, whirlpool)?;

    session.step(Step::GetFees);
    report_token_amounts(session, "fees", (fees.fee_owed_a, fees.fee_owed_b), decimals)?;

    session.step(Step::GetRewards);
    for (index, (reward_info, reward)) in whirlpool.reward_infos.iter().zip(&rewards.rewards).enumerate() {
        if !reward_info.initialized() {
            continue;
        }
        let mint = fetch_mint(session.ledger, &reward_info.mint)?;
        session.report.line(&format!("reward {index}"), reward_info.mint)?;
        session
            .report
            .field("amount", ui_amount(reward.rewards_owed, mint.decimals as u32))?;
    }
    Ok(())
}

pub fn fee_reward_quote<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    let position_address = session.config.position_address()?;

    session.step(Step::FetchPosition);
    let earnings = fetch_position_earnings(session.ledger, &position_address)?;
    session.report.line("position", position_address)?;
    session.report.line("whirlpool", earnings.position.whirlpool)?;

    report_earnings(session, &earnings.whirlpool, &earnings.fees_quote, &earnings.rewards_quote)
}

pub fn collect<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    let position_address = session.config.position_address()?;

    session.step(Step::Harvest);
    let harvest = harvest_position_instructions(session.ledger, &position_address, &session.owner())?;
    let position = fetch_position(session.ledger, &position_address)?;
    let whirlpool = fetch_whirlpool(session.ledger, &position.whirlpool)?;
    report_earnings(session, &whirlpool, &harvest.fees_quote, &harvest.rewards_quote)?;

    session.submit(&harvest.instructions, &[])?;
    Ok(())
}

pub fn close_position<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    let position_address = session.config.position_address()?;

    session.step(Step::FetchPosition);
    let close = close_position_instructions(
        session.ledger,
        &position_address,
        DEFAULT_SLIPPAGE_TOLERANCE_BPS,
        &session.owner(),
    )?;
    session.report.line("liquidity", close.quote.liquidity_delta)?;
    session.report.line("token min A", close.quote.token_min_a)?;
    session.report.line("token min B", close.quote.token_min_b)?;
    session.report.line("fee A", close.fees_quote.fee_owed_a)?;
    session.report.line("fee B", close.fees_quote.fee_owed_b)?;

    session.submit(&close.instructions, &[])?;
    Ok(())
}

pub fn init_position_bundle<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::GenerateBundleAddresses);
    let bundle = initialize_position_bundle_instructions(&session.owner());
    session.report.line("position bundle mint", bundle.position_bundle_mint)?;
    session.report.line("position bundle", bundle.position_bundle_address)?;
    session.report.line("position bundle token account", bundle.position_bundle_token_account)?;

    session.step(Step::BuildBundleInstruction);
    let signers: Vec<&Keypair> = bundle.additional_signers.iter().collect();
    session.submit(&bundle.instructions, &signers)?;
    Ok(())
}

pub fn open_bundled_position<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    let bundle_address = session.config.position_bundle_address()?;

    session.step(Step::FetchBundle);
    session.step(Step::FindUnusedBundleIndex);
    let (lower_price, upper_price) = USDC_DEPOSIT_PRICE_RANGE;
    let open = open_bundled_position_instructions(
        session.ledger,
        &bundle_address,
        &samo_usdc_pool_address(),
        lower_price,
        upper_price,
        &session.owner(),
    )?;
    session.report.line("bundle index", open.bundle_index)?;
    session.report.line("bundled position", open.bundled_position_address)?;
    session.report.line(
        "ticks",
        format!("[{}, {}]", open.tick_lower_index, open.tick_upper_index),
    )?;

    session.step(Step::OpenBundledPosition);
    session.submit(&open.instructions, &[])?;
    Ok(())
}

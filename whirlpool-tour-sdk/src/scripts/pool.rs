use std::io::Write;

use anyhow::Result;
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use whirlpool_tour_client::accounts::Whirlpool;

use super::{SAMO_USDC_TICK_SPACING, Session, samo_usdc_pool_address};
use crate::{
    actions::{
        DEFAULT_SLIPPAGE_TOLERANCE_BPS, DEVNET_WHIRLPOOLS_CONFIG, NewPool,
        PoolInfo, SwapParams, SwapQuote, create_concentrated_liquidity_pool_instructions,
        create_mint_instructions, create_splash_pool_instructions,
        fetch_concentrated_liquidity_pool, fetch_pool_price, fetch_splash_pool,
        fetch_whirlpools_by_token_pair, swap_instructions,
    },
    i18n::Step,
    ledger::{Ledger, fetch_tick_arrays_of_pool, fetch_whirlpool},
    token::{DEV_SAMO, DEV_USDC, lamports_to_sol, order_mints, ui_amount},
};

/// 0.1 devUSDC.
pub const SWAP_USDC_AMOUNT: u64 = 100_000;
pub const NEW_POOL_INITIAL_PRICE: f64 = 0.01;
pub const NEW_POOL_TICK_SPACING: u16 = 64;
/// Decimals of the two mints created for a new pool, devSAMO-like and devUSDC-like.
pub const NEW_POOL_MINT_DECIMALS: [u8; 2] = [9, 6];

pub fn swap<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::FetchPool);
    let pool_address = samo_usdc_pool_address();
    session.report.line("whirlpool", pool_address)?;

    session.step(Step::ObtainQuote);
    let swap = swap_instructions(
        session.ledger,
        &pool_address,
        SwapParams::ExactIn {
            mint: DEV_USDC.mint,
            amount: SWAP_USDC_AMOUNT,
        },
        DEFAULT_SLIPPAGE_TOLERANCE_BPS,
        &session.owner(),
    )?;

    if let SwapQuote::ExactIn(quote) = swap.quote {
        let samo_decimals = DEV_SAMO.decimals as u32;
        session.report.line("devUSDC in", ui_amount(quote.token_in, DEV_USDC.decimals as u32))?;
        session.report.line("devSAMO estimated out", ui_amount(quote.token_est_out, samo_decimals))?;
        session.report.line("devSAMO minimum out", ui_amount(quote.token_min_out, samo_decimals))?;
        session.report.line("trade fee", quote.trade_fee)?;
    }

    session.submit(&swap.instructions, &[])?;
    Ok(())
}

fn report_whirlpool<L: Ledger + ?Sized, W: Write>(
    session: &mut Session<L, W>,
    address: &Pubkey,
    whirlpool: &Whirlpool,
) -> Result<()> {
    let price = fetch_pool_price(session.ledger, whirlpool)?;
    session.report.line("whirlpool", address)?;
    session.report.field("token A", whirlpool.token_mint_a)?;
    session.report.field("token B", whirlpool.token_mint_b)?;
    session.report.field("tick spacing", whirlpool.tick_spacing)?;
    session.report.field("liquidity", whirlpool.liquidity)?;
    session.report.field("sqrt price", whirlpool.sqrt_price)?;
    session.report.field("tick", whirlpool.tick_current_index)?;
    session.report.field("price", price)
}

fn report_pool_info<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>, pool: &PoolInfo) -> Result<()> {
    session.report.line("whirlpool", pool.address())?;
    session.report.field("tick spacing", pool.tick_spacing())?;
    match pool {
        PoolInfo::Initialized(pool) => {
            session.report.field("initialized", true)?;
            session.report.field("price", pool.price)?;
        }
        PoolInfo::Uninitialized(pool) => {
            session.report.field("initialized", false)?;
            match pool.fee_rate {
                Some(fee_rate) => session.report.field("fee rate", fee_rate)?,
                None => session.report.field("fee rate", "no fee tier")?,
            }
        }
    }
    Ok(())
}

/// Pool at `POOL_ADDRESS`, or the devSAMO/devUSDC pool when unset.
pub fn price_by_address<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    let address = match session.config.pool_address {
        Some(_) => session.config.pool_address()?,
        None => samo_usdc_pool_address(),
    };

    session.step(Step::FetchPool);
    let whirlpool = fetch_whirlpool(session.ledger, &address)?;
    report_whirlpool(session, &address, &whirlpool)
}

pub fn price_by_pair<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::FetchPool);
    let pool = fetch_concentrated_liquidity_pool(
        session.ledger,
        &DEVNET_WHIRLPOOLS_CONFIG,
        DEV_SAMO.mint,
        DEV_USDC.mint,
        SAMO_USDC_TICK_SPACING,
    )?;
    report_pool_info(session, &pool)
}

pub fn price_splash<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::FetchPool);
    let pool = fetch_splash_pool(session.ledger, &DEVNET_WHIRLPOOLS_CONFIG, DEV_SAMO.mint, DEV_USDC.mint)?;
    report_pool_info(session, &pool)
}

pub fn price_all_pools<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::FetchPool);
    let pools = fetch_whirlpools_by_token_pair(
        session.ledger,
        &DEVNET_WHIRLPOOLS_CONFIG,
        DEV_SAMO.mint,
        DEV_USDC.mint,
    )?;
    for pool in &pools {
        report_pool_info(session, pool)?;
    }
    Ok(())
}

/// Creates two fresh mints, then a pool between them priced at 0.01.
pub fn create_pool<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>, splash: bool) -> Result<()> {
    let owner = session.owner();

    session.step(Step::CreateMints);
    let [first_decimals, second_decimals] = NEW_POOL_MINT_DECIMALS;
    let first = create_mint_instructions(session.ledger, &owner, first_decimals)?;
    let second = create_mint_instructions(session.ledger, &owner, second_decimals)?;
    let mint_instructions: Vec<_> = first
        .instructions
        .iter()
        .chain(&second.instructions)
        .cloned()
        .collect();
    let mint_signers: Vec<&Keypair> = first
        .additional_signers
        .iter()
        .chain(&second.additional_signers)
        .collect();
    session.submit(&mint_instructions, &mint_signers)?;

    session.step(Step::OrderMints);
    let (token_mint_a, token_mint_b) = order_mints(first.mint, second.mint);
    let (decimals_a, decimals_b) = if token_mint_a == first.mint {
        (first_decimals, second_decimals)
    } else {
        (second_decimals, first_decimals)
    };
    session.report.line("token A", format!("{token_mint_a} (decimals {decimals_a})"))?;
    session.report.line("token B", format!("{token_mint_b} (decimals {decimals_b})"))?;

    session.step(Step::CreatePool);
    let new_pool = NewPool {
        whirlpools_config: DEVNET_WHIRLPOOLS_CONFIG,
        token_mint_a,
        token_mint_b,
        decimals_a,
        decimals_b,
        tick_spacing: NEW_POOL_TICK_SPACING,
        initial_price: NEW_POOL_INITIAL_PRICE,
    };
    let pool = if splash {
        create_splash_pool_instructions(session.ledger, &new_pool, &owner)?
    } else {
        create_concentrated_liquidity_pool_instructions(session.ledger, &new_pool, &owner)?
    };
    session.report.line("pool address", pool.pool_address)?;
    session.report.line("initialization cost (SOL)", lamports_to_sol(pool.initialization_cost).normalize())?;

    let pool_signers: Vec<&Keypair> = pool.additional_signers.iter().collect();
    if session.submit(&pool.instructions, &pool_signers)?.is_none() {
        return Ok(());
    }

    session.step(Step::FetchCreatedPool);
    let whirlpool = fetch_whirlpool(session.ledger, &pool.pool_address)?;
    report_whirlpool(session, &pool.pool_address, &whirlpool)
}

/// Every initialized tick of the pool at `POOL_ADDRESS`.
pub fn ticks<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    let address = session.config.pool_address()?;
    let whirlpool = fetch_whirlpool(session.ledger, &address)?;

    session.step(Step::FetchTickArrays);
    let tick_arrays = fetch_tick_arrays_of_pool(session.ledger, &address)?;
    session.report.line("tick arrays", tick_arrays.len())?;

    for (tick_array_address, tick_array) in &tick_arrays {
        session.report.line("tick array", tick_array_address)?;
        session.report.field("start tick index", tick_array.start_tick_index)?;
        for (offset, tick) in tick_array.ticks.iter().enumerate() {
            if !tick.initialized {
                continue;
            }
            let tick_index = tick_array.start_tick_index + offset as i32 * whirlpool.tick_spacing as i32;
            session.report.field(
                &format!("tick {tick_index}"),
                format!(
                    "liquidity net {}, liquidity gross {}",
                    tick.liquidity_net, tick.liquidity_gross
                ),
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        test_utils::{
            constants::*,
            fixtures::{
                setup_samo_usdc_pool, setup_tick_array, tick_array_with_liquidity, whirlpool_at_tick,
            },
            svm_ledger::SvmLedger,
        },
    };
    use solana_sdk::signature::Keypair;
    use whirlpool_tour_client::WHIRLPOOL_ID;

    /// devSAMO/devUSDC pool at tick 0, a price of 1000 devUSDC per devSAMO.
    fn samo_usdc_ledger() -> SvmLedger {
        let ledger = SvmLedger::new(vec![ALICE]);
        setup_samo_usdc_pool(&ledger, 0, 1_000_000_000_000);
        ledger
    }

    fn dry_run() -> Config {
        Config {
            dry_run: true,
            ..Config::default()
        }
    }

    fn printed(session: Session<SvmLedger, Vec<u8>>) -> String {
        String::from_utf8(session.report.into_inner()).unwrap()
    }

    #[test]
    fn test_price_by_address() {
        let ledger = samo_usdc_ledger();
        let wallet = Keypair::new();
        let config = Config::default();
        let mut session = Session::new(&ledger, &wallet, &config, Vec::new());

        price_by_address(&mut session).unwrap();

        let output = printed(session);
        assert!(output.starts_with(&format!("whirlpool: {}\n", samo_usdc_pool_address())));
        assert!(output.contains(&format!("  token A: {}\n", DEV_SAMO.mint)));
        assert!(output.contains("  tick: 0\n"));
        assert!(output.contains("  price: 1000"));
    }

    #[test]
    fn test_price_by_pair_and_splash() {
        let ledger = samo_usdc_ledger();
        let wallet = Keypair::new();
        let config = Config::default();

        let mut session = Session::new(&ledger, &wallet, &config, Vec::new());
        price_by_pair(&mut session).unwrap();
        let output = printed(session);
        assert!(output.contains("  initialized: true\n"));

        let mut session = Session::new(&ledger, &wallet, &config, Vec::new());
        price_splash(&mut session).unwrap();
        let output = printed(session);
        assert!(output.contains("  tick spacing: 32896\n"));
        assert!(output.contains("  initialized: false\n"));
        assert!(output.contains("  fee rate: no fee tier\n"));
    }

    #[test]
    fn test_price_all_pools() {
        let ledger = samo_usdc_ledger();
        let wallet = Keypair::new();
        let config = Config::default();
        let mut session = Session::new(&ledger, &wallet, &config, Vec::new());

        price_all_pools(&mut session).unwrap();

        let output = printed(session);
        assert_eq!(output.matches("whirlpool: ").count(), 10);
        assert_eq!(output.matches("  initialized: true\n").count(), 1);
    }

    #[test]
    fn test_swap_dry_run() {
        let ledger = samo_usdc_ledger();
        let wallet = Keypair::new();
        let config = dry_run();
        let mut session = Session::new(&ledger, &wallet, &config, Vec::new());

        swap(&mut session).unwrap();

        let output = printed(session);
        assert!(output.contains("devUSDC in: 0.100000\n"));
        assert!(output.contains("instructions: 3\n"));
        assert!(!output.contains("signature: "));
    }

    #[test]
    fn test_create_pool_dry_run() {
        let ledger = SvmLedger::new(vec![]);
        let wallet = Keypair::new();
        let config = dry_run();
        let mut session = Session::new(&ledger, &wallet, &config, Vec::new());

        create_pool(&mut session, false).unwrap();

        let output = printed(session);
        // two mints in one transaction, then the pool with three tick arrays
        assert!(output.contains("instructions: 4\n"));
        assert_eq!(output.matches("transaction (base64): ").count(), 2);
        assert!(output.contains("pool address: "));
        assert!(output.contains("(decimals 9)"));
        assert!(output.contains("(decimals 6)"));
    }

    #[test]
    fn test_create_splash_pool_dry_run() {
        let ledger = SvmLedger::new(vec![]);
        let wallet = Keypair::new();
        let config = dry_run();
        let mut session = Session::new(&ledger, &wallet, &config, Vec::new());

        create_pool(&mut session, true).unwrap();

        // the splash pool adds two tick arrays to its initialization
        let output = printed(session);
        assert_eq!(output.matches("instructions: 4\n").count(), 1);
        assert!(output.contains("instructions: 3\n"));
    }

    #[test]
    fn test_ticks() {
        let ledger = SvmLedger::new(vec![]);
        ledger.set_program_account(
            &POOL,
            &WHIRLPOOL_ID,
            &whirlpool_at_tick(0, TICK_SPACING, 0, FEE_RATE),
            Whirlpool::LEN,
        );
        setup_tick_array(&ledger, &tick_array_with_liquidity(-5_632, TICK_SPACING, 7));
        setup_tick_array(&ledger, &tick_array_with_liquidity(0, TICK_SPACING, 0));
        let wallet = Keypair::new();
        let config = Config {
            pool_address: Some(POOL.to_string()),
            ..Config::default()
        };
        let mut session = Session::new(&ledger, &wallet, &config, Vec::new());

        ticks(&mut session).unwrap();

        let output = printed(session);
        assert!(output.starts_with("tick arrays: 2\n"));
        assert_eq!(output.matches("  tick ").count(), 88);
        assert!(output.contains("  tick -5632: liquidity net 0, liquidity gross 7\n"));
        assert!(output.contains("  tick -64: liquidity net 0, liquidity gross 7\n"));
    }

    #[test]
    fn test_ticks_requires_pool_address() {
        let ledger = SvmLedger::new(vec![]);
        let wallet = Keypair::new();
        let config = Config::default();
        let mut session = Session::new(&ledger, &wallet, &config, Vec::new());

        let err = ticks(&mut session).unwrap_err();
        assert_eq!(err.to_string(), "environment variable POOL_ADDRESS is not set");
    }
}

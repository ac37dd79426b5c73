//! Whole operations expressed as instruction lists, with their quotes and the
//! extra signers they need. Nothing here sends a transaction.

mod bundle;
mod pool;
mod position;
mod swap;
mod token;

pub use bundle::*;
pub use pool::*;
pub use position::*;
pub use swap::*;
pub use token::*;

use anyhow::{Context, Result, anyhow};
use solana_sdk::{instruction::Instruction, pubkey, pubkey::Pubkey};
use whirlpool_tour_client::{
    accounts::{TickArray, Whirlpool},
    instructions::{InitializeTickArray, InitializeTickArrayInstructionArgs},
    pda::get_tick_array_address,
    types::Tick,
};

use crate::{
    ledger::{Ledger, fetch_tick_arrays},
    quote::{get_tick_array_start_tick_index, get_tick_index_in_array},
};

pub const DEVNET_WHIRLPOOLS_CONFIG: Pubkey = pubkey!("FcrweFY1G9HJAHG5inkGB6pKg1HZ6x9UC2WioAfWrGkR");

pub const SPLASH_POOL_TICK_SPACING: u16 = 32_896;

pub const SUPPORTED_TICK_SPACINGS: [u16; 10] = [1, 2, 4, 8, 16, 64, 96, 128, 256, SPLASH_POOL_TICK_SPACING];

pub const DEFAULT_SLIPPAGE_TOLERANCE_BPS: u16 = 100;

/// Tick array start indexes covering `tick_indexes`, without duplicates.
fn tick_array_start_indexes(tick_indexes: &[i32], tick_spacing: u16) -> Vec<i32> {
    let mut start_indexes: Vec<i32> = Vec::with_capacity(tick_indexes.len());
    for tick_index in tick_indexes {
        let start_index = get_tick_array_start_tick_index(*tick_index, tick_spacing);
        if !start_indexes.contains(&start_index) {
            start_indexes.push(start_index);
        }
    }
    start_indexes
}

/// Instructions initializing the tick arrays holding `tick_indexes` that do not exist
/// yet, and the rent they lock.
fn initialize_missing_tick_arrays<L: Ledger + ?Sized>(
    ledger: &L,
    whirlpool_address: &Pubkey,
    tick_spacing: u16,
    tick_indexes: &[i32],
    funder: &Pubkey,
) -> Result<(Vec<Instruction>, u64)> {
    let start_indexes = tick_array_start_indexes(tick_indexes, tick_spacing);
    let addresses: Vec<Pubkey> = start_indexes
        .iter()
        .map(|start_index| get_tick_array_address(whirlpool_address, *start_index).0)
        .collect();
    let accounts = ledger.get_multiple_accounts(&addresses)?;

    let mut instructions = Vec::new();
    for ((start_tick_index, address), account) in start_indexes.into_iter().zip(addresses).zip(accounts) {
        if account.is_none() {
            instructions.push(
                InitializeTickArray {
                    whirlpool: *whirlpool_address,
                    funder: *funder,
                    tick_array: address,
                }
                .instruction(InitializeTickArrayInstructionArgs { start_tick_index })?,
            );
        }
    }

    let cost = if instructions.is_empty() {
        0
    } else {
        instructions.len() as u64 * ledger.minimum_balance_for_rent_exemption(TickArray::LEN)?
    };

    Ok((instructions, cost))
}

/// Lower and upper boundary ticks of a position range, read from their tick arrays.
fn fetch_boundary_ticks<L: Ledger + ?Sized>(
    ledger: &L,
    whirlpool_address: &Pubkey,
    whirlpool: &Whirlpool,
    tick_lower_index: i32,
    tick_upper_index: i32,
) -> Result<(Tick, Tick)> {
    let addresses = [tick_lower_index, tick_upper_index].map(|tick_index| {
        let start_index = get_tick_array_start_tick_index(tick_index, whirlpool.tick_spacing);
        get_tick_array_address(whirlpool_address, start_index).0
    });

    let tick_arrays = fetch_tick_arrays(ledger, &addresses)?;
    let tick = |tick_array: &Option<TickArray>, address: &Pubkey, tick_index: i32| {
        let tick_array = tick_array
            .as_ref()
            .ok_or_else(|| anyhow!("tick array {address} not found"))?;
        let offset = get_tick_index_in_array(
            tick_index,
            tick_array.start_tick_index,
            whirlpool.tick_spacing,
        )
        .with_context(|| format!("tick {tick_index} is not in tick array {address}"))?;
        Ok::<_, anyhow::Error>(tick_array.ticks[offset])
    };

    Ok((
        tick(&tick_arrays[0], &addresses[0], tick_lower_index)?,
        tick(&tick_arrays[1], &addresses[1], tick_upper_index)?,
    ))
}

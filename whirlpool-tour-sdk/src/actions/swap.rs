use anyhow::{Result, bail};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use whirlpool_tour_client::{
    accounts::{TICK_ARRAY_SIZE, TickArray, Whirlpool},
    instructions::{Swap, SwapInstructionArgs},
    pda::{get_oracle_address, get_tick_array_address},
};

use crate::{
    ledger::{Ledger, fetch_tick_arrays, fetch_whirlpool},
    quote::{
        ExactInSwapQuote, ExactOutSwapQuote, MAX_SQRT_PRICE, MIN_SQRT_PRICE, TickArraySequence,
        get_tick_array_start_tick_index, swap_quote_by_input_token, swap_quote_by_output_token,
    },
    token::{create_ata_idempotent_instruction, get_ata},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwapParams {
    /// Sell exactly `amount` of `mint`.
    ExactIn { mint: Pubkey, amount: u64 },
    /// Buy exactly `amount` of `mint`.
    ExactOut { mint: Pubkey, amount: u64 },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwapQuote {
    ExactIn(ExactInSwapQuote),
    ExactOut(ExactOutSwapQuote),
}

pub struct SwapInstructions {
    pub quote: SwapQuote,
    pub a_to_b: bool,
    pub instructions: Vec<Instruction>,
}

/// The three tick arrays a swap walks through, starting with the one holding the
/// current tick.
pub fn swap_tick_array_start_indexes(tick_current_index: i32, tick_spacing: u16, a_to_b: bool) -> [i32; 3] {
    let start_index = get_tick_array_start_tick_index(tick_current_index, tick_spacing);
    let offset = TICK_ARRAY_SIZE as i32 * tick_spacing as i32;
    let step = if a_to_b { -offset } else { offset };

    [start_index, start_index + step, start_index + 2 * step]
}

pub fn swap_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    pool_address: &Pubkey,
    params: SwapParams,
    slippage_tolerance_bps: u16,
    authority: &Pubkey,
) -> Result<SwapInstructions> {
    let whirlpool = fetch_whirlpool(ledger, pool_address)?;

    let (mint, specified_token_a) = match params {
        SwapParams::ExactIn { mint, .. } | SwapParams::ExactOut { mint, .. } => {
            if mint == whirlpool.token_mint_a {
                (mint, true)
            } else if mint == whirlpool.token_mint_b {
                (mint, false)
            } else {
                bail!("mint {mint} is not traded by pool {pool_address}");
            }
        }
    };
    let a_to_b = match params {
        SwapParams::ExactIn { .. } => specified_token_a,
        SwapParams::ExactOut { .. } => !specified_token_a,
    };

    let start_indexes =
        swap_tick_array_start_indexes(whirlpool.tick_current_index, whirlpool.tick_spacing, a_to_b);
    let tick_array_addresses = start_indexes.map(|start_index| get_tick_array_address(pool_address, start_index).0);
    let tick_arrays = fetch_tick_arrays(ledger, &tick_array_addresses)?
        .into_iter()
        .zip(start_indexes)
        .map(|(tick_array, start_index)| tick_array.unwrap_or_else(|| TickArray::empty(*pool_address, start_index)))
        .collect();
    let tick_sequence = TickArraySequence::new(tick_arrays, whirlpool.tick_spacing)?;

    let (quote, amount, other_amount_threshold, amount_specified_is_input) = match params {
        SwapParams::ExactIn { amount, .. } => {
            let quote = swap_quote_by_input_token(
                amount,
                specified_token_a,
                slippage_tolerance_bps,
                &whirlpool,
                &tick_sequence,
            )?;
            (SwapQuote::ExactIn(quote), quote.token_in, quote.token_min_out, true)
        }
        SwapParams::ExactOut { amount, .. } => {
            let quote = swap_quote_by_output_token(
                amount,
                specified_token_a,
                slippage_tolerance_bps,
                &whirlpool,
                &tick_sequence,
            )?;
            (SwapQuote::ExactOut(quote), quote.token_out, quote.token_max_in, false)
        }
    };
    tracing::debug!(%mint, a_to_b, amount, other_amount_threshold, "swap quote");

    let instructions = vec![
        create_ata_idempotent_instruction(authority, authority, &whirlpool.token_mint_a),
        create_ata_idempotent_instruction(authority, authority, &whirlpool.token_mint_b),
        swap_instruction(
            pool_address,
            &whirlpool,
            authority,
            tick_array_addresses,
            SwapInstructionArgs {
                amount,
                other_amount_threshold,
                sqrt_price_limit: if a_to_b { MIN_SQRT_PRICE } else { MAX_SQRT_PRICE },
                amount_specified_is_input,
                a_to_b,
            },
        )?,
    ];

    Ok(SwapInstructions {
        quote,
        a_to_b,
        instructions,
    })
}

fn swap_instruction(
    pool_address: &Pubkey,
    whirlpool: &Whirlpool,
    authority: &Pubkey,
    [tick_array0, tick_array1, tick_array2]: [Pubkey; 3],
    args: SwapInstructionArgs,
) -> Result<Instruction> {
    Ok(Swap {
        token_authority: *authority,
        whirlpool: *pool_address,
        token_owner_account_a: get_ata(authority, &whirlpool.token_mint_a),
        token_vault_a: whirlpool.token_vault_a,
        token_owner_account_b: get_ata(authority, &whirlpool.token_mint_b),
        token_vault_b: whirlpool.token_vault_b,
        tick_array0,
        tick_array1,
        tick_array2,
        oracle: get_oracle_address(pool_address).0,
    }
    .instruction(args)?)
}

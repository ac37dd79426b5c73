use solana_sdk::pubkey::Pubkey;
use whirlpool_tour_client::{
    WHIRLPOOL_ID,
    accounts::{
        POSITION_BUNDLE_DISCRIMINATOR, POSITION_BUNDLE_SIZE, Position, PositionBundle,
        TICK_ARRAY_SIZE, TickArray, WHIRLPOOL_DISCRIMINATOR, Whirlpool,
    },
    pda::{get_position_address, get_tick_array_address},
    types::{Tick, WhirlpoolRewardInfo},
};

use super::{constants::*, svm_ledger::SvmLedger};
use crate::{
    actions::DEVNET_WHIRLPOOLS_CONFIG,
    quote::tick_index_to_sqrt_price,
    scripts::{SAMO_USDC_TICK_SPACING, samo_usdc_pool_address},
    token::{DEV_SAMO, DEV_USDC},
};

pub fn whirlpool_at_tick(tick: i32, tick_spacing: u16, liquidity: u128, fee_rate: u16) -> Whirlpool {
    Whirlpool {
        discriminator: WHIRLPOOL_DISCRIMINATOR,
        whirlpools_config: DEVNET_WHIRLPOOLS_CONFIG,
        whirlpool_bump: [255],
        tick_spacing,
        fee_tier_index_seed: tick_spacing.to_le_bytes(),
        fee_rate,
        protocol_fee_rate: 300,
        liquidity,
        sqrt_price: tick_index_to_sqrt_price(tick).unwrap(),
        tick_current_index: tick,
        protocol_fee_owed_a: 0,
        protocol_fee_owed_b: 0,
        token_mint_a: TOKEN_MINT_A,
        token_vault_a: TOKEN_VAULT_A,
        fee_growth_global_a: 0,
        token_mint_b: TOKEN_MINT_B,
        token_vault_b: TOKEN_VAULT_B,
        fee_growth_global_b: 0,
        reward_last_updated_timestamp: 0,
        reward_infos: [WhirlpoolRewardInfo::default(); 3],
    }
}

/// Tick array of `POOL`. With a non-zero `liquidity` every tick is initialized with
/// that gross liquidity and no net change, so crossing them leaves the pool as is.
pub fn tick_array_with_liquidity(start: i32, tick_spacing: u16, liquidity: u128) -> TickArray {
    assert_eq!(start % (TICK_ARRAY_SIZE as i32 * tick_spacing as i32), 0);

    let mut tick_array = TickArray::empty(POOL, start);
    if liquidity > 0 {
        for tick in tick_array.ticks.iter_mut() {
            *tick = Tick {
                initialized: true,
                liquidity_gross: liquidity,
                ..Tick::default()
            };
        }
    }
    tick_array
}

pub fn position_in_range(lower: i32, upper: i32, liquidity: u128) -> Position {
    Position {
        whirlpool: POOL,
        position_mint: POSITION_MINT,
        liquidity,
        tick_lower_index: lower,
        tick_upper_index: upper,
        ..Position::default()
    }
}

pub fn position_bundle(mint: Pubkey, occupied: &[u16]) -> PositionBundle {
    let mut position_bitmap = [0u8; POSITION_BUNDLE_SIZE / 8];
    for index in occupied {
        position_bitmap[*index as usize / 8] |= 1 << (index % 8);
    }
    PositionBundle {
        discriminator: POSITION_BUNDLE_DISCRIMINATOR,
        position_bundle_mint: mint,
        position_bitmap,
    }
}

/// Writes `whirlpool` at `POOL` and creates its two mints.
pub fn setup_pool(ledger: &SvmLedger, whirlpool: &Whirlpool, decimals_a: u8, decimals_b: u8) {
    ledger.create_mint(&whirlpool.token_mint_a, &ALICE, decimals_a);
    ledger.create_mint(&whirlpool.token_mint_b, &ALICE, decimals_b);
    ledger.set_program_account(&POOL, &WHIRLPOOL_ID, whirlpool, Whirlpool::LEN);
}

pub fn setup_tick_array(ledger: &SvmLedger, tick_array: &TickArray) {
    let address = get_tick_array_address(&tick_array.whirlpool, tick_array.start_tick_index).0;
    ledger.set_program_account(&address, &WHIRLPOOL_ID, tick_array, TickArray::LEN);
}

pub fn setup_position(ledger: &SvmLedger, position: &Position) -> Pubkey {
    let address = get_position_address(&position.position_mint).0;
    ledger.set_program_account(&address, &WHIRLPOOL_ID, position, Position::LEN);
    address
}

/// The devSAMO/devUSDC pool at `tick`, with both mints created. Returns its address.
pub fn setup_samo_usdc_pool(ledger: &SvmLedger, tick: i32, liquidity: u128) -> Pubkey {
    let address = samo_usdc_pool_address();
    ledger.create_mint(&DEV_SAMO.mint, &ALICE, DEV_SAMO.decimals);
    ledger.create_mint(&DEV_USDC.mint, &ALICE, DEV_USDC.decimals);
    ledger.set_program_account(
        &address,
        &WHIRLPOOL_ID,
        &Whirlpool {
            token_mint_a: DEV_SAMO.mint,
            token_mint_b: DEV_USDC.mint,
            ..whirlpool_at_tick(tick, SAMO_USDC_TICK_SPACING, liquidity, FEE_RATE)
        },
        Whirlpool::LEN,
    );
    address
}

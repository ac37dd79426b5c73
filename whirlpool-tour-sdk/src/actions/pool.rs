use anyhow::Result;
use solana_sdk::{
    instruction::Instruction, program_pack::Pack, pubkey::Pubkey, signature::Keypair,
    signer::Signer,
};
use spl_token::state::Account as TokenAccount;
use tracing::debug;
use whirlpool_tour_client::{
    accounts::{FeeTier, TickArray, Whirlpool},
    errors::WhirlpoolError,
    instructions::{
        InitializePool, InitializePoolInstructionArgs, InitializeTickArray,
        InitializeTickArrayInstructionArgs,
    },
    pda::{get_fee_tier_address, get_tick_array_address, get_whirlpool_address},
    types::WhirlpoolBumps,
};

use super::{SPLASH_POOL_TICK_SPACING, SUPPORTED_TICK_SPACINGS, tick_array_start_indexes};
use crate::{
    ledger::{Ledger, fetch_mint},
    quote::{
        get_full_range_tick_indexes, price_to_sqrt_price, sqrt_price_to_price,
        sqrt_price_to_tick_index,
    },
    token::order_mints,
};

#[derive(Clone, Debug, PartialEq)]
pub struct InitializedPool {
    pub address: Pubkey,
    pub data: Whirlpool,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UninitializedPool {
    pub address: Pubkey,
    pub whirlpools_config: Pubkey,
    pub tick_spacing: u16,
    /// Fee rate a new pool would get from its fee tier, `None` when the tier does not exist.
    pub fee_rate: Option<u16>,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PoolInfo {
    Initialized(InitializedPool),
    Uninitialized(UninitializedPool),
}

impl PoolInfo {
    pub fn address(&self) -> Pubkey {
        match self {
            PoolInfo::Initialized(pool) => pool.address,
            PoolInfo::Uninitialized(pool) => pool.address,
        }
    }

    pub fn tick_spacing(&self) -> u16 {
        match self {
            PoolInfo::Initialized(pool) => pool.data.tick_spacing,
            PoolInfo::Uninitialized(pool) => pool.tick_spacing,
        }
    }
}

/// Price of token A in token B, adjusted by the mint decimals.
pub fn fetch_pool_price<L: Ledger + ?Sized>(ledger: &L, whirlpool: &Whirlpool) -> Result<f64> {
    let mint_a = fetch_mint(ledger, &whirlpool.token_mint_a)?;
    let mint_b = fetch_mint(ledger, &whirlpool.token_mint_b)?;

    Ok(sqrt_price_to_price(
        whirlpool.sqrt_price,
        mint_a.decimals,
        mint_b.decimals,
    ))
}

pub fn fetch_concentrated_liquidity_pool<L: Ledger + ?Sized>(
    ledger: &L,
    whirlpools_config: &Pubkey,
    token_mint_1: Pubkey,
    token_mint_2: Pubkey,
    tick_spacing: u16,
) -> Result<PoolInfo> {
    let (token_mint_a, token_mint_b) = order_mints(token_mint_1, token_mint_2);
    let address = get_whirlpool_address(whirlpools_config, &token_mint_a, &token_mint_b, tick_spacing).0;
    let fee_tier = get_fee_tier_address(whirlpools_config, tick_spacing).0;

    let accounts = ledger.get_multiple_accounts(&[address, fee_tier])?;
    pool_info(
        ledger,
        address,
        whirlpools_config,
        (token_mint_a, token_mint_b),
        tick_spacing,
        accounts[0].as_ref().map(|account| account.data.as_slice()),
        accounts[1].as_ref().map(|account| account.data.as_slice()),
    )
}

pub fn fetch_splash_pool<L: Ledger + ?Sized>(
    ledger: &L,
    whirlpools_config: &Pubkey,
    token_mint_1: Pubkey,
    token_mint_2: Pubkey,
) -> Result<PoolInfo> {
    fetch_concentrated_liquidity_pool(
        ledger,
        whirlpools_config,
        token_mint_1,
        token_mint_2,
        SPLASH_POOL_TICK_SPACING,
    )
}

/// Every pool of the pair across the supported tick spacings, initialized or not.
pub fn fetch_whirlpools_by_token_pair<L: Ledger + ?Sized>(
    ledger: &L,
    whirlpools_config: &Pubkey,
    token_mint_1: Pubkey,
    token_mint_2: Pubkey,
) -> Result<Vec<PoolInfo>> {
    let (token_mint_a, token_mint_b) = order_mints(token_mint_1, token_mint_2);

    let mut addresses = Vec::with_capacity(SUPPORTED_TICK_SPACINGS.len() * 2);
    for tick_spacing in SUPPORTED_TICK_SPACINGS {
        addresses.push(
            get_whirlpool_address(whirlpools_config, &token_mint_a, &token_mint_b, tick_spacing).0,
        );
        addresses.push(get_fee_tier_address(whirlpools_config, tick_spacing).0);
    }
    let accounts = ledger.get_multiple_accounts(&addresses)?;

    SUPPORTED_TICK_SPACINGS
        .iter()
        .zip(accounts.chunks(2).zip(addresses.chunks(2)))
        .map(|(tick_spacing, (accounts, addresses))| {
            pool_info(
                ledger,
                addresses[0],
                whirlpools_config,
                (token_mint_a, token_mint_b),
                *tick_spacing,
                accounts[0].as_ref().map(|account| account.data.as_slice()),
                accounts[1].as_ref().map(|account| account.data.as_slice()),
            )
        })
        .collect()
}

fn pool_info<L: Ledger + ?Sized>(
    ledger: &L,
    address: Pubkey,
    whirlpools_config: &Pubkey,
    (token_mint_a, token_mint_b): (Pubkey, Pubkey),
    tick_spacing: u16,
    whirlpool_data: Option<&[u8]>,
    fee_tier_data: Option<&[u8]>,
) -> Result<PoolInfo> {
    if let Some(data) = whirlpool_data {
        let data = Whirlpool::from_bytes(data)?;
        let price = fetch_pool_price(ledger, &data)?;
        return Ok(PoolInfo::Initialized(InitializedPool {
            address,
            data,
            price,
        }));
    }

    let fee_rate = fee_tier_data
        .map(FeeTier::from_bytes)
        .transpose()?
        .map(|fee_tier| fee_tier.default_fee_rate);

    Ok(PoolInfo::Uninitialized(UninitializedPool {
        address,
        whirlpools_config: *whirlpools_config,
        tick_spacing,
        fee_rate,
        token_mint_a,
        token_mint_b,
    }))
}

/// Parameters of a pool to create. The mints must already be ordered.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPool {
    pub whirlpools_config: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub decimals_a: u8,
    pub decimals_b: u8,
    pub tick_spacing: u16,
    pub initial_price: f64,
}

pub struct CreatePoolInstructions {
    pub pool_address: Pubkey,
    pub initial_sqrt_price: u128,
    /// Lamports locked as rent by the pool, its vaults and its first tick arrays.
    pub initialization_cost: u64,
    pub instructions: Vec<Instruction>,
    pub additional_signers: Vec<Keypair>,
}

pub fn create_splash_pool_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    pool: &NewPool,
    funder: &Pubkey,
) -> Result<CreatePoolInstructions> {
    let pool = NewPool {
        tick_spacing: SPLASH_POOL_TICK_SPACING,
        ..pool.clone()
    };
    create_concentrated_liquidity_pool_instructions(ledger, &pool, funder)
}

pub fn create_concentrated_liquidity_pool_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    pool: &NewPool,
    funder: &Pubkey,
) -> Result<CreatePoolInstructions> {
    if pool.token_mint_a.to_bytes() >= pool.token_mint_b.to_bytes() {
        return Err(WhirlpoolError::InvalidTokenMintOrder.into());
    }

    let initial_sqrt_price = price_to_sqrt_price(pool.initial_price, pool.decimals_a, pool.decimals_b);
    let current_tick_index = sqrt_price_to_tick_index(initial_sqrt_price)?;

    let (pool_address, whirlpool_bump) = get_whirlpool_address(
        &pool.whirlpools_config,
        &pool.token_mint_a,
        &pool.token_mint_b,
        pool.tick_spacing,
    );
    let token_vault_a = Keypair::new();
    let token_vault_b = Keypair::new();

    let mut instructions = vec![
        InitializePool {
            whirlpools_config: pool.whirlpools_config,
            token_mint_a: pool.token_mint_a,
            token_mint_b: pool.token_mint_b,
            funder: *funder,
            whirlpool: pool_address,
            token_vault_a: token_vault_a.pubkey(),
            token_vault_b: token_vault_b.pubkey(),
            fee_tier: get_fee_tier_address(&pool.whirlpools_config, pool.tick_spacing).0,
        }
        .instruction(InitializePoolInstructionArgs {
            bumps: WhirlpoolBumps { whirlpool_bump },
            tick_spacing: pool.tick_spacing,
            initial_sqrt_price,
        })?,
    ];

    let (full_range_lower, full_range_upper) = get_full_range_tick_indexes(pool.tick_spacing);
    let start_indexes = tick_array_start_indexes(
        &[full_range_lower, full_range_upper, current_tick_index],
        pool.tick_spacing,
    );
    debug!(?start_indexes, "initializing tick arrays");

    for start_tick_index in &start_indexes {
        instructions.push(
            InitializeTickArray {
                whirlpool: pool_address,
                funder: *funder,
                tick_array: get_tick_array_address(&pool_address, *start_tick_index).0,
            }
            .instruction(InitializeTickArrayInstructionArgs {
                start_tick_index: *start_tick_index,
            })?,
        );
    }

    let initialization_cost = ledger.minimum_balance_for_rent_exemption(Whirlpool::LEN)?
        + 2 * ledger.minimum_balance_for_rent_exemption(TokenAccount::LEN)?
        + start_indexes.len() as u64 * ledger.minimum_balance_for_rent_exemption(TickArray::LEN)?;

    Ok(CreatePoolInstructions {
        pool_address,
        initial_sqrt_price,
        initialization_cost,
        instructions,
        additional_signers: vec![token_vault_a, token_vault_b],
    })
}

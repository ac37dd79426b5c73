use anyhow::{Result, bail};
use solana_sdk::{
    instruction::Instruction, program_pack::Pack, pubkey::Pubkey, signature::Keypair,
    signer::Signer,
};
use spl_token::state::{Account as TokenAccount, Mint};
use tracing::debug;
use whirlpool_tour_client::{
    WHIRLPOOL_ID,
    accounts::{Position, PositionBundle, Whirlpool},
    instructions::{
        ClosePosition, CollectFees, CollectReward, CollectRewardInstructionArgs,
        DecreaseLiquidityInstructionArgs, IncreaseLiquidityInstructionArgs, ModifyLiquidity,
        OpenPosition, OpenPositionInstructionArgs, UpdateFeesAndRewards,
    },
    pda::{
        get_bundled_position_address, get_position_address, get_position_bundle_address,
        get_tick_array_address,
    },
    types::OpenPositionBumps,
};

use super::{fetch_boundary_ticks, initialize_missing_tick_arrays};
use crate::{
    ledger::{
        Ledger, fetch_mint, fetch_position, fetch_token_accounts_by_owner, fetch_unix_timestamp,
        fetch_whirlpool,
    },
    quote::{
        CollectFeesQuote, CollectRewardsQuote, DecreaseLiquidityQuote, IncreaseLiquidityQuote,
        collect_fees_quote, collect_rewards_quote, decrease_liquidity_quote,
        get_initializable_tick_index, get_occupied_positions_in_bundle,
        get_tick_array_start_tick_index, increase_liquidity_quote, increase_liquidity_quote_a,
        increase_liquidity_quote_b, is_full_range_only, order_tick_indexes, price_to_tick_index,
    },
    token::{create_ata_idempotent_instruction, get_ata},
};

/// How much liquidity to add or remove, either directly or as an amount of one token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LiquidityParam {
    Liquidity(u128),
    TokenA(u64),
    TokenB(u64),
}

fn increase_quote(
    param: LiquidityParam,
    slippage_tolerance_bps: u16,
    sqrt_price: u128,
    tick_lower_index: i32,
    tick_upper_index: i32,
) -> Result<IncreaseLiquidityQuote> {
    match param {
        LiquidityParam::Liquidity(liquidity) => increase_liquidity_quote(
            liquidity,
            slippage_tolerance_bps,
            sqrt_price,
            tick_lower_index,
            tick_upper_index,
        ),
        LiquidityParam::TokenA(amount) => increase_liquidity_quote_a(
            amount,
            slippage_tolerance_bps,
            sqrt_price,
            tick_lower_index,
            tick_upper_index,
        ),
        LiquidityParam::TokenB(amount) => increase_liquidity_quote_b(
            amount,
            slippage_tolerance_bps,
            sqrt_price,
            tick_lower_index,
            tick_upper_index,
        ),
    }
}

fn decrease_quote(
    param: LiquidityParam,
    slippage_tolerance_bps: u16,
    sqrt_price: u128,
    tick_lower_index: i32,
    tick_upper_index: i32,
) -> Result<DecreaseLiquidityQuote> {
    let liquidity = match param {
        LiquidityParam::Liquidity(liquidity) => liquidity,
        token => increase_quote(token, 0, sqrt_price, tick_lower_index, tick_upper_index)?.liquidity_delta,
    };

    decrease_liquidity_quote(
        liquidity,
        slippage_tolerance_bps,
        sqrt_price,
        tick_lower_index,
        tick_upper_index,
    )
}

/// Initializable tick range closest to a price range.
pub fn price_range_to_tick_indexes(
    lower_price: f64,
    upper_price: f64,
    decimals_a: u8,
    decimals_b: u8,
    tick_spacing: u16,
) -> Result<(i32, i32)> {
    if is_full_range_only(tick_spacing) {
        bail!("pools with tick spacing {tick_spacing} only support full range positions");
    }

    let lower = price_to_tick_index(lower_price, decimals_a, decimals_b)?;
    let upper = price_to_tick_index(upper_price, decimals_a, decimals_b)?;
    let (lower, upper) = order_tick_indexes(
        get_initializable_tick_index(lower, tick_spacing, None),
        get_initializable_tick_index(upper, tick_spacing, None),
    );

    if lower == upper {
        bail!("price range [{lower_price}, {upper_price}] is narrower than one tick spacing");
    }

    Ok((lower, upper))
}

/// Tick range of a price range in `whirlpool`, using the decimals of its mints.
pub fn fetch_tick_range<L: Ledger + ?Sized>(
    ledger: &L,
    whirlpool: &Whirlpool,
    lower_price: f64,
    upper_price: f64,
) -> Result<(i32, i32)> {
    let mint_a = fetch_mint(ledger, &whirlpool.token_mint_a)?;
    let mint_b = fetch_mint(ledger, &whirlpool.token_mint_b)?;

    price_range_to_tick_indexes(
        lower_price,
        upper_price,
        mint_a.decimals,
        mint_b.decimals,
        whirlpool.tick_spacing,
    )
}

fn tick_array_address_of(whirlpool_address: &Pubkey, tick_index: i32, tick_spacing: u16) -> Pubkey {
    get_tick_array_address(
        whirlpool_address,
        get_tick_array_start_tick_index(tick_index, tick_spacing),
    )
    .0
}

fn modify_liquidity(
    position_address: &Pubkey,
    position: &Position,
    whirlpool: &Whirlpool,
    authority: &Pubkey,
) -> ModifyLiquidity {
    ModifyLiquidity {
        whirlpool: position.whirlpool,
        position_authority: *authority,
        position: *position_address,
        position_token_account: get_ata(authority, &position.position_mint),
        token_owner_account_a: get_ata(authority, &whirlpool.token_mint_a),
        token_owner_account_b: get_ata(authority, &whirlpool.token_mint_b),
        token_vault_a: whirlpool.token_vault_a,
        token_vault_b: whirlpool.token_vault_b,
        tick_array_lower: tick_array_address_of(
            &position.whirlpool,
            position.tick_lower_index,
            whirlpool.tick_spacing,
        ),
        tick_array_upper: tick_array_address_of(
            &position.whirlpool,
            position.tick_upper_index,
            whirlpool.tick_spacing,
        ),
    }
}

fn create_token_atas(authority: &Pubkey, whirlpool: &Whirlpool) -> [Instruction; 2] {
    [
        create_ata_idempotent_instruction(authority, authority, &whirlpool.token_mint_a),
        create_ata_idempotent_instruction(authority, authority, &whirlpool.token_mint_b),
    ]
}

pub struct OpenPositionInstructions {
    pub position_mint: Pubkey,
    pub position_address: Pubkey,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    pub quote: IncreaseLiquidityQuote,
    /// Rent of the position accounts and of the tick arrays created for it.
    pub initialization_cost: u64,
    pub instructions: Vec<Instruction>,
    pub additional_signers: Vec<Keypair>,
}

/// Opens a position over `[lower_price, upper_price]` and deposits into it.
pub fn open_position_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    pool_address: &Pubkey,
    param: LiquidityParam,
    lower_price: f64,
    upper_price: f64,
    slippage_tolerance_bps: u16,
    funder: &Pubkey,
) -> Result<OpenPositionInstructions> {
    let whirlpool = fetch_whirlpool(ledger, pool_address)?;
    let (tick_lower_index, tick_upper_index) =
        fetch_tick_range(ledger, &whirlpool, lower_price, upper_price)?;
    debug!(tick_lower_index, tick_upper_index, "position range");

    let quote = increase_quote(
        param,
        slippage_tolerance_bps,
        whirlpool.sqrt_price,
        tick_lower_index,
        tick_upper_index,
    )?;

    let position_mint = Keypair::new();
    let (position_address, position_bump) = get_position_address(&position_mint.pubkey());
    let position_token_account = get_ata(funder, &position_mint.pubkey());

    let (mut instructions, tick_arrays_cost) = initialize_missing_tick_arrays(
        ledger,
        pool_address,
        whirlpool.tick_spacing,
        &[tick_lower_index, tick_upper_index],
        funder,
    )?;
    instructions.extend(create_token_atas(funder, &whirlpool));

    instructions.push(
        OpenPosition {
            funder: *funder,
            owner: *funder,
            position: position_address,
            position_mint: position_mint.pubkey(),
            position_token_account,
            whirlpool: *pool_address,
        }
        .instruction(OpenPositionInstructionArgs {
            bumps: OpenPositionBumps { position_bump },
            tick_lower_index,
            tick_upper_index,
        })?,
    );

    let position = Position {
        whirlpool: *pool_address,
        position_mint: position_mint.pubkey(),
        tick_lower_index,
        tick_upper_index,
        ..Position::default()
    };
    instructions.push(
        modify_liquidity(&position_address, &position, &whirlpool, funder).increase_instruction(
            IncreaseLiquidityInstructionArgs {
                liquidity_amount: quote.liquidity_delta,
                token_max_a: quote.token_max_a,
                token_max_b: quote.token_max_b,
            },
        )?,
    );

    let initialization_cost = tick_arrays_cost
        + ledger.minimum_balance_for_rent_exemption(Position::LEN)?
        + ledger.minimum_balance_for_rent_exemption(Mint::LEN)?
        + ledger.minimum_balance_for_rent_exemption(TokenAccount::LEN)?;

    Ok(OpenPositionInstructions {
        position_mint: position_mint.pubkey(),
        position_address,
        tick_lower_index,
        tick_upper_index,
        quote,
        initialization_cost,
        instructions,
        additional_signers: vec![position_mint],
    })
}

pub struct IncreaseLiquidityInstructions {
    pub quote: IncreaseLiquidityQuote,
    pub instructions: Vec<Instruction>,
}

pub fn increase_liquidity_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    position_address: &Pubkey,
    param: LiquidityParam,
    slippage_tolerance_bps: u16,
    authority: &Pubkey,
) -> Result<IncreaseLiquidityInstructions> {
    let position = fetch_position(ledger, position_address)?;
    let whirlpool = fetch_whirlpool(ledger, &position.whirlpool)?;

    let quote = increase_quote(
        param,
        slippage_tolerance_bps,
        whirlpool.sqrt_price,
        position.tick_lower_index,
        position.tick_upper_index,
    )?;

    let mut instructions = create_token_atas(authority, &whirlpool).to_vec();
    instructions.push(
        modify_liquidity(position_address, &position, &whirlpool, authority).increase_instruction(
            IncreaseLiquidityInstructionArgs {
                liquidity_amount: quote.liquidity_delta,
                token_max_a: quote.token_max_a,
                token_max_b: quote.token_max_b,
            },
        )?,
    );

    Ok(IncreaseLiquidityInstructions {
        quote,
        instructions,
    })
}

pub struct DecreaseLiquidityInstructions {
    pub quote: DecreaseLiquidityQuote,
    pub instructions: Vec<Instruction>,
}

pub fn decrease_liquidity_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    position_address: &Pubkey,
    param: LiquidityParam,
    slippage_tolerance_bps: u16,
    authority: &Pubkey,
) -> Result<DecreaseLiquidityInstructions> {
    let position = fetch_position(ledger, position_address)?;
    let whirlpool = fetch_whirlpool(ledger, &position.whirlpool)?;

    let quote = decrease_quote(
        param,
        slippage_tolerance_bps,
        whirlpool.sqrt_price,
        position.tick_lower_index,
        position.tick_upper_index,
    )?;
    if quote.liquidity_delta > position.liquidity {
        bail!(
            "cannot withdraw {} liquidity from a position holding {}",
            quote.liquidity_delta,
            position.liquidity
        );
    }

    let mut instructions = create_token_atas(authority, &whirlpool).to_vec();
    instructions.push(
        modify_liquidity(position_address, &position, &whirlpool, authority).decrease_instruction(
            DecreaseLiquidityInstructionArgs {
                liquidity_amount: quote.liquidity_delta,
                token_min_a: quote.token_min_a,
                token_min_b: quote.token_min_b,
            },
        )?,
    );

    Ok(DecreaseLiquidityInstructions {
        quote,
        instructions,
    })
}

/// Fees and rewards a position can collect now.
pub struct PositionEarnings {
    pub position: Position,
    pub whirlpool: Whirlpool,
    pub fees_quote: CollectFeesQuote,
    pub rewards_quote: CollectRewardsQuote,
}

pub fn fetch_position_earnings<L: Ledger + ?Sized>(
    ledger: &L,
    position_address: &Pubkey,
) -> Result<PositionEarnings> {
    let position = fetch_position(ledger, position_address)?;
    let whirlpool = fetch_whirlpool(ledger, &position.whirlpool)?;
    let (tick_lower, tick_upper) = fetch_boundary_ticks(
        ledger,
        &position.whirlpool,
        &whirlpool,
        position.tick_lower_index,
        position.tick_upper_index,
    )?;
    let timestamp = fetch_unix_timestamp(ledger)?;

    let fees_quote = collect_fees_quote(&whirlpool, &position, &tick_lower, &tick_upper)?;
    let rewards_quote =
        collect_rewards_quote(&whirlpool, &position, &tick_lower, &tick_upper, timestamp)?;

    Ok(PositionEarnings {
        position,
        whirlpool,
        fees_quote,
        rewards_quote,
    })
}

fn collect_instructions(
    position_address: &Pubkey,
    position: &Position,
    whirlpool: &Whirlpool,
    authority: &Pubkey,
) -> Result<Vec<Instruction>> {
    let position_token_account = get_ata(authority, &position.position_mint);
    let mut instructions = vec![
        CollectFees {
            whirlpool: position.whirlpool,
            position_authority: *authority,
            position: *position_address,
            position_token_account,
            token_owner_account_a: get_ata(authority, &whirlpool.token_mint_a),
            token_vault_a: whirlpool.token_vault_a,
            token_owner_account_b: get_ata(authority, &whirlpool.token_mint_b),
            token_vault_b: whirlpool.token_vault_b,
        }
        .instruction(),
    ];

    for (reward_index, reward_info) in whirlpool.reward_infos.iter().enumerate() {
        if !reward_info.initialized() {
            continue;
        }
        instructions.push(create_ata_idempotent_instruction(authority, authority, &reward_info.mint));
        instructions.push(
            CollectReward {
                whirlpool: position.whirlpool,
                position_authority: *authority,
                position: *position_address,
                position_token_account,
                reward_owner_account: get_ata(authority, &reward_info.mint),
                reward_vault: reward_info.vault,
            }
            .instruction(CollectRewardInstructionArgs {
                reward_index: reward_index as u8,
            })?,
        );
    }

    Ok(instructions)
}

pub struct HarvestPositionInstructions {
    pub fees_quote: CollectFeesQuote,
    pub rewards_quote: CollectRewardsQuote,
    pub instructions: Vec<Instruction>,
}

/// Collects every fee and reward owed to the position.
pub fn harvest_position_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    position_address: &Pubkey,
    authority: &Pubkey,
) -> Result<HarvestPositionInstructions> {
    let PositionEarnings {
        position,
        whirlpool,
        fees_quote,
        rewards_quote,
    } = fetch_position_earnings(ledger, position_address)?;

    let mut instructions = Vec::new();
    if position.liquidity > 0 {
        instructions.push(
            UpdateFeesAndRewards {
                whirlpool: position.whirlpool,
                position: *position_address,
                tick_array_lower: tick_array_address_of(
                    &position.whirlpool,
                    position.tick_lower_index,
                    whirlpool.tick_spacing,
                ),
                tick_array_upper: tick_array_address_of(
                    &position.whirlpool,
                    position.tick_upper_index,
                    whirlpool.tick_spacing,
                ),
            }
            .instruction(),
        );
    }
    instructions.extend(create_token_atas(authority, &whirlpool));
    instructions.extend(collect_instructions(position_address, &position, &whirlpool, authority)?);

    Ok(HarvestPositionInstructions {
        fees_quote,
        rewards_quote,
        instructions,
    })
}

pub struct ClosePositionInstructions {
    pub quote: DecreaseLiquidityQuote,
    pub fees_quote: CollectFeesQuote,
    pub rewards_quote: CollectRewardsQuote,
    pub instructions: Vec<Instruction>,
}

/// Withdraws all liquidity, collects fees and rewards, then closes the position.
/// The rent goes back to `authority`.
pub fn close_position_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    position_address: &Pubkey,
    slippage_tolerance_bps: u16,
    authority: &Pubkey,
) -> Result<ClosePositionInstructions> {
    let PositionEarnings {
        position,
        whirlpool,
        fees_quote,
        rewards_quote,
    } = fetch_position_earnings(ledger, position_address)?;

    let quote = decrease_liquidity_quote(
        position.liquidity,
        slippage_tolerance_bps,
        whirlpool.sqrt_price,
        position.tick_lower_index,
        position.tick_upper_index,
    )?;

    let mut instructions = create_token_atas(authority, &whirlpool).to_vec();
    if position.liquidity > 0 {
        instructions.push(
            modify_liquidity(position_address, &position, &whirlpool, authority).decrease_instruction(
                DecreaseLiquidityInstructionArgs {
                    liquidity_amount: quote.liquidity_delta,
                    token_min_a: quote.token_min_a,
                    token_min_b: quote.token_min_b,
                },
            )?,
        );
    }
    instructions.extend(collect_instructions(position_address, &position, &whirlpool, authority)?);
    instructions.push(
        ClosePosition {
            position_authority: *authority,
            receiver: *authority,
            position: *position_address,
            position_mint: position.position_mint,
            position_token_account: get_ata(authority, &position.position_mint),
        }
        .instruction(),
    );

    Ok(ClosePositionInstructions {
        quote,
        fees_quote,
        rewards_quote,
        instructions,
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct HydratedPosition {
    pub address: Pubkey,
    pub data: Position,
    pub token_account: Pubkey,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HydratedBundledPosition {
    pub bundle_index: u16,
    pub address: Pubkey,
    pub data: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HydratedPositionBundle {
    pub address: Pubkey,
    pub data: PositionBundle,
    pub token_account: Pubkey,
    pub positions: Vec<HydratedBundledPosition>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PositionOrBundle {
    Position(HydratedPosition),
    PositionBundle(HydratedPositionBundle),
}

/// Positions and position bundles whose NFT sits in one of the owner's token accounts.
pub fn fetch_positions_for_owner<L: Ledger + ?Sized>(
    ledger: &L,
    owner: &Pubkey,
) -> Result<Vec<PositionOrBundle>> {
    let nft_accounts: Vec<(Pubkey, Pubkey)> = fetch_token_accounts_by_owner(ledger, owner)?
        .into_iter()
        .filter(|(_, account)| account.amount == 1)
        .map(|(address, account)| (address, account.mint))
        .collect();

    let mut addresses = Vec::with_capacity(nft_accounts.len() * 2);
    for (_, mint) in &nft_accounts {
        addresses.push(get_position_address(mint).0);
        addresses.push(get_position_bundle_address(mint).0);
    }
    let accounts = ledger.get_multiple_accounts(&addresses)?;

    let mut result = Vec::new();
    for ((token_account, mint), pair) in nft_accounts.iter().zip(accounts.chunks(2)) {
        if let Some(account) = pair[0].as_ref().filter(|account| account.owner == WHIRLPOOL_ID) {
            result.push(PositionOrBundle::Position(HydratedPosition {
                address: get_position_address(mint).0,
                data: Position::from_bytes(&account.data)?,
                token_account: *token_account,
            }));
        } else if let Some(account) = pair[1].as_ref().filter(|account| account.owner == WHIRLPOOL_ID) {
            let data = PositionBundle::from_bytes(&account.data)?;
            let positions = fetch_bundled_positions(ledger, &data)?;
            result.push(PositionOrBundle::PositionBundle(HydratedPositionBundle {
                address: get_position_bundle_address(mint).0,
                data,
                token_account: *token_account,
                positions,
            }));
        }
    }

    Ok(result)
}

fn fetch_bundled_positions<L: Ledger + ?Sized>(
    ledger: &L,
    bundle: &PositionBundle,
) -> Result<Vec<HydratedBundledPosition>> {
    let indexes = get_occupied_positions_in_bundle(bundle);
    let addresses: Vec<Pubkey> = indexes
        .iter()
        .map(|index| get_bundled_position_address(&bundle.position_bundle_mint, *index).0)
        .collect();

    let accounts = ledger.get_multiple_accounts(&addresses)?;
    let mut positions = Vec::with_capacity(indexes.len());
    for ((bundle_index, address), account) in indexes.into_iter().zip(addresses).zip(accounts) {
        if let Some(account) = account {
            positions.push(HydratedBundledPosition {
                bundle_index,
                address,
                data: Position::from_bytes(&account.data)?,
            });
        }
    }

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whirlpool_tour_client::accounts::TickArray;
    use crate::test_utils::{
        constants::*,
        fixtures::{
            position_bundle, position_in_range, setup_pool, setup_position, setup_tick_array,
            tick_array_with_liquidity, whirlpool_at_tick,
        },
        svm_ledger::SvmLedger,
    };

    fn setup_position_in_pool(liquidity: u128) -> (SvmLedger, Pubkey) {
        let ledger = SvmLedger::new(vec![ALICE]);
        setup_pool(&ledger, &whirlpool_at_tick(0, TICK_SPACING, liquidity, FEE_RATE), 9, 6);
        setup_tick_array(&ledger, &tick_array_with_liquidity(-5_632, TICK_SPACING, 0));
        setup_tick_array(&ledger, &tick_array_with_liquidity(0, TICK_SPACING, 0));
        let address = setup_position(&ledger, &position_in_range(-128, 128, liquidity));
        (ledger, address)
    }

    fn signers(instruction: &Instruction) -> Vec<Pubkey> {
        instruction
            .accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| meta.pubkey)
            .collect()
    }

    #[test]
    fn test_price_range_to_tick_indexes() {
        let (lower, upper) = price_range_to_tick_indexes(500.0, 2_000.0, 9, 6, 64).unwrap();
        assert!(lower < 0 && upper > 0);
        assert_eq!(lower % 64, 0);
        assert_eq!(upper % 64, 0);

        // reversed bounds come back ordered
        assert_eq!(
            price_range_to_tick_indexes(2_000.0, 500.0, 9, 6, 64).unwrap(),
            (lower, upper)
        );
    }

    #[test]
    fn test_price_range_to_tick_indexes_rejects_degenerate_ranges() {
        assert!(price_range_to_tick_indexes(500.0, 2_000.0, 9, 6, 32_896).is_err());
        assert!(price_range_to_tick_indexes(1_000.0, 1_000.0, 9, 6, 64).is_err());
    }

    #[test]
    fn test_open_position() {
        let ledger = SvmLedger::new(vec![ALICE]);
        setup_pool(&ledger, &whirlpool_at_tick(0, TICK_SPACING, 0, FEE_RATE), 9, 6);

        let result = open_position_instructions(
            &ledger,
            &POOL,
            LiquidityParam::TokenB(1_000_000),
            500.0,
            2_000.0,
            100,
            &ALICE,
        )
        .unwrap();

        // two missing tick arrays, two token accounts, open, deposit
        assert_eq!(result.instructions.len(), 6);
        assert!(result.tick_lower_index < 0 && result.tick_upper_index > 0);
        assert!(result.quote.liquidity_delta > 0);
        assert!(result.quote.token_max_b >= result.quote.token_est_b);
        assert_eq!(result.position_address, get_position_address(&result.position_mint).0);
        assert_eq!(result.additional_signers.len(), 1);
        assert_eq!(result.additional_signers[0].pubkey(), result.position_mint);
        assert!(signers(&result.instructions[4]).contains(&result.position_mint));

        let rent = |len| ledger.minimum_balance_for_rent_exemption(len).unwrap();
        assert_eq!(
            result.initialization_cost,
            2 * rent(TickArray::LEN) + rent(Position::LEN) + rent(Mint::LEN) + rent(TokenAccount::LEN)
        );
    }

    #[test]
    fn test_open_position_reuses_existing_tick_arrays() {
        let (ledger, _) = setup_position_in_pool(0);

        let result = open_position_instructions(
            &ledger,
            &POOL,
            LiquidityParam::Liquidity(1_000_000),
            999.0,
            1_001.0,
            100,
            &ALICE,
        );

        // [999, 1001] is narrower than one spacing of 64 ticks around price 1000
        assert!(result.is_err());

        let result = open_position_instructions(
            &ledger,
            &POOL,
            LiquidityParam::Liquidity(1_000_000),
            990.0,
            1_010.0,
            100,
            &ALICE,
        )
        .unwrap();
        assert_eq!(result.instructions.len(), 4);
        assert_eq!(result.quote.liquidity_delta, 1_000_000);
    }

    #[test]
    fn test_increase_liquidity() {
        let (ledger, position_address) = setup_position_in_pool(1_000);

        let result = increase_liquidity_instructions(
            &ledger,
            &position_address,
            LiquidityParam::Liquidity(1_000_000),
            100,
            &ALICE,
        )
        .unwrap();

        assert_eq!(result.quote.liquidity_delta, 1_000_000);
        assert_eq!(result.instructions.len(), 3);
        let increase = &result.instructions[2];
        assert_eq!(increase.program_id, WHIRLPOOL_ID);
        assert_eq!(signers(increase), vec![ALICE]);
    }

    #[test]
    fn test_decrease_liquidity() {
        let (ledger, position_address) = setup_position_in_pool(1_000_000);

        let result = decrease_liquidity_instructions(
            &ledger,
            &position_address,
            LiquidityParam::Liquidity(300_000),
            100,
            &ALICE,
        )
        .unwrap();
        assert_eq!(result.quote.liquidity_delta, 300_000);
        assert!(result.quote.token_min_a <= result.quote.token_est_a);
        assert_eq!(result.instructions.len(), 3);

        let too_much = decrease_liquidity_instructions(
            &ledger,
            &position_address,
            LiquidityParam::Liquidity(1_000_001),
            100,
            &ALICE,
        );
        assert!(too_much.is_err());
    }

    #[test]
    fn test_harvest_position() {
        let (ledger, position_address) = setup_position_in_pool(1_000);

        let result = harvest_position_instructions(&ledger, &position_address, &ALICE).unwrap();

        assert_eq!(result.fees_quote.fee_owed_a, 0);
        assert_eq!(result.fees_quote.fee_owed_b, 0);
        // refresh, two token accounts, collect fees
        assert_eq!(result.instructions.len(), 4);
    }

    #[test]
    fn test_harvest_empty_position_skips_refresh() {
        let (ledger, position_address) = setup_position_in_pool(0);

        let result = harvest_position_instructions(&ledger, &position_address, &ALICE).unwrap();

        assert_eq!(result.instructions.len(), 3);
    }

    #[test]
    fn test_close_position() {
        let (ledger, position_address) = setup_position_in_pool(1_000_000);

        let result = close_position_instructions(&ledger, &position_address, 100, &ALICE).unwrap();

        assert_eq!(result.quote.liquidity_delta, 1_000_000);
        // two token accounts, withdraw, collect fees, close
        assert_eq!(result.instructions.len(), 5);
        let close = result.instructions.last().unwrap();
        assert!(close.accounts.iter().any(|meta| meta.pubkey == POSITION_MINT));
    }

    #[test]
    fn test_close_position_without_tick_arrays() {
        let ledger = SvmLedger::new(vec![ALICE]);
        setup_pool(&ledger, &whirlpool_at_tick(0, TICK_SPACING, 0, FEE_RATE), 9, 6);
        let position_address = setup_position(&ledger, &position_in_range(-128, 128, 0));

        assert!(close_position_instructions(&ledger, &position_address, 100, &ALICE).is_err());
    }

    #[test]
    fn test_fetch_positions_for_owner() {
        let (ledger, position_address) = setup_position_in_pool(1_000);
        let bundle_mint = Pubkey::new_unique();
        ledger.create_mint(&POSITION_MINT, &ALICE, 0);
        ledger.create_mint(&bundle_mint, &ALICE, 0);
        let bundle_address = get_position_bundle_address(&bundle_mint).0;
        ledger.set_program_account(
            &bundle_address,
            &WHIRLPOOL_ID,
            &position_bundle(bundle_mint, &[3]),
            PositionBundle::LEN,
        );
        let bundled_address = get_bundled_position_address(&bundle_mint, 3).0;
        ledger.set_program_account(
            &bundled_address,
            &WHIRLPOOL_ID,
            &Position {
                position_mint: bundle_mint,
                ..position_in_range(-64, 64, 10)
            },
            Position::LEN,
        );

        let mut instructions = Vec::new();
        for mint in [POSITION_MINT, bundle_mint] {
            instructions.push(create_ata_idempotent_instruction(&ALICE, &ALICE, &mint));
            instructions.push(
                spl_token::instruction::mint_to(
                    &spl_token::id(),
                    &mint,
                    &get_ata(&ALICE, &mint),
                    &ALICE,
                    &[],
                    1,
                )
                .unwrap(),
            );
        }
        ledger.execute(instructions, &ALICE).unwrap();

        let positions = fetch_positions_for_owner(&ledger, &ALICE).unwrap();
        assert_eq!(positions.len(), 2);
        let position = positions
            .iter()
            .find_map(|entry| match entry {
                PositionOrBundle::Position(position) => Some(position),
                PositionOrBundle::PositionBundle(_) => None,
            })
            .unwrap();
        assert_eq!(position.address, position_address);
        assert_eq!(position.data.liquidity, 1_000);

        let bundle = positions
            .iter()
            .find_map(|entry| match entry {
                PositionOrBundle::PositionBundle(bundle) => Some(bundle),
                PositionOrBundle::Position(_) => None,
            })
            .unwrap();
        assert_eq!(bundle.address, bundle_address);
        assert_eq!(bundle.positions.len(), 1);
        assert_eq!(bundle.positions[0].bundle_index, 3);
        assert_eq!(bundle.positions[0].address, bundled_address);
    }
}

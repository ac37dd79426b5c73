use anyhow::{Context, Result, anyhow};
use solana_sdk::{
    clock::Clock, program_pack::Pack, pubkey::Pubkey, sysvar,
};
use spl_token::state::{Account as TokenAccount, Mint};
use whirlpool_tour_client::{
    WHIRLPOOL_ID,
    accounts::{Position, PositionBundle, TickArray, Whirlpool},
};

use super::{AccountFilter, Ledger};

fn fetch_data<L: Ledger + ?Sized>(ledger: &L, address: &Pubkey, kind: &str) -> Result<Vec<u8>> {
    ledger
        .get_account(address)?
        .map(|account| account.data)
        .ok_or_else(|| anyhow!("{kind} account {address} not found"))
}

pub fn fetch_whirlpool<L: Ledger + ?Sized>(ledger: &L, address: &Pubkey) -> Result<Whirlpool> {
    let data = fetch_data(ledger, address, "whirlpool")?;
    Whirlpool::from_bytes(&data).with_context(|| format!("failed to decode whirlpool {address}"))
}

pub fn fetch_position<L: Ledger + ?Sized>(ledger: &L, address: &Pubkey) -> Result<Position> {
    let data = fetch_data(ledger, address, "position")?;
    Position::from_bytes(&data).with_context(|| format!("failed to decode position {address}"))
}

pub fn fetch_position_bundle<L: Ledger + ?Sized>(
    ledger: &L,
    address: &Pubkey,
) -> Result<PositionBundle> {
    let data = fetch_data(ledger, address, "position bundle")?;
    PositionBundle::from_bytes(&data)
        .with_context(|| format!("failed to decode position bundle {address}"))
}

/// Tick arrays in the order of `addresses`, `None` for arrays that were never initialized.
pub fn fetch_tick_arrays<L: Ledger + ?Sized>(
    ledger: &L,
    addresses: &[Pubkey],
) -> Result<Vec<Option<TickArray>>> {
    ledger
        .get_multiple_accounts(addresses)?
        .into_iter()
        .zip(addresses)
        .map(|(account, address)| {
            account
                .map(|account| TickArray::from_bytes(&account.data))
                .transpose()
                .with_context(|| format!("failed to decode tick array {address}"))
        })
        .collect()
}

/// Every tick array belonging to `whirlpool`, sorted by start tick index.
pub fn fetch_tick_arrays_of_pool<L: Ledger + ?Sized>(
    ledger: &L,
    whirlpool: &Pubkey,
) -> Result<Vec<(Pubkey, TickArray)>> {
    let accounts = ledger.get_program_accounts(
        &WHIRLPOOL_ID,
        &[
            AccountFilter::DataSize(TickArray::LEN as u64),
            AccountFilter::Memcmp {
                offset: TickArray::WHIRLPOOL_OFFSET,
                bytes: whirlpool.to_bytes().to_vec(),
            },
        ],
    )?;

    let mut tick_arrays = accounts
        .into_iter()
        .map(|(address, account)| Ok((address, TickArray::from_bytes(&account.data)?)))
        .collect::<Result<Vec<_>>>()?;
    tick_arrays.sort_by_key(|(_, tick_array)| tick_array.start_tick_index);

    Ok(tick_arrays)
}

pub fn fetch_mint<L: Ledger + ?Sized>(ledger: &L, address: &Pubkey) -> Result<Mint> {
    let data = fetch_data(ledger, address, "mint")?;
    Mint::unpack(&data).with_context(|| format!("failed to decode mint {address}"))
}

/// Classic SPL token accounts owned by `owner`.
pub fn fetch_token_accounts_by_owner<L: Ledger + ?Sized>(
    ledger: &L,
    owner: &Pubkey,
) -> Result<Vec<(Pubkey, TokenAccount)>> {
    let accounts = ledger.get_token_accounts_by_owner(owner, &spl_token::ID)?;

    let mut token_accounts = accounts
        .into_iter()
        .map(|(address, account)| Ok((address, TokenAccount::unpack(&account.data)?)))
        .collect::<Result<Vec<_>>>()?;
    token_accounts.sort_by_key(|(address, _)| *address);

    Ok(token_accounts)
}

/// Unix timestamp of the cluster clock.
pub fn fetch_unix_timestamp<L: Ledger + ?Sized>(ledger: &L) -> Result<u64> {
    let data = fetch_data(ledger, &sysvar::clock::ID, "clock sysvar")?;
    let clock: Clock = bincode::deserialize(&data).context("failed to decode clock sysvar")?;
    Ok(clock.unix_timestamp.max(0) as u64)
}

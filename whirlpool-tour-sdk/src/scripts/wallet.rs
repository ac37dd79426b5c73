use std::io::Write;

use anyhow::{Result, anyhow};
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey, pubkey::Pubkey};
use tracing::debug;

use super::Session;
use crate::{
    actions::{dev_token_instruction, transfer_sol_instructions, transfer_token_instructions},
    i18n::Step,
    ledger::{Ledger, fetch_token_accounts_by_owner},
    token::{DEV_SAMO, DEV_TOKENS, find_by_mint, find_by_name, lamports_to_sol, ui_amount},
};

/// Recipient of the transfer scenarios.
pub const TRANSFER_DESTINATION: Pubkey = pubkey!("vQW71yo6X1FjTwt9gaWtHYeoGMu7W9ehSmNiib7oW5G");
pub const TRANSFER_SOL_LAMPORTS: u64 = 10_000_000;
/// 1 devSAMO.
pub const TRANSFER_SAMO_AMOUNT: u64 = 1_000_000_000;
pub const AIRDROP_LAMPORTS: u64 = LAMPORTS_PER_SOL;

pub fn airdrop<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    let owner = session.owner();
    let signature = session.ledger.request_airdrop(&owner, AIRDROP_LAMPORTS)?;
    session.report.line("signature", signature)?;

    sol_balance(session)
}

pub fn sol_balance<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    let owner = session.owner();
    session.report.line("wallet address", owner)?;

    session.step(Step::ObtainBalance);
    let lamports = session.ledger.get_balance(&owner)?;
    session.report.line("lamports", lamports)?;
    session.report.line("SOL", lamports_to_sol(lamports).normalize())
}

pub fn token_balances<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::ObtainTokenAccounts);
    let accounts = fetch_token_accounts_by_owner(session.ledger, &session.owner())?;

    for (address, account) in accounts {
        let Some(token) = find_by_mint(&account.mint) else {
            debug!(%address, mint = %account.mint, "skipping token outside the tour");
            continue;
        };

        session.report.line("token account", address)?;
        session.report.field("mint", account.mint)?;
        session.report.field("name", token.name)?;
        session
            .report
            .field("amount", ui_amount(account.amount, token.decimals as u32))?;
    }

    Ok(())
}

pub fn transfer_sol<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::BuildSolTransfer);
    let instructions =
        transfer_sol_instructions(&session.owner(), &TRANSFER_DESTINATION, TRANSFER_SOL_LAMPORTS);

    session.submit(&instructions, &[])?;
    Ok(())
}

pub fn transfer_token<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>) -> Result<()> {
    session.step(Step::BuildTokenTransfer);
    let instructions = transfer_token_instructions(
        &session.owner(),
        &TRANSFER_DESTINATION,
        &DEV_SAMO.mint,
        DEV_SAMO.decimals,
        TRANSFER_SAMO_AMOUNT,
    )?;

    session.submit(&instructions, &[])?;
    Ok(())
}

pub fn dev_token<L: Ledger + ?Sized, W: Write>(session: &mut Session<L, W>, name: &str) -> Result<()> {
    let token = find_by_name(name).ok_or_else(|| {
        let names: Vec<&str> = DEV_TOKENS.iter().map(|token| token.name).collect();
        anyhow!("unknown dev token {name}, expected one of {}", names.join(", "))
    })?;
    session.report.line("mint", token.mint)?;

    let instruction = dev_token_instruction(&session.owner(), &token.mint);
    session.submit(&[instruction], &[])?;
    Ok(())
}

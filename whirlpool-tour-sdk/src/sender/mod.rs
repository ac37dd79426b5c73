//! Transaction building and submission with compute budget, priority fee and tip.

mod jito;

pub use jito::*;

use anyhow::{Result, bail};
use num_traits::FromPrimitive;
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    hash::Hash,
    instruction::{Instruction, InstructionError},
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_instruction,
    transaction::{Transaction, TransactionError},
};
use tracing::{debug, info};
use whirlpool_tour_client::errors::WhirlpoolError;

use crate::ledger::Ledger;

pub const MAX_COMPUTE_UNIT_LIMIT: u32 = 1_400_000;
pub const DEFAULT_COMPUTE_UNIT_MARGIN_MULTIPLIER: f64 = 1.1;

const MICRO_LAMPORTS_PER_LAMPORT: u128 = 1_000_000;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PriorityFeeSetting {
    #[default]
    None,
    /// Compute unit price in micro-lamports.
    Exact(u64),
    /// Percentile (0-100) of the recent prioritization fees, with the total fee of
    /// the transaction capped at `max_cap_lamports`.
    Dynamic { percentile: u8, max_cap_lamports: u64 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum JitoTipSetting {
    #[default]
    None,
    Exact(u64),
    Dynamic { percentile: JitoPercentile, max_cap_lamports: u64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SenderConfig {
    pub priority_fee: PriorityFeeSetting,
    pub jito_tip: JitoTipSetting,
    pub compute_unit_margin_multiplier: f64,
    pub jito_tip_floor_url: String,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            priority_fee: PriorityFeeSetting::None,
            jito_tip: JitoTipSetting::None,
            compute_unit_margin_multiplier: DEFAULT_COMPUTE_UNIT_MARGIN_MULTIPLIER,
            jito_tip_floor_url: JITO_TIP_FLOOR_URL.to_string(),
        }
    }
}

/// Builds the final transaction: compute unit limit from a simulation of everything
/// that will be sent (priority fee and tip included), then the fee, the tip and
/// `instructions`.
pub fn build_transaction<L: Ledger + ?Sized>(
    ledger: &L,
    instructions: &[Instruction],
    payer: &Keypair,
    extra_signers: &[&Keypair],
    config: &SenderConfig,
) -> Result<Transaction> {
    let blockhash = ledger.latest_blockhash()?;

    let tip = match config.jito_tip {
        JitoTipSetting::None => 0,
        JitoTipSetting::Exact(lamports) => lamports,
        JitoTipSetting::Dynamic {
            percentile,
            max_cap_lamports,
        } => fetch_tip_floor(&config.jito_tip_floor_url)?
            .lamports(percentile)
            .min(max_cap_lamports),
    };
    let mut body = Vec::with_capacity(instructions.len() + 1);
    if tip > 0 {
        info!(tip, "adding jito tip");
        body.push(system_instruction::transfer(
            &payer.pubkey(),
            &tip_account(&blockhash),
            tip,
        ));
    }
    body.extend_from_slice(instructions);

    // simulated at price zero, the price needs the limit first
    let pays_priority_fee = config.priority_fee != PriorityFeeSetting::None;
    let consumed =
        simulate_compute_units(ledger, &body, &payer.pubkey(), blockhash, pays_priority_fee)?;
    let compute_unit_limit = compute_unit_limit(consumed, config.compute_unit_margin_multiplier);
    debug!(consumed, compute_unit_limit, "simulated transaction");

    let compute_unit_price = match config.priority_fee {
        PriorityFeeSetting::None => 0,
        PriorityFeeSetting::Exact(price) => price,
        PriorityFeeSetting::Dynamic {
            percentile,
            max_cap_lamports,
        } => {
            let writable_accounts = writable_accounts(instructions);
            let fees = ledger.recent_prioritization_fees(&writable_accounts)?;
            capped_compute_unit_price(
                fee_percentile(fees, percentile),
                compute_unit_limit,
                max_cap_lamports,
            )
        }
    };

    let mut all_instructions =
        vec![ComputeBudgetInstruction::set_compute_unit_limit(compute_unit_limit)];
    if pays_priority_fee {
        info!(compute_unit_price, "setting priority fee");
        all_instructions.push(ComputeBudgetInstruction::set_compute_unit_price(
            compute_unit_price,
        ));
    }
    all_instructions.extend(body);

    let message = Message::new(&all_instructions, Some(&payer.pubkey()));
    let mut signers = vec![payer];
    signers.extend_from_slice(extra_signers);

    let mut transaction = Transaction::new_unsigned(message);
    transaction.try_sign(&signers, blockhash)?;
    Ok(transaction)
}

pub fn build_and_send_transaction<L: Ledger + ?Sized>(
    ledger: &L,
    instructions: &[Instruction],
    payer: &Keypair,
    extra_signers: &[&Keypair],
    config: &SenderConfig,
) -> Result<Signature> {
    let transaction = build_transaction(ledger, instructions, payer, extra_signers, config)?;
    let signature = ledger.send_and_confirm_transaction(&transaction)?;
    info!(%signature, "transaction confirmed");

    Ok(signature)
}

fn simulate_compute_units<L: Ledger + ?Sized>(
    ledger: &L,
    instructions: &[Instruction],
    payer: &Pubkey,
    blockhash: Hash,
    with_compute_unit_price: bool,
) -> Result<u64> {
    let mut simulated =
        vec![ComputeBudgetInstruction::set_compute_unit_limit(MAX_COMPUTE_UNIT_LIMIT)];
    if with_compute_unit_price {
        simulated.push(ComputeBudgetInstruction::set_compute_unit_price(0));
    }
    simulated.extend_from_slice(instructions);

    let mut transaction = Transaction::new_unsigned(Message::new(&simulated, Some(payer)));
    transaction.message.recent_blockhash = blockhash;

    let simulation = ledger.simulate_transaction(&transaction)?;
    if let Some(err) = simulation.err {
        for log in &simulation.logs {
            debug!("{log}");
        }
        match &err {
            TransactionError::InstructionError(index, InstructionError::Custom(code)) => {
                match WhirlpoolError::from_u32(*code) {
                    Some(error) => bail!("simulation failed at instruction {index}: {error}"),
                    None => bail!("simulation failed: {err}"),
                }
            }
            _ => bail!("simulation failed: {err}"),
        }
    }

    Ok(simulation
        .units_consumed
        .unwrap_or(MAX_COMPUTE_UNIT_LIMIT as u64))
}

pub fn compute_unit_limit(consumed: u64, margin_multiplier: f64) -> u32 {
    let limit = (consumed as f64 * margin_multiplier).ceil() as u64;
    limit.min(MAX_COMPUTE_UNIT_LIMIT as u64) as u32
}

/// Value at `percentile` of the sorted fees, 0 when there are none.
pub fn fee_percentile(mut fees: Vec<u64>, percentile: u8) -> u64 {
    if fees.is_empty() {
        return 0;
    }
    fees.sort_unstable();
    let index = (fees.len() * percentile.min(100) as usize / 100).min(fees.len() - 1);
    fees[index]
}

/// Lowers the compute unit price so that price × limit stays under the cap.
pub fn capped_compute_unit_price(price: u64, compute_unit_limit: u32, max_cap_lamports: u64) -> u64 {
    let limit = compute_unit_limit as u128;
    if limit == 0 {
        return price;
    }
    let total = price as u128 * limit / MICRO_LAMPORTS_PER_LAMPORT;
    if total > max_cap_lamports as u128 {
        (max_cap_lamports as u128 * MICRO_LAMPORTS_PER_LAMPORT / limit) as u64
    } else {
        price
    }
}

fn writable_accounts(instructions: &[Instruction]) -> Vec<Pubkey> {
    let mut accounts: Vec<Pubkey> = Vec::new();
    for meta in instructions.iter().flat_map(|ix| ix.accounts.iter()) {
        if meta.is_writable && !accounts.contains(&meta.pubkey) {
            accounts.push(meta.pubkey);
        }
    }
    accounts
}

//! Devnet token table, amount formatting and associated token accounts.

use rust_decimal::Decimal;
use solana_sdk::{instruction::Instruction, pubkey, pubkey::Pubkey};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};

pub const SOL_DECIMALS: u32 = 9;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenDefinition {
    pub name: &'static str,
    pub mint: Pubkey,
    pub decimals: u8,
}

pub const DEV_USDC: TokenDefinition = TokenDefinition {
    name: "devUSDC",
    mint: pubkey!("BRjpCHtyQLNCo8gqRUr8jtdAj5AjPYQaoqbvcZiHok1k"),
    decimals: 6,
};

pub const DEV_USDT: TokenDefinition = TokenDefinition {
    name: "devUSDT",
    mint: pubkey!("H8UekPGwePSmQ3ttuYGPU1szyFfjZR4N53rymSFwpLPm"),
    decimals: 6,
};

pub const DEV_SAMO: TokenDefinition = TokenDefinition {
    name: "devSAMO",
    mint: pubkey!("Jd4M8bfJG3sAkd82RsGWyEXoaBXQP7njFzBwEaCTuDa"),
    decimals: 9,
};

pub const DEV_TMAC: TokenDefinition = TokenDefinition {
    name: "devTMAC",
    mint: pubkey!("Afn8YB1p4NsoZeS5XJBZ18LTfEy5NFPwN46wapZcBQr6"),
    decimals: 6,
};

pub const DEV_TOKENS: [TokenDefinition; 4] = [DEV_USDC, DEV_USDT, DEV_SAMO, DEV_TMAC];

pub fn find_by_mint(mint: &Pubkey) -> Option<&'static TokenDefinition> {
    DEV_TOKENS.iter().find(|token| token.mint == *mint)
}

pub fn find_by_name(name: &str) -> Option<&'static TokenDefinition> {
    DEV_TOKENS.iter().find(|token| token.name == name)
}

/// Raw base units scaled down by `10^decimals`, exact.
pub fn ui_amount(amount: u64, decimals: u32) -> Decimal {
    Decimal::from_i128_with_scale(amount as i128, decimals)
}

pub fn lamports_to_sol(lamports: u64) -> Decimal {
    ui_amount(lamports, SOL_DECIMALS)
}

pub fn get_ata(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

pub fn create_ata_idempotent_instruction(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    create_associated_token_account_idempotent(payer, owner, mint, &spl_token::ID)
}

/// Pools store their mints ordered by address bytes.
pub fn order_mints(mint_1: Pubkey, mint_2: Pubkey) -> (Pubkey, Pubkey) {
    if mint_1.to_bytes() < mint_2.to_bytes() {
        (mint_1, mint_2)
    } else {
        (mint_2, mint_1)
    }
}

use solana_program::pubkey::Pubkey;

use crate::programs::WHIRLPOOL_ID;

pub fn get_whirlpool_address(
    whirlpools_config: &Pubkey,
    token_mint_a: &Pubkey,
    token_mint_b: &Pubkey,
    tick_spacing: u16,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"whirlpool",
            whirlpools_config.as_ref(),
            token_mint_a.as_ref(),
            token_mint_b.as_ref(),
            &tick_spacing.to_le_bytes(),
        ],
        &WHIRLPOOL_ID,
    )
}

pub fn get_position_address(position_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"position", position_mint.as_ref()], &WHIRLPOOL_ID)
}

pub fn get_position_bundle_address(position_bundle_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[b"position_bundle", position_bundle_mint.as_ref()],
        &WHIRLPOOL_ID,
    )
}

/// Bundled positions are keyed by the bundle mint and the decimal text of the index.
pub fn get_bundled_position_address(position_bundle_mint: &Pubkey, bundle_index: u16) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"bundled_position",
            position_bundle_mint.as_ref(),
            bundle_index.to_string().as_bytes(),
        ],
        &WHIRLPOOL_ID,
    )
}

pub fn get_tick_array_address(whirlpool: &Pubkey, start_tick_index: i32) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"tick_array",
            whirlpool.as_ref(),
            start_tick_index.to_string().as_bytes(),
        ],
        &WHIRLPOOL_ID,
    )
}

pub fn get_fee_tier_address(whirlpools_config: &Pubkey, tick_spacing: u16) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"fee_tier",
            whirlpools_config.as_ref(),
            &tick_spacing.to_le_bytes(),
        ],
        &WHIRLPOOL_ID,
    )
}

pub fn get_oracle_address(whirlpool: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"oracle", whirlpool.as_ref()], &WHIRLPOOL_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_array_seed_uses_decimal_text() {
        let whirlpool = Pubkey::new_unique();
        let (expected, _) = Pubkey::find_program_address(
            &[b"tick_array", whirlpool.as_ref(), b"-5632"],
            &WHIRLPOOL_ID,
        );
        assert_eq!(get_tick_array_address(&whirlpool, -5632).0, expected);
    }

    #[test]
    fn test_bundled_positions_differ_by_index() {
        let mint = Pubkey::new_unique();
        assert_ne!(
            get_bundled_position_address(&mint, 0).0,
            get_bundled_position_address(&mint, 1).0
        );
    }
}

mod fee_tier;
mod position;
mod position_bundle;
mod tick_array;
mod whirlpool;

pub use fee_tier::*;
pub use position::*;
pub use position_bundle::*;
pub use tick_array::*;
pub use whirlpool::*;

use std::io::{Error, ErrorKind};

fn check_discriminator(found: &[u8; 8], expected: &[u8; 8], name: &str) -> Result<(), Error> {
    if found != expected {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("account is not a {name}: unexpected discriminator {found:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PositionRewardInfo, Tick, WhirlpoolRewardInfo};
    use solana_program::pubkey::Pubkey;

    fn position() -> Position {
        Position {
            discriminator: POSITION_DISCRIMINATOR,
            whirlpool: Pubkey::new_unique(),
            position_mint: Pubkey::new_unique(),
            liquidity: 1_000,
            tick_lower_index: -64,
            tick_upper_index: 64,
            fee_growth_checkpoint_a: 0,
            fee_owed_a: 7,
            fee_growth_checkpoint_b: 0,
            fee_owed_b: 9,
            reward_infos: [PositionRewardInfo::default(); 3],
        }
    }

    #[test]
    fn test_encoded_sizes() {
        let whirlpool = Whirlpool {
            discriminator: WHIRLPOOL_DISCRIMINATOR,
            whirlpools_config: Pubkey::new_unique(),
            whirlpool_bump: [255],
            tick_spacing: 64,
            fee_tier_index_seed: 64u16.to_le_bytes(),
            fee_rate: 3000,
            protocol_fee_rate: 300,
            liquidity: 0,
            sqrt_price: 1 << 64,
            tick_current_index: 0,
            protocol_fee_owed_a: 0,
            protocol_fee_owed_b: 0,
            token_mint_a: Pubkey::new_unique(),
            token_vault_a: Pubkey::new_unique(),
            fee_growth_global_a: 0,
            token_mint_b: Pubkey::new_unique(),
            token_vault_b: Pubkey::new_unique(),
            fee_growth_global_b: 0,
            reward_last_updated_timestamp: 0,
            reward_infos: [WhirlpoolRewardInfo::default(); 3],
        };
        assert_eq!(borsh::to_vec(&whirlpool).unwrap().len(), Whirlpool::LEN);
        assert_eq!(borsh::to_vec(&position()).unwrap().len(), Position::LEN);

        let tick_array = TickArray::empty(Pubkey::new_unique(), -5632);
        let bytes = borsh::to_vec(&tick_array).unwrap();
        assert_eq!(bytes.len(), TickArray::LEN);
        assert_eq!(
            &bytes[TickArray::WHIRLPOOL_OFFSET..],
            tick_array.whirlpool.as_ref()
        );
        assert_eq!(Tick::default().liquidity_net, 0);
    }

    #[test]
    fn test_from_bytes_checks_discriminator() {
        let position = position();
        let mut bytes = borsh::to_vec(&position).unwrap();
        assert_eq!(Position::from_bytes(&bytes).unwrap(), position);

        bytes[0] ^= 0xff;
        let err = Position::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert!(Whirlpool::from_bytes(&bytes).is_err());
    }
}

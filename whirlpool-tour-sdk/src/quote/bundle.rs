use whirlpool_tour_client::accounts::{POSITION_BUNDLE_SIZE, PositionBundle};

pub fn is_position_bundle_occupied(bundle: &PositionBundle, bundle_index: u16) -> bool {
    let index = bundle_index as usize;
    if index >= POSITION_BUNDLE_SIZE {
        return false;
    }
    bundle.position_bitmap[index / 8] & (1 << (index % 8)) != 0
}

pub fn get_first_unoccupied_position_in_bundle(bundle: &PositionBundle) -> Option<u16> {
    (0..POSITION_BUNDLE_SIZE as u16).find(|index| !is_position_bundle_occupied(bundle, *index))
}

pub fn get_occupied_positions_in_bundle(bundle: &PositionBundle) -> Vec<u16> {
    (0..POSITION_BUNDLE_SIZE as u16)
        .filter(|index| is_position_bundle_occupied(bundle, *index))
        .collect()
}

pub fn is_position_bundle_full(bundle: &PositionBundle) -> bool {
    bundle.position_bitmap.iter().all(|byte| *byte == u8::MAX)
}

pub fn is_position_bundle_empty(bundle: &PositionBundle) -> bool {
    bundle.position_bitmap.iter().all(|byte| *byte == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;
    use whirlpool_tour_client::accounts::POSITION_BUNDLE_DISCRIMINATOR;

    fn bundle(bitmap: [u8; 32]) -> PositionBundle {
        PositionBundle {
            discriminator: POSITION_BUNDLE_DISCRIMINATOR,
            position_bundle_mint: Pubkey::new_unique(),
            position_bitmap: bitmap,
        }
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = bundle([0; 32]);
        assert!(is_position_bundle_empty(&bundle));
        assert!(!is_position_bundle_full(&bundle));
        assert_eq!(get_first_unoccupied_position_in_bundle(&bundle), Some(0));
        assert!(get_occupied_positions_in_bundle(&bundle).is_empty());
    }

    #[test]
    fn test_partially_occupied_bundle() {
        let mut bitmap = [0; 32];
        bitmap[0] = 0b0000_0111;
        bitmap[1] = 0b1000_0000;
        let bundle = bundle(bitmap);

        assert!(is_position_bundle_occupied(&bundle, 2));
        assert!(is_position_bundle_occupied(&bundle, 15));
        assert!(!is_position_bundle_occupied(&bundle, 3));
        assert_eq!(get_first_unoccupied_position_in_bundle(&bundle), Some(3));
        assert_eq!(get_occupied_positions_in_bundle(&bundle), vec![0, 1, 2, 15]);
    }

    #[test]
    fn test_full_bundle() {
        let bundle = bundle([u8::MAX; 32]);
        assert!(is_position_bundle_full(&bundle));
        assert_eq!(get_first_unoccupied_position_in_bundle(&bundle), None);
        assert!(!is_position_bundle_occupied(&bundle, 256));
    }
}

use anyhow::{Result, anyhow};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, signer::Signer};
use whirlpool_tour_client::{
    accounts::Position,
    instructions::{
        InitializePositionBundle, OpenBundledPosition, OpenBundledPositionInstructionArgs,
    },
    pda::{get_bundled_position_address, get_position_bundle_address},
};

use super::{fetch_tick_range, initialize_missing_tick_arrays};
use crate::{
    ledger::{Ledger, fetch_position_bundle, fetch_whirlpool},
    quote::get_first_unoccupied_position_in_bundle,
    token::get_ata,
};

pub struct InitializePositionBundleInstructions {
    pub position_bundle_mint: Pubkey,
    pub position_bundle_address: Pubkey,
    pub position_bundle_token_account: Pubkey,
    pub instructions: Vec<Instruction>,
    pub additional_signers: Vec<Keypair>,
}

/// A new bundle owned by `owner`, its NFT minted to the owner's associated account.
pub fn initialize_position_bundle_instructions(owner: &Pubkey) -> InitializePositionBundleInstructions {
    let position_bundle_mint = Keypair::new();
    let position_bundle_address = get_position_bundle_address(&position_bundle_mint.pubkey()).0;
    let position_bundle_token_account = get_ata(owner, &position_bundle_mint.pubkey());

    let instruction = InitializePositionBundle {
        position_bundle: position_bundle_address,
        position_bundle_mint: position_bundle_mint.pubkey(),
        position_bundle_token_account,
        position_bundle_owner: *owner,
        funder: *owner,
    }
    .instruction();

    InitializePositionBundleInstructions {
        position_bundle_mint: position_bundle_mint.pubkey(),
        position_bundle_address,
        position_bundle_token_account,
        instructions: vec![instruction],
        additional_signers: vec![position_bundle_mint],
    }
}

#[derive(Debug)]
pub struct OpenBundledPositionInstructions {
    pub bundle_index: u16,
    pub bundled_position_address: Pubkey,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    /// Rent of the bundled position and of the tick arrays created for it.
    pub initialization_cost: u64,
    pub instructions: Vec<Instruction>,
}

/// Opens an empty position over `[lower_price, upper_price]` at the first free slot
/// of the bundle.
pub fn open_bundled_position_instructions<L: Ledger + ?Sized>(
    ledger: &L,
    position_bundle_address: &Pubkey,
    pool_address: &Pubkey,
    lower_price: f64,
    upper_price: f64,
    authority: &Pubkey,
) -> Result<OpenBundledPositionInstructions> {
    let bundle = fetch_position_bundle(ledger, position_bundle_address)?;
    let bundle_index = get_first_unoccupied_position_in_bundle(&bundle)
        .ok_or_else(|| anyhow!("position bundle {position_bundle_address} is full"))?;

    let whirlpool = fetch_whirlpool(ledger, pool_address)?;
    let (tick_lower_index, tick_upper_index) =
        fetch_tick_range(ledger, &whirlpool, lower_price, upper_price)?;

    let bundled_position_address =
        get_bundled_position_address(&bundle.position_bundle_mint, bundle_index).0;

    let (mut instructions, tick_arrays_cost) = initialize_missing_tick_arrays(
        ledger,
        pool_address,
        whirlpool.tick_spacing,
        &[tick_lower_index, tick_upper_index],
        authority,
    )?;
    instructions.push(
        OpenBundledPosition {
            bundled_position: bundled_position_address,
            position_bundle: *position_bundle_address,
            position_bundle_token_account: get_ata(authority, &bundle.position_bundle_mint),
            position_bundle_authority: *authority,
            whirlpool: *pool_address,
            funder: *authority,
        }
        .instruction(OpenBundledPositionInstructionArgs {
            bundle_index,
            tick_lower_index,
            tick_upper_index,
        })?,
    );

    let initialization_cost =
        tick_arrays_cost + ledger.minimum_balance_for_rent_exemption(Position::LEN)?;

    Ok(OpenBundledPositionInstructions {
        bundle_index,
        bundled_position_address,
        tick_lower_index,
        tick_upper_index,
        initialization_cost,
        instructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        constants::*,
        fixtures::{position_bundle, setup_pool, setup_tick_array, tick_array_with_liquidity, whirlpool_at_tick},
        svm_ledger::SvmLedger,
    };
    use whirlpool_tour_client::{
        WHIRLPOOL_ID,
        accounts::{PositionBundle, TickArray},
    };

    fn setup(occupied: &[u16]) -> (SvmLedger, Pubkey, Pubkey) {
        let ledger = SvmLedger::new(vec![ALICE]);
        setup_pool(&ledger, &whirlpool_at_tick(0, TICK_SPACING, 0, FEE_RATE), 9, 6);
        let bundle_mint = Pubkey::new_unique();
        let bundle_address = get_position_bundle_address(&bundle_mint).0;
        ledger.set_program_account(
            &bundle_address,
            &WHIRLPOOL_ID,
            &position_bundle(bundle_mint, occupied),
            PositionBundle::LEN,
        );
        (ledger, bundle_mint, bundle_address)
    }

    #[test]
    fn test_initialize_position_bundle() {
        let result = initialize_position_bundle_instructions(&ALICE);

        assert_eq!(
            result.position_bundle_address,
            get_position_bundle_address(&result.position_bundle_mint).0
        );
        assert_eq!(result.position_bundle_token_account, get_ata(&ALICE, &result.position_bundle_mint));
        assert_eq!(result.instructions.len(), 1);
        assert_eq!(result.additional_signers[0].pubkey(), result.position_bundle_mint);
        assert!(
            result.instructions[0]
                .accounts
                .iter()
                .any(|meta| meta.pubkey == result.position_bundle_mint && meta.is_signer)
        );
    }

    #[test]
    fn test_open_bundled_position_takes_first_free_slot() {
        let (ledger, bundle_mint, bundle_address) = setup(&[0, 1, 3]);
        setup_tick_array(&ledger, &tick_array_with_liquidity(-5_632, TICK_SPACING, 0));
        setup_tick_array(&ledger, &tick_array_with_liquidity(0, TICK_SPACING, 0));

        let result =
            open_bundled_position_instructions(&ledger, &bundle_address, &POOL, 990.0, 1_010.0, &ALICE)
                .unwrap();

        assert_eq!(result.bundle_index, 2);
        assert_eq!(result.bundled_position_address, get_bundled_position_address(&bundle_mint, 2).0);
        assert_eq!((result.tick_lower_index, result.tick_upper_index), (-128, 128));
        // tick arrays already exist
        assert_eq!(result.instructions.len(), 1);
        assert_eq!(result.initialization_cost, ledger.minimum_balance_for_rent_exemption(Position::LEN).unwrap());
        assert_eq!(&result.instructions[0].data[8..10], &2u16.to_le_bytes());
    }

    #[test]
    fn test_open_bundled_position_initializes_tick_arrays() {
        let (ledger, _, bundle_address) = setup(&[]);

        let result =
            open_bundled_position_instructions(&ledger, &bundle_address, &POOL, 990.0, 1_010.0, &ALICE)
                .unwrap();

        assert_eq!(result.bundle_index, 0);
        assert_eq!(result.instructions.len(), 3);
        let rent = |len| ledger.minimum_balance_for_rent_exemption(len).unwrap();
        assert_eq!(result.initialization_cost, 2 * rent(TickArray::LEN) + rent(Position::LEN));
    }

    #[test]
    fn test_open_bundled_position_in_full_bundle() {
        let occupied: Vec<u16> = (0..256).collect();
        let (ledger, _, bundle_address) = setup(&occupied);

        let err =
            open_bundled_position_instructions(&ledger, &bundle_address, &POOL, 990.0, 1_010.0, &ALICE)
                .unwrap_err();
        assert!(err.to_string().contains("is full"));
    }
}

mod bundle;
mod pool;
mod position;
mod swap;

pub use bundle::*;
pub use pool::*;
pub use position::*;
pub use swap::*;

use borsh::BorshSerialize;

/// Anchor instruction data: 8-byte discriminator followed by the Borsh encoded arguments.
fn instruction_data<T: BorshSerialize>(discriminator: [u8; 8], args: &T) -> borsh::io::Result<Vec<u8>> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)?;
    Ok(data)
}

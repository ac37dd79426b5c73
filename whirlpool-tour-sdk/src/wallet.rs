use std::path::Path;

use solana_sdk::signature::{Keypair, read_keypair_file};
use tracing::debug;

use crate::config::ConfigError;

/// Reads a key file holding the 64 secret key bytes as a JSON array.
pub fn load_wallet(path: &Path) -> Result<Keypair, ConfigError> {
    debug!(path = %path.display(), "loading wallet");

    read_keypair_file(path).map_err(|err| ConfigError::Wallet {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

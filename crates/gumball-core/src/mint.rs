//! Mint records — one row per minted token, written once at mint time.

use serde::{Deserialize, Serialize};

/// A minted token and the wallet that minted it.
///
/// Created once, never updated. Records backfilled from the chain scan have
/// an empty minter, because the creator-filtered account listing does not
/// reveal the minting wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRecord {
  /// Base58 mint account address; unique across the store.
  pub mint:   String,
  /// Base58 pubkey of the minting wallet, or empty if unknown.
  pub minter: String,
}

impl MintRecord {
  pub fn new(mint: impl Into<String>, minter: impl Into<String>) -> Self {
    Self {
      mint:   mint.into(),
      minter: minter.into(),
    }
  }
}

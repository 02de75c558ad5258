//! Local wallet signer.
//!
//! An ed25519 keypair file stands in for an injected browser wallet. The
//! capability is held explicitly by the chain gateway and passed down from
//! `main`, never read from ambient state.

use std::path::Path;

use solana_sdk::{
  hash::Hash,
  pubkey::Pubkey,
  signature::{Keypair, read_keypair_file},
  signer::Signer as _,
  transaction::Transaction,
};

use crate::{Error, Result};

/// Transaction-signing capability.
pub trait WalletSigner: Send + Sync {
  fn pubkey(&self) -> Pubkey;

  /// Add this wallet's signature for the given blockhash.
  fn sign(&self, tx: &mut Transaction, recent_blockhash: Hash) -> Result<()>;
}

/// A wallet backed by a keypair file on disk.
pub struct LocalWallet {
  keypair: Keypair,
}

impl LocalWallet {
  /// Load the keypair at `path`. A missing or unreadable file is a hard
  /// error; there is nothing useful to do without a wallet.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let keypair = read_keypair_file(path).map_err(|e| Error::WalletNotFound {
      path:    path.display().to_string(),
      message: e.to_string(),
    })?;
    Ok(Self { keypair })
  }

  pub fn from_keypair(keypair: Keypair) -> Self { Self { keypair } }
}

impl std::fmt::Debug for LocalWallet {
  /// Redacts the secret key; `Keypair` itself is intentionally not `Debug`.
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LocalWallet")
      .field("pubkey", &self.keypair.pubkey())
      .finish_non_exhaustive()
  }
}

impl WalletSigner for LocalWallet {
  fn pubkey(&self) -> Pubkey { self.keypair.pubkey() }

  fn sign(&self, tx: &mut Transaction, recent_blockhash: Hash) -> Result<()> {
    tx.try_partial_sign(&[&self.keypair], recent_blockhash)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_keypair_file_is_a_wallet_error() {
    let err = LocalWallet::load("/nonexistent/wallet.json").unwrap_err();
    assert!(matches!(err, Error::WalletNotFound { .. }));
  }

  #[test]
  fn wallet_reports_keypair_pubkey() {
    let keypair = Keypair::new();
    let expected = keypair.pubkey();
    assert_eq!(LocalWallet::from_keypair(keypair).pubkey(), expected);
  }
}

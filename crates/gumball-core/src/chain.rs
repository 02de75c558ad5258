//! The `ChainGateway` trait — the wallet + RPC capability handed to the
//! view layer.
//!
//! The wallet never lives in ambient state: implementations hold it
//! explicitly and the server receives the gateway as a constructor
//! argument. Test doubles implement this trait to exercise the server
//! without a validator.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::machine::MachineConfig;

/// A freshly minted token, as reported by the chain gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintedNft {
  pub mint:      String,
  pub minter:    String,
  pub signature: String,
}

pub trait ChainGateway: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Base58 pubkey of the wallet this gateway signs with.
  fn wallet_address(&self) -> String;

  /// Read and decode the candy-machine account into snapshot inputs.
  fn machine_config(
    &self,
  ) -> impl Future<Output = Result<MachineConfig, Self::Error>> + Send + '_;

  /// Assemble, sign, and submit one minting transaction. One-shot: no
  /// retry, no state beyond succeeded-or-failed.
  fn mint_one(
    &self,
  ) -> impl Future<Output = Result<MintedNft, Self::Error>> + Send + '_;

  /// Mint addresses of every token the machine has created, via the
  /// creator-filtered program-account scan.
  fn minted_addresses(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}

//! [`SolanaChain`] — the concrete [`ChainGateway`] over RPC and a local
//! wallet.

use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use gumball_core::{
  chain::{ChainGateway, MintedNft},
  machine::MachineConfig,
};

use crate::{
  Error, Result, machine, mint, scan,
  wallet::{LocalWallet, WalletSigner as _},
};

/// RPC endpoint, machine address, and wallet, bundled as the one chain
/// capability the server needs.
pub struct SolanaChain {
  client:     Arc<RpcClient>,
  wallet:     LocalWallet,
  machine_id: Pubkey,
}

impl SolanaChain {
  pub fn new(rpc_url: impl Into<String>, wallet: LocalWallet, machine_id: Pubkey) -> Self {
    let client = Arc::new(RpcClient::new_with_commitment(
      rpc_url.into(),
      CommitmentConfig::confirmed(),
    ));
    Self { client, wallet, machine_id }
  }
}

impl ChainGateway for SolanaChain {
  type Error = Error;

  fn wallet_address(&self) -> String { self.wallet.pubkey().to_string() }

  async fn machine_config(&self) -> Result<MachineConfig> {
    let account = machine::fetch_machine(&self.client, &self.machine_id).await?;
    Ok(account.config())
  }

  async fn mint_one(&self) -> Result<MintedNft> {
    let account = machine::fetch_machine(&self.client, &self.machine_id).await?;
    let outcome =
      mint::mint_one(&self.client, &self.wallet, &self.machine_id, &account).await?;
    Ok(MintedNft {
      mint:      outcome.mint.to_string(),
      minter:    self.wallet_address(),
      signature: outcome.signature.to_string(),
    })
  }

  async fn minted_addresses(&self) -> Result<Vec<String>> {
    scan::machine_mint_addresses(&self.client, &self.machine_id).await
  }
}

//! Creator-filtered scan for existing mints.
//!
//! Fallback discovery path: instead of trusting the cache alone, ask the
//! RPC node for every token-metadata account whose first creator is the
//! machine's creator PDA. The node filters server-side by the account's
//! fixed size and the creator-array offset, and returns only the 32-byte
//! mint slice of each account.

use solana_account_decoder::{UiAccountEncoding, UiDataSliceConfig};
use solana_client::{
  nonblocking::rpc_client::RpcClient,
  rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
  rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType},
};
use solana_sdk::pubkey::Pubkey;

use crate::{Result, pda};

/// Mint addresses of every token minted by `machine_id`, base58-encoded.
pub async fn machine_mint_addresses(
  client: &RpcClient,
  machine_id: &Pubkey,
) -> Result<Vec<String>> {
  let (creator, _bump) = pda::candy_machine_creator(machine_id);

  let config = RpcProgramAccountsConfig {
    filters:        Some(vec![
      RpcFilterType::DataSize(pda::MAX_METADATA_LEN as u64),
      RpcFilterType::Memcmp(Memcmp {
        offset:   pda::CREATOR_ARRAY_START,
        bytes:    MemcmpEncodedBytes::Base58(creator.to_string()),
        encoding: None,
      }),
    ]),
    account_config: RpcAccountInfoConfig {
      encoding:         Some(UiAccountEncoding::Base64),
      data_slice:       Some(UiDataSliceConfig {
        offset: pda::MINT_ADDRESS_OFFSET,
        length: pda::MINT_ADDRESS_LEN,
      }),
      commitment:       None,
      min_context_slot: None,
    },
    with_context:   None,
  };

  let accounts = client
    .get_program_accounts_with_config(&pda::TOKEN_METADATA_PROGRAM_ID, config)
    .await?;
  tracing::info!(count = accounts.len(), "scanned metadata accounts by creator");

  Ok(
    accounts
      .into_iter()
      .map(|(_, account)| bs58::encode(account.data).into_string())
      .collect(),
  )
}

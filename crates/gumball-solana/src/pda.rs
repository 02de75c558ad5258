//! Program addresses, the token-metadata byte layout, and PDA derivations.
//!
//! The layout constants pin the fixed size of a token-metadata account and
//! the offsets the creator-filtered scan reads from. They must match the
//! on-chain account format exactly; `MAX_METADATA_LEN` doubles as the
//! data-size filter and `CREATOR_ARRAY_START` as the memcmp offset.

use solana_sdk::pubkey::Pubkey;

// ─── Programs ────────────────────────────────────────────────────────────────

/// The candy-machine program that gates and tracks the fixed-supply drop.
pub const CANDY_MACHINE_PROGRAM_ID: Pubkey =
  solana_program::pubkey!("cndy3Z4yapm5BvBVwk9kuRMUxQSc4J6XZdbQUiyKvXt");

pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
  solana_program::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Civic gateway program, used when the machine carries a gatekeeper.
pub const CIVIC_GATEWAY_PROGRAM_ID: Pubkey =
  solana_program::pubkey!("gatem74V238djXdzWnJf94Wo1DcnuGkfijbf3AuBhfs");

// ─── Token-metadata account layout ───────────────────────────────────────────

pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;
pub const MAX_CREATOR_LEN: usize = 32 + 1 + 1;
pub const MAX_CREATOR_LIMIT: usize = 5;

const MAX_DATA_SIZE: usize = 4
  + MAX_NAME_LENGTH
  + 4
  + MAX_SYMBOL_LENGTH
  + 4
  + MAX_URI_LENGTH
  + 2
  + 1
  + 4
  + MAX_CREATOR_LIMIT * MAX_CREATOR_LEN;

/// Fixed size of a token-metadata account.
pub const MAX_METADATA_LEN: usize = 1 + 32 + 32 + MAX_DATA_SIZE + 1 + 1 + 9 + 172;

/// Offset of the first creator within the account's creator array.
pub const CREATOR_ARRAY_START: usize = 1
  + 32
  + 32
  + 4
  + MAX_NAME_LENGTH
  + 4
  + MAX_URI_LENGTH
  + 4
  + MAX_SYMBOL_LENGTH
  + 2
  + 1
  + 4;

/// The mint address sits after the key byte and the update authority.
pub const MINT_ADDRESS_OFFSET: usize = 1 + 32;
pub const MINT_ADDRESS_LEN: usize = 32;

// ─── PDAs ────────────────────────────────────────────────────────────────────

/// The machine's creator PDA — recorded as first creator on every token the
/// machine mints, which is what the scan filters on.
pub fn candy_machine_creator(machine: &Pubkey) -> (Pubkey, u8) {
  Pubkey::find_program_address(
    &[b"candy_machine", machine.as_ref()],
    &CANDY_MACHINE_PROGRAM_ID,
  )
}

/// Token-metadata PDA for a mint.
pub fn metadata_account(mint: &Pubkey) -> Pubkey {
  Pubkey::find_program_address(
    &[b"metadata", TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
    &TOKEN_METADATA_PROGRAM_ID,
  )
  .0
}

/// Master-edition PDA for a mint.
pub fn master_edition_account(mint: &Pubkey) -> Pubkey {
  Pubkey::find_program_address(
    &[
      b"metadata",
      TOKEN_METADATA_PROGRAM_ID.as_ref(),
      mint.as_ref(),
      b"edition",
    ],
    &TOKEN_METADATA_PROGRAM_ID,
  )
  .0
}

/// Civic gateway token for a wallet on a gatekeeper network.
pub fn network_token(wallet: &Pubkey, network: &Pubkey) -> (Pubkey, u8) {
  Pubkey::find_program_address(
    &[wallet.as_ref(), b"gateway", &[0u8; 8], network.as_ref()],
    &CIVIC_GATEWAY_PROGRAM_ID,
  )
}

/// Civic network-expire feature account.
pub fn network_expire(network: &Pubkey) -> (Pubkey, u8) {
  Pubkey::find_program_address(&[network.as_ref(), b"expire"], &CIVIC_GATEWAY_PROGRAM_ID)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn metadata_layout_constants() {
    assert_eq!(MAX_METADATA_LEN, 679);
    assert_eq!(CREATOR_ARRAY_START, 326);
    assert_eq!(MINT_ADDRESS_OFFSET, 33);
  }

  #[test]
  fn creator_pda_is_deterministic_per_machine() {
    let machine_a = Pubkey::new_unique();
    let machine_b = Pubkey::new_unique();
    assert_eq!(
      candy_machine_creator(&machine_a),
      candy_machine_creator(&machine_a)
    );
    assert_ne!(
      candy_machine_creator(&machine_a).0,
      candy_machine_creator(&machine_b).0
    );
  }

  #[test]
  fn metadata_and_edition_pdas_differ() {
    let mint = Pubkey::new_unique();
    assert_ne!(metadata_account(&mint), master_edition_account(&mint));
  }
}

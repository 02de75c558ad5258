//! Error types for `gumball-solana`.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("wallet keypair not found at {path}: {message}")]
  WalletNotFound { path: String, message: String },

  #[error("account not found: {0}")]
  AccountNotFound(Pubkey),

  #[error("candy machine account too short: {0} bytes")]
  AccountTooShort(usize),

  #[error("failed to decode candy machine account: {0}")]
  AccountDecode(#[from] std::io::Error),

  #[error(transparent)]
  SolanaClient(#[from] solana_client::client_error::ClientError),

  #[error(transparent)]
  SolanaProgram(#[from] solana_sdk::program_error::ProgramError),

  #[error(transparent)]
  Signer(#[from] solana_sdk::signer::SignerError),
}

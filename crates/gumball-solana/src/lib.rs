//! Solana chain gateway for the gumball mint gallery.
//!
//! Everything chain-shaped lives here: the candy-machine account reader,
//! the mint transaction assembly, the creator-filtered scan for existing
//! mints, and the local wallet signer. The rest of the workspace reaches
//! this crate only through [`gumball_core::chain::ChainGateway`], which
//! [`SolanaChain`] implements.

pub mod error;
pub mod gateway;
pub mod machine;
pub mod mint;
pub mod pda;
pub mod scan;
pub mod wallet;

pub use error::{Error, Result};
pub use gateway::SolanaChain;
pub use wallet::{LocalWallet, WalletSigner};

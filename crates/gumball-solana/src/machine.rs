//! Candy-machine account decoding.
//!
//! The account head is Borsh-decoded into [`CandyMachineAccount`]; the
//! config-line tail that follows it is deliberately never deserialized.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use gumball_core::machine::{EndCondition, MachineConfig};

use crate::{Error, Result};

/// Anchor-style account discriminator preceding the state.
const ACCOUNT_DISCRIMINATOR_LEN: usize = 8;

// ─── Account state ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct CandyMachineAccount {
  pub authority:      Pubkey,
  pub wallet:         Pubkey,
  pub token_mint:     Option<Pubkey>,
  pub items_redeemed: u64,
  pub data:           CandyMachineData,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct CandyMachineData {
  pub uuid:                    String,
  pub price:                   u64,
  pub symbol:                  String,
  pub seller_fee_basis_points: u16,
  pub max_supply:              u64,
  pub is_mutable:              bool,
  pub retain_authority:        bool,
  pub go_live_date:            Option<i64>,
  pub end_settings:            Option<EndSettings>,
  pub creators:                Vec<Creator>,
  pub hidden_settings:         Option<HiddenSettings>,
  pub whitelist_mint_settings: Option<WhitelistMintSettings>,
  pub items_available:         u64,
  pub gatekeeper:              Option<GatekeeperConfig>,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct EndSettings {
  pub end_setting_type: EndSettingType,
  pub number:           u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum EndSettingType {
  Date,
  Amount,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Creator {
  pub address:  Pubkey,
  pub verified: bool,
  /// In percentages, not basis points.
  pub share:    u8,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct HiddenSettings {
  pub name: String,
  pub uri:  String,
  pub hash: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct WhitelistMintSettings {
  pub mode:           WhitelistMintMode,
  pub mint:           Pubkey,
  pub presale:        bool,
  pub discount_price: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum WhitelistMintMode {
  BurnEveryTime,
  NeverBurn,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct GatekeeperConfig {
  pub gatekeeper_network: Pubkey,
  pub expire_on_use:      bool,
}

impl CandyMachineAccount {
  /// Decode the account head, skipping the discriminator. Trailing
  /// config-line bytes are left untouched.
  pub fn decode(data: &[u8]) -> Result<Self> {
    if data.len() <= ACCOUNT_DISCRIMINATOR_LEN {
      return Err(Error::AccountTooShort(data.len()));
    }
    let mut slice = &data[ACCOUNT_DISCRIMINATOR_LEN..];
    Ok(Self::deserialize(&mut slice)?)
  }

  /// Chain-agnostic snapshot inputs for the view layer.
  pub fn config(&self) -> MachineConfig {
    let end_condition = self.data.end_settings.as_ref().map(|e| {
      match e.end_setting_type {
        EndSettingType::Date => EndCondition::Date(e.number as i64),
        EndSettingType::Amount => EndCondition::Amount(e.number),
      }
    });
    let presale_enabled = self
      .data
      .whitelist_mint_settings
      .as_ref()
      .map(|w| w.presale)
      .unwrap_or(false);

    MachineConfig {
      items_available: self.data.items_available,
      items_redeemed:  self.items_redeemed,
      price_lamports:  self.data.price,
      go_live_date:    self.data.go_live_date,
      presale_enabled,
      end_condition,
    }
  }
}

// ─── Fetch ───────────────────────────────────────────────────────────────────

/// Fetch and decode the machine account at `machine_id`.
pub async fn fetch_machine(
  client: &RpcClient,
  machine_id: &Pubkey,
) -> Result<CandyMachineAccount> {
  let response = client
    .get_account_with_commitment(machine_id, CommitmentConfig::confirmed())
    .await?;
  let account = response.value.ok_or(Error::AccountNotFound(*machine_id))?;
  CandyMachineAccount::decode(&account.data)
}

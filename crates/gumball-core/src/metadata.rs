//! Cached off-chain metadata for minted tokens.
//!
//! Metadata rows are keyed by mint address and upserted, never appended:
//! a placeholder written at mint time is later rewritten in place once the
//! lookup API has indexed the token.

use serde::{Deserialize, Serialize};

// ─── Off-chain payload ───────────────────────────────────────────────────────

/// Descriptive attributes resolved from the external lookup API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffChainData {
  #[serde(default)]
  pub image:       String,
  #[serde(default)]
  pub name:        String,
  #[serde(default)]
  pub description: String,
}

// ─── Metadata row ────────────────────────────────────────────────────────────

/// One cached metadata row, keyed by mint address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMetadata {
  pub mint:           String,
  /// Set for rows written at mint time; `None` for rows resolved later,
  /// where the minter is already known from the mint record.
  pub minter:         Option<String>,
  #[serde(default)]
  pub off_chain_data: OffChainData,
  pub explorer_url:   Option<String>,
}

impl NftMetadata {
  /// Placeholder row written when the post-mint lookup deadline runs out.
  pub fn placeholder(mint: impl Into<String>, minter: impl Into<String>) -> Self {
    Self {
      mint:           mint.into(),
      minter:         Some(minter.into()),
      off_chain_data: OffChainData::default(),
      explorer_url:   None,
    }
  }

  /// A row is complete once it carries an image; placeholder and
  /// partially-indexed rows are not.
  pub fn is_complete(&self) -> bool { !self.off_chain_data.image.is_empty() }
}

// ─── Per-mint status ─────────────────────────────────────────────────────────

/// Cache status of one mint address; selects reconciliation work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataStatus {
  /// No metadata row exists yet.
  Missing,
  /// A row exists but has no image (placeholder or partial index).
  Incomplete,
  Complete,
}

impl MetadataStatus {
  pub fn of(row: Option<&NftMetadata>) -> Self {
    match row {
      None => Self::Missing,
      Some(m) if m.is_complete() => Self::Complete,
      Some(_) => Self::Incomplete,
    }
  }
}

//! Ownership and gallery computation — derived per request, never stored.

use serde::{Deserialize, Serialize};

use crate::{metadata::NftMetadata, mint::MintRecord};

/// Whether the connected wallet minted one of the items, and which.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
  pub is_owner: bool,
  pub owned:    Option<NftMetadata>,
}

/// Match the wallet against the mint records and select its metadata row.
///
/// Ownership requires both a mint record with a matching minter and a
/// cached metadata row for that mint. A matching record whose metadata is
/// still pending does not count as ownership yet; the next reconcile pass
/// heals it.
pub fn check_is_owner(
  wallet: &str,
  mints: &[MintRecord],
  metadata: &[NftMetadata],
) -> Ownership {
  let owned_record = mints
    .iter()
    .find(|m| !m.minter.is_empty() && m.minter == wallet);
  let Some(record) = owned_record else {
    return Ownership::default();
  };

  match metadata.iter().find(|m| m.mint == record.mint) {
    Some(row) => Ownership {
      is_owner: true,
      owned:    Some(row.clone()),
    },
    None => {
      tracing::warn!(mint = %record.mint, "owner's mint has no metadata row yet");
      Ownership::default()
    }
  }
}

/// The gallery list: every cached row except the owner's own item.
pub fn latest_mints(
  metadata: &[NftMetadata],
  ownership: &Ownership,
) -> Vec<NftMetadata> {
  let owned_mint = ownership.owned.as_ref().map(|m| m.mint.as_str());
  metadata
    .iter()
    .filter(|m| Some(m.mint.as_str()) != owned_mint)
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::metadata::OffChainData;

  fn mints() -> Vec<MintRecord> {
    vec![MintRecord::new("A", "U1"), MintRecord::new("B", "U2")]
  }

  fn metadata() -> Vec<NftMetadata> {
    ["A", "B"]
      .into_iter()
      .map(|mint| NftMetadata {
        mint:           mint.into(),
        minter:         None,
        off_chain_data: OffChainData {
          image:       format!("https://example.com/{mint}.png"),
          name:        format!("Item {mint}"),
          description: String::new(),
        },
        explorer_url:   None,
      })
      .collect()
  }

  #[test]
  fn minter_owns_their_item() {
    let ownership = check_is_owner("U1", &mints(), &metadata());
    assert!(ownership.is_owner);
    assert_eq!(ownership.owned.unwrap().mint, "A");
  }

  #[test]
  fn stranger_owns_nothing() {
    let ownership = check_is_owner("U3", &mints(), &metadata());
    assert!(!ownership.is_owner);
    assert!(ownership.owned.is_none());
  }

  #[test]
  fn pending_metadata_defers_ownership() {
    let rows = vec![metadata().remove(1)]; // only B is cached
    let ownership = check_is_owner("U1", &mints(), &rows);
    assert!(!ownership.is_owner);
  }

  #[test]
  fn empty_minter_never_matches() {
    let mints = vec![MintRecord::new("C", "")];
    let ownership = check_is_owner("", &mints, &metadata());
    assert!(!ownership.is_owner);
  }

  #[test]
  fn gallery_excludes_owned_item() {
    let ownership = check_is_owner("U1", &mints(), &metadata());
    let gallery = latest_mints(&metadata(), &ownership);
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].mint, "B");
  }

  #[test]
  fn gallery_shows_everything_to_non_owners() {
    let ownership = check_is_owner("U3", &mints(), &metadata());
    let gallery = latest_mints(&metadata(), &ownership);
    assert_eq!(gallery.len(), 2);
  }
}

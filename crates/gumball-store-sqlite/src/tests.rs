//! Integration tests for `SqliteStore` against an in-memory database.

use gumball_core::{
  metadata::{NftMetadata, OffChainData},
  mint::MintRecord,
  store::MintStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn complete_row(mint: &str) -> NftMetadata {
  NftMetadata {
    mint:           mint.into(),
    minter:         None,
    off_chain_data: OffChainData {
      image:       format!("https://example.com/{mint}.png"),
      name:        format!("Item {mint}"),
      description: "one of the collection".into(),
    },
    explorer_url:   Some(format!("https://explorer.example/{mint}")),
  }
}

// ─── Mints ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_list_mints_in_insertion_order() {
  let s = store().await;
  assert!(s.record_mint(&MintRecord::new("A", "U1")).await.unwrap());
  assert!(s.record_mint(&MintRecord::new("B", "U2")).await.unwrap());

  let mints = s.list_mints().await.unwrap();
  assert_eq!(
    mints,
    vec![MintRecord::new("A", "U1"), MintRecord::new("B", "U2")]
  );
}

#[tokio::test]
async fn replayed_mint_insert_is_a_noop() {
  let s = store().await;
  assert!(s.record_mint(&MintRecord::new("A", "U1")).await.unwrap());
  // Same address again, even with a different minter, changes nothing.
  assert!(!s.record_mint(&MintRecord::new("A", "U2")).await.unwrap());

  let mints = s.list_mints().await.unwrap();
  assert_eq!(mints.len(), 1);
  assert_eq!(mints[0].minter, "U1");
}

// ─── Metadata ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_metadata_missing_returns_none() {
  let s = store().await;
  assert!(s.get_metadata("A").await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_inserts_then_lists() {
  let s = store().await;
  s.upsert_metadata(&complete_row("A")).await.unwrap();
  s.upsert_metadata(&complete_row("B")).await.unwrap();

  let rows = s.list_metadata().await.unwrap();
  assert_eq!(rows.len(), 2);

  let a = s.get_metadata("A").await.unwrap().unwrap();
  assert_eq!(a, complete_row("A"));
}

#[tokio::test]
async fn upsert_heals_placeholder_in_place() {
  let s = store().await;
  s.upsert_metadata(&NftMetadata::placeholder("A", "U1"))
    .await
    .unwrap();

  let cached = s.get_metadata("A").await.unwrap().unwrap();
  assert!(!cached.is_complete());
  assert_eq!(cached.minter.as_deref(), Some("U1"));

  // A later reconcile pass rewrites the row; still exactly one row, and
  // the minter recorded at mint time survives the rewrite.
  s.upsert_metadata(&complete_row("A")).await.unwrap();
  let rows = s.list_metadata().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert!(rows[0].is_complete());
  assert_eq!(rows[0].minter.as_deref(), Some("U1"));
}

#[tokio::test]
async fn upsert_is_idempotent_by_key() {
  let s = store().await;
  s.upsert_metadata(&complete_row("A")).await.unwrap();
  s.upsert_metadata(&complete_row("A")).await.unwrap();
  assert_eq!(s.list_metadata().await.unwrap().len(), 1);
}

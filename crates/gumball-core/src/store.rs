//! The `MintStore` trait — the durable cache of mint records and metadata.
//!
//! The trait is implemented by storage backends (e.g.
//! `gumball-store-sqlite`). Higher layers (`gumball-server`, the
//! reconciler) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{metadata::NftMetadata, mint::MintRecord};

/// Abstraction over the durable mint/metadata cache.
///
/// Mint rows are written once and never updated; replaying an insert for a
/// known address must be a no-op, so concurrent writers converge instead of
/// duplicating rows. Metadata rows are upserted keyed by mint address, and
/// rewriting an incomplete row is the normal healing path.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MintStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All mint records, in insertion order. No pagination; the full set is
  /// assumed to fit in memory.
  fn list_mints(
    &self,
  ) -> impl Future<Output = Result<Vec<MintRecord>, Self::Error>> + Send + '_;

  /// Insert a mint record. Returns `false` when the address was already
  /// recorded and the insert was ignored.
  fn record_mint<'a>(
    &'a self,
    record: &'a MintRecord,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// All metadata rows.
  fn list_metadata(
    &self,
  ) -> impl Future<Output = Result<Vec<NftMetadata>, Self::Error>> + Send + '_;

  /// One metadata row by mint address. Returns `None` if not cached.
  fn get_metadata<'a>(
    &'a self,
    mint: &'a str,
  ) -> impl Future<Output = Result<Option<NftMetadata>, Self::Error>> + Send + 'a;

  /// Insert or replace the metadata row keyed by `row.mint`.
  fn upsert_metadata<'a>(
    &'a self,
    row: &'a NftMetadata,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

//! `GET /api/gallery` and `POST /api/sync`.
//!
//! The gallery runs a reconcile pass first and only then computes
//! ownership and the latest-mints list, so the response always reflects
//! the post-pass cache.

use axum::{Json, extract::State};
use serde::Serialize;

use gumball_core::{
  chain::ChainGateway, metadata::NftMetadata, ownership, source::MetadataSource,
  store::MintStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct GalleryView {
  pub wallet:   String,
  pub is_owner: bool,
  pub owned:    Option<NftMetadata>,
  /// Every cached item except the owner's own.
  pub items:    Vec<NftMetadata>,
  /// Addresses the pass could not resolve; a later request retries them.
  pub pending:  usize,
}

pub async fn gallery<S, C, M>(
  State(state): State<AppState<S, C, M>>,
) -> Result<Json<GalleryView>, ApiError>
where
  S: MintStore + 'static,
  C: ChainGateway + 'static,
  M: MetadataSource + 'static,
{
  let report = state.reconciler.run().await?;

  let mints = state
    .store
    .list_mints()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let metadata = state
    .store
    .list_metadata()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let wallet = state.chain.wallet_address();
  let ownership = ownership::check_is_owner(&wallet, &mints, &metadata);
  let items = ownership::latest_mints(&metadata, &ownership);

  Ok(Json(GalleryView {
    wallet,
    is_owner: ownership.is_owner,
    owned: ownership.owned,
    items,
    pending: report.unresolved.len(),
  }))
}

#[derive(Debug, Serialize)]
pub struct SyncSummary {
  pub discovered: usize,
  pub added:      usize,
}

/// Backfill the cache from the creator-filtered chain scan.
pub async fn sync<S, C, M>(
  State(state): State<AppState<S, C, M>>,
) -> Result<Json<SyncSummary>, ApiError>
where
  S: MintStore + 'static,
  C: ChainGateway + 'static,
  M: MetadataSource + 'static,
{
  let addresses = state
    .chain
    .minted_addresses()
    .await
    .map_err(|e| ApiError::Chain(Box::new(e)))?;
  let added = state.reconciler.import_chain_mints(&addresses).await;

  Ok(Json(SyncSummary {
    discovered: addresses.len(),
    added,
  }))
}

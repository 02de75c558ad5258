//! `POST /api/mint` — one minting transaction per request.

use std::sync::atomic::Ordering;

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use gumball_core::{
  chain::ChainGateway, reconcile::RecordOutcome, source::MetadataSource,
  store::MintStore,
};

use crate::{AppState, error::ApiError, now_ts};

#[derive(Debug, Serialize)]
pub struct MintReceipt {
  pub mint:      String,
  pub signature: String,
  /// `"complete"` when the metadata resolved before the follow-up
  /// deadline, `"pending"` when a placeholder was cached instead.
  pub metadata:  &'static str,
}

pub async fn mint<S, C, M>(
  State(state): State<AppState<S, C, M>>,
) -> Result<(StatusCode, Json<MintReceipt>), ApiError>
where
  S: MintStore + 'static,
  C: ChainGateway + 'static,
  M: MetadataSource + 'static,
{
  // Mirror of the disabled button: one mint at a time.
  if state.mint_in_progress.swap(true, Ordering::SeqCst) {
    return Err(ApiError::MintInProgress);
  }
  let result = try_mint(&state).await;
  state.mint_in_progress.store(false, Ordering::SeqCst);
  result
}

async fn try_mint<S, C, M>(
  state: &AppState<S, C, M>,
) -> Result<(StatusCode, Json<MintReceipt>), ApiError>
where
  S: MintStore + 'static,
  C: ChainGateway + 'static,
  M: MetadataSource + 'static,
{
  let config = state
    .chain
    .machine_config()
    .await
    .map_err(|e| ApiError::Chain(Box::new(e)))?;
  let snapshot = config.snapshot(now_ts());

  // Sell-out wins over everything, including an open sale window.
  if snapshot.is_sold_out {
    return Err(ApiError::MintUnavailable("nothing's left".into()));
  }
  if !snapshot.can_mint() {
    return Err(ApiError::MintUnavailable("the sale is not live".into()));
  }

  let minted = state.chain.mint_one().await.map_err(|e| {
    tracing::error!(error = %e, "mint transaction failed");
    ApiError::Mint(
      "seems like there was a problem minting! does the wallet hold enough SOL?".into(),
    )
  })?;

  let outcome = state
    .reconciler
    .record_new_mint(&minted.mint, &minted.minter)
    .await;
  let metadata = match outcome {
    RecordOutcome::Complete(_) => "complete",
    RecordOutcome::Placeholder(_) => "pending",
  };

  Ok((
    StatusCode::CREATED,
    Json(MintReceipt {
      mint: minted.mint,
      signature: minted.signature,
      metadata,
    }),
  ))
}

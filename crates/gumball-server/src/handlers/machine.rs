//! `GET /api/machine` — supply and sale-window snapshot.

use axum::{Json, extract::State};
use serde::Serialize;

use gumball_core::{
  chain::ChainGateway, machine::MachineSnapshot, source::MetadataSource,
  store::MintStore,
};

use crate::{AppState, error::ApiError, now_ts};

#[derive(Debug, Serialize)]
pub struct MachineView {
  /// The configured wallet — the "connected user" of this deployment.
  pub wallet:   String,
  pub snapshot: MachineSnapshot,
}

pub async fn snapshot<S, C, M>(
  State(state): State<AppState<S, C, M>>,
) -> Result<Json<MachineView>, ApiError>
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

  Ok(Json(MachineView {
    wallet:   state.chain.wallet_address(),
    snapshot: config.snapshot(now_ts()),
  }))
}

//! JSON API for the gumball mint gallery.
//!
//! Exposes an axum [`Router`] backed by any [`MintStore`] +
//! [`ChainGateway`] + [`MetadataSource`] triple. Every capability is passed
//! in explicitly through [`AppState`]; nothing is read from ambient state.

pub mod error;
pub mod handlers;
pub mod lookup;

use std::{
  path::PathBuf,
  sync::{Arc, atomic::AtomicBool},
};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use gumball_core::{
  chain::ChainGateway, reconcile::Reconciler, source::MetadataSource,
  store::MintStore,
};

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered
/// under `GUMBALL_`-prefixed environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  /// Chain RPC endpoint.
  pub rpc_url:           String,
  /// Network path segment for the lookup API, e.g. "devnet".
  pub network:           String,
  /// Base58 address of the candy-machine account.
  pub candy_machine_id:  String,
  pub keypair_path:      PathBuf,
  pub store_path:        PathBuf,
  pub lookup_base_url:   String,
  pub lookup_api_key:    String,
  pub lookup_api_secret: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C, M>
where
  S: MintStore,
  M: MetadataSource,
{
  pub store:            Arc<S>,
  pub chain:            Arc<C>,
  pub reconciler:       Arc<Reconciler<S, M>>,
  /// One mint at a time — the server-side rendition of disabling the mint
  /// button while a mint runs.
  pub mint_in_progress: Arc<AtomicBool>,
}

impl<S, C, M> Clone for AppState<S, C, M>
where
  S: MintStore,
  M: MetadataSource,
{
  fn clone(&self) -> Self {
    Self {
      store:            self.store.clone(),
      chain:            self.chain.clone(),
      reconciler:       self.reconciler.clone(),
      mint_in_progress: self.mint_in_progress.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for the given capabilities.
pub fn router<S, C, M>(state: AppState<S, C, M>) -> Router
where
  S: MintStore + 'static,
  C: ChainGateway + 'static,
  M: MetadataSource + 'static,
{
  Router::new()
    .route("/api/machine", get(handlers::machine::snapshot::<S, C, M>))
    .route("/api/gallery", get(handlers::gallery::gallery::<S, C, M>))
    .route("/api/sync",    post(handlers::gallery::sync::<S, C, M>))
    .route("/api/mint",    post(handlers::minting::mint::<S, C, M>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub(crate) fn now_ts() -> i64 { chrono::Utc::now().timestamp() }

// ─── Integration tests ───────────────────────────────────────────────────────

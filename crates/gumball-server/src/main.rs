//! gumball-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), layered under
//! `GUMBALL_`-prefixed environment variables, loads the wallet keypair,
//! opens the SQLite cache, and serves the JSON API.

use std::{
  path::PathBuf,
  str::FromStr as _,
  sync::{Arc, atomic::AtomicBool},
};

use anyhow::Context as _;
use clap::Parser;
use solana_sdk::pubkey::Pubkey;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use gumball_core::reconcile::{ReconcilePolicy, Reconciler};
use gumball_server::{
  AppState, ServerConfig,
  lookup::{HttpMetadataSource, LookupConfig},
};
use gumball_solana::{LocalWallet, SolanaChain};
use gumball_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Gumball mint gallery server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("GUMBALL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // The wallet gates everything; refuse to start without one.
  let wallet =
    LocalWallet::load(&server_cfg.keypair_path).context("no usable wallet keypair")?;

  let machine_id = Pubkey::from_str(&server_cfg.candy_machine_id)
    .context("candy_machine_id is not a valid pubkey")?;

  // Open the SQLite cache.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;
  let store = Arc::new(store);

  let source = HttpMetadataSource::new(LookupConfig {
    base_url:   server_cfg.lookup_base_url.clone(),
    network:    server_cfg.network.clone(),
    api_key:    server_cfg.lookup_api_key.clone(),
    api_secret: server_cfg.lookup_api_secret.clone(),
  })
  .context("failed to build lookup client")?;

  // Build application state.
  let state = AppState {
    store: store.clone(),
    chain: Arc::new(SolanaChain::new(
      server_cfg.rpc_url.clone(),
      wallet,
      machine_id,
    )),
    reconciler: Arc::new(Reconciler::new(store, source, ReconcilePolicy::default())),
    mint_in_progress: Arc::new(AtomicBool::new(false)),
  };

  let app = gumball_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

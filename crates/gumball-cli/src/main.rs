//! `gumball` — terminal client for the gumball mint gallery.
//!
//! # Usage
//!
//! ```
//! gumball machine
//! gumball mint
//! gumball gallery
//! gumball --url http://localhost:8353 sync
//! ```

mod client;

use anyhow::Result;
use chrono::DateTime;
use clap::{Parser, Subcommand};
use gumball_core::metadata::NftMetadata;

use client::{ApiClient, ApiConfig};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "gumball", about = "Terminal client for the gumball mint gallery")]
struct Args {
  /// Base URL of the gumball server.
  #[arg(long, env = "GUMBALL_URL", default_value = "http://localhost:8353")]
  url: String,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Show machine supply and sale-window state.
  Machine,
  /// Reconcile the cache and list the latest mints.
  Gallery,
  /// Mint one token.
  Mint,
  /// Backfill the cache from the chain scan.
  Sync,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let client = ApiClient::new(ApiConfig { base_url: args.url })?;

  match args.command {
    Command::Machine => machine(&client).await,
    Command::Gallery => gallery(&client).await,
    Command::Mint => mint(&client).await,
    Command::Sync => sync(&client).await,
  }
}

// ─── Subcommands ──────────────────────────────────────────────────────────────

async fn machine(client: &ApiClient) -> Result<()> {
  let view = client.machine().await?;
  let snap = &view.snapshot;

  println!("Wallet: {}", view.wallet);
  println!(
    "Minted {} of {} ({} remaining)",
    snap.items_redeemed, snap.items_available, snap.items_remaining
  );
  println!("Price: {} SOL", snap.price_lamports as f64 / 1_000_000_000.0);

  if snap.is_sold_out {
    println!("Too late, nothing's left!");
  } else if snap.is_presale {
    println!("Presale is live.");
  } else if snap.is_active {
    println!("Sale is live, mint away.");
  } else if let Some(date) = snap.go_live_date {
    println!("Drop date: {}", format_ts(date));
  } else {
    println!("The sale has not started.");
  }
  Ok(())
}

async fn gallery(client: &ApiClient) -> Result<()> {
  let view = client.gallery().await?;

  if let Some(owned) = &view.owned {
    println!("You minted:");
    print_item(owned);
    println!();
  }

  if view.items.is_empty() && !view.is_owner {
    println!("Nothing's been minted yet, be the first one!");
  } else if view.items.is_empty() {
    println!("No other mints yet.");
  } else {
    println!("Latest mints:");
    for item in &view.items {
      print_item(item);
    }
  }

  if view.pending > 0 {
    println!("({} item(s) still waiting for metadata)", view.pending);
  }
  Ok(())
}

async fn mint(client: &ApiClient) -> Result<()> {
  println!("Minting...");
  let receipt = client.mint().await?;
  println!("Finished minting! {}", receipt.mint);
  println!("  signature: {}", receipt.signature);
  if receipt.metadata == "pending" {
    println!("  metadata is still indexing and will appear in the gallery soon");
  }
  Ok(())
}

async fn sync(client: &ApiClient) -> Result<()> {
  let summary = client.sync().await?;
  println!(
    "Scanned {} minted token(s), {} new",
    summary.discovered, summary.added
  );
  Ok(())
}

// ─── Rendering helpers ────────────────────────────────────────────────────────

fn print_item(item: &NftMetadata) {
  let data = &item.off_chain_data;
  let name = if data.name.is_empty() {
    item.mint.as_str()
  } else {
    data.name.as_str()
  };
  println!("  {name}");
  if !data.description.is_empty() {
    println!("    {}", data.description);
  }
  if !data.image.is_empty() {
    println!("    image: {}", data.image);
  }
  if let Some(url) = &item.explorer_url {
    println!("    explorer: {url}");
  }
}

fn format_ts(unix_seconds: i64) -> String {
  DateTime::from_timestamp(unix_seconds, 0)
    .map(|dt| dt.to_rfc2822())
    .unwrap_or_else(|| unix_seconds.to_string())
}

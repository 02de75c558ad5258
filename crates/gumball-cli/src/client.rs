//! Async HTTP client wrapping the gumball JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use gumball_core::{machine::MachineSnapshot, metadata::NftMetadata};
use reqwest::Client;
use serde::Deserialize;

/// Connection settings for the gumball API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the gumball JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

// ─── Response shapes ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MachineView {
  pub wallet:   String,
  pub snapshot: MachineSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct GalleryView {
  pub is_owner: bool,
  pub owned:    Option<NftMetadata>,
  pub items:    Vec<NftMetadata>,
  pub pending:  usize,
}

#[derive(Debug, Deserialize)]
pub struct MintReceipt {
  pub mint:      String,
  pub signature: String,
  pub metadata:  String,
}

#[derive(Debug, Deserialize)]
pub struct SyncSummary {
  pub discovered: usize,
  pub added:      usize,
}

// ─── Client ───────────────────────────────────────────────────────────────────

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /api/machine`
  pub async fn machine(&self) -> Result<MachineView> {
    let resp = self
      .client
      .get(self.url("/machine"))
      .send()
      .await
      .context("GET /machine failed")?;
    if !resp.status().is_success() {
      return Err(anyhow!("GET /machine → {}", resp.status()));
    }
    resp.json().await.context("deserialising machine view")
  }

  /// `GET /api/gallery`
  pub async fn gallery(&self) -> Result<GalleryView> {
    let resp = self
      .client
      .get(self.url("/gallery"))
      .send()
      .await
      .context("GET /gallery failed")?;
    if !resp.status().is_success() {
      return Err(anyhow!("GET /gallery → {}", resp.status()));
    }
    resp.json().await.context("deserialising gallery view")
  }

  /// `POST /api/mint`
  pub async fn mint(&self) -> Result<MintReceipt> {
    let resp = self
      .client
      .post(self.url("/mint"))
      .send()
      .await
      .context("POST /mint failed")?;
    if !resp.status().is_success() {
      let status = resp.status();
      let body: serde_json::Value = resp.json().await.unwrap_or_default();
      let message = body["error"].as_str().unwrap_or("mint failed").to_string();
      return Err(anyhow!("POST /mint → {status}: {message}"));
    }
    resp.json().await.context("deserialising mint receipt")
  }

  /// `POST /api/sync`
  pub async fn sync(&self) -> Result<SyncSummary> {
    let resp = self
      .client
      .post(self.url("/sync"))
      .send()
      .await
      .context("POST /sync failed")?;
    if !resp.status().is_success() {
      return Err(anyhow!("POST /sync → {}", resp.status()));
    }
    resp.json().await.context("deserialising sync summary")
  }
}

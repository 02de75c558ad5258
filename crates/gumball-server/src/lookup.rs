//! HTTP client for the external metadata lookup API.
//!
//! `GET {base_url}/nft/{network}/{mint}` with header-based credentials.
//! The API signals "not yet indexed" through an `error_message` field in an
//! otherwise-OK JSON body rather than a status code.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use gumball_core::{
  metadata::{NftMetadata, OffChainData},
  source::{Lookup, MetadataSource},
};

/// Connection settings for the lookup API.
#[derive(Debug, Clone)]
pub struct LookupConfig {
  pub base_url:   String,
  /// Network path segment, e.g. "devnet" or "mainnet-beta".
  pub network:    String,
  pub api_key:    String,
  pub api_secret: String,
}

/// Async client for the lookup API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpMetadataSource {
  client: Client,
  config: LookupConfig,
}

/// Wire shape of one lookup reply.
#[derive(Debug, Deserialize)]
struct LookupReply {
  #[serde(default)]
  error_message:  Option<String>,
  #[serde(default)]
  off_chain_data: Option<OffChainData>,
  #[serde(default)]
  explorer_url:   Option<String>,
}

impl HttpMetadataSource {
  pub fn new(config: LookupConfig) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, mint: &str) -> String {
    format!(
      "{}/nft/{}/{}",
      self.config.base_url.trim_end_matches('/'),
      self.config.network,
      mint
    )
  }
}

impl MetadataSource for HttpMetadataSource {
  type Error = reqwest::Error;

  async fn resolve(&self, mint: &str) -> Result<Lookup, reqwest::Error> {
    let reply: LookupReply = self
      .client
      .get(self.url(mint))
      .header("APIKeyID", self.config.api_key.as_str())
      .header("APISecretKey", self.config.api_secret.as_str())
      .send()
      .await?
      .json()
      .await?;

    if let Some(message) = reply.error_message {
      tracing::debug!(mint, %message, "lookup API has not indexed the token");
      return Ok(Lookup::NotIndexed);
    }

    Ok(Lookup::Resolved(NftMetadata {
      mint:           mint.to_owned(),
      minter:         None,
      off_chain_data: reply.off_chain_data.unwrap_or_default(),
      explorer_url:   reply.explorer_url,
    }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_joins_without_double_slash() {
    let source = HttpMetadataSource::new(LookupConfig {
      base_url:   "https://api.example.com/v1/solana/".into(),
      network:    "devnet".into(),
      api_key:    "key".into(),
      api_secret: "secret".into(),
    })
    .unwrap();
    assert_eq!(
      source.url("MintA"),
      "https://api.example.com/v1/solana/nft/devnet/MintA"
    );
  }

  #[test]
  fn reply_with_error_message_parses() {
    let reply: LookupReply =
      serde_json::from_str(r#"{"error_message":"NFT not found"}"#).unwrap();
    assert!(reply.error_message.is_some());
    assert!(reply.off_chain_data.is_none());
  }

  #[test]
  fn reply_with_payload_parses() {
    let reply: LookupReply = serde_json::from_str(
      r#"{
        "explorer_url": "https://explorer.solana.com/address/MintA",
        "off_chain_data": {
          "image": "https://example.com/0.png",
          "name": "Item 0",
          "description": "first of the drop"
        }
      }"#,
    )
    .unwrap();
    assert!(reply.error_message.is_none());
    assert_eq!(reply.off_chain_data.unwrap().name, "Item 0");
  }
}

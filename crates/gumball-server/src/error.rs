//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The machine is sold out or its sale window is closed.
  #[error("minting is unavailable: {0}")]
  MintUnavailable(String),

  /// Another mint request is still running; mirrors the disabled button.
  #[error("a mint is already in progress")]
  MintInProgress,

  /// Transaction submission failed. The message is deliberately generic;
  /// the underlying error is logged, not returned.
  #[error("{0}")]
  Mint(String),

  #[error("chain error: {0}")]
  Chain(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("reconcile error: {0}")]
  Reconcile(#[from] gumball_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::MintUnavailable(_) | ApiError::MintInProgress => StatusCode::CONFLICT,
      ApiError::Mint(_) | ApiError::Chain(_) => StatusCode::BAD_GATEWAY,
      ApiError::Store(_) | ApiError::Reconcile(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

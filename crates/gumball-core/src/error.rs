//! Error types for `gumball-core`.

use thiserror::Error;

/// Boxed error from a storage backend.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Errors a reconciliation pass can propagate.
///
/// Only the list-reads that a pass cannot proceed without surface here;
/// per-address lookup and write failures are reported in the pass report
/// instead, never as errors.
#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] BoxedError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

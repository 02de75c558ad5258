//! The `MetadataSource` trait and the retry policy for lookups.

use std::{future::Future, time::Duration};

use crate::metadata::NftMetadata;

// ─── Lookup reply ────────────────────────────────────────────────────────────

/// One reply from the external lookup API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
  /// The token is indexed; payload attached.
  Resolved(NftMetadata),
  /// The API answered with its "not yet indexed" error body.
  NotIndexed,
}

/// Abstraction over the external metadata lookup API.
///
/// Transport failures surface as `Err`; a well-formed "not yet indexed"
/// reply is `Ok(Lookup::NotIndexed)`. Callers retry both the same way.
pub trait MetadataSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn resolve<'a>(
    &'a self,
    mint: &'a str,
  ) -> impl Future<Output = Result<Lookup, Self::Error>> + Send + 'a;
}

// ─── Retry policy ────────────────────────────────────────────────────────────

/// Bounded backoff for lookup retries.
///
/// The delay doubles from `base_delay` up to `max_delay` and the attempt
/// count is capped; exhaustion is surfaced to the caller as an explicit
/// unresolved outcome instead of waiting forever.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub base_delay:   Duration,
  pub max_delay:    Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 5,
      base_delay:   Duration::from_millis(500),
      max_delay:    Duration::from_secs(3),
    }
  }
}

impl RetryPolicy {
  /// Delay slept after the given failed attempt (1-based). No sleep follows
  /// the final attempt.
  pub fn delay_for(&self, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    self.base_delay.saturating_mul(1 << exp).min(self.max_delay)
  }

  /// Worst-case total sleep across a full retry cycle.
  pub fn total_backoff(&self) -> Duration {
    (1..self.max_attempts).map(|a| self.delay_for(a)).sum()
  }
}

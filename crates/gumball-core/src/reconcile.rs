//! The metadata reconciler.
//!
//! Keeps the durable cache of `(mint address → metadata)` consistent with
//! the recorded mint list, using the external lookup API as the source of
//! truth for off-chain attributes. A pass fetches whatever is missing or
//! incomplete and upserts results keyed by mint address, so every mint
//! record eventually carries exactly one complete metadata row.
//!
//! Lookups run on a bounded worker pool and the whole batch is joined
//! before a pass returns: callers computing ownership or gallery state
//! afterwards always observe the post-pass cache, never a snapshot that is
//! about to change underneath them.

use std::{collections::HashMap, sync::Arc, time::Duration};

use futures::{StreamExt as _, stream};

use crate::{
  Error, Result,
  metadata::{MetadataStatus, NftMetadata},
  mint::MintRecord,
  source::{Lookup, MetadataSource, RetryPolicy},
  store::MintStore,
};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Tuning for reconciliation passes and the post-mint follow-up.
#[derive(Debug, Clone)]
pub struct ReconcilePolicy {
  pub retry:   RetryPolicy,
  /// Concurrent lookups per pass.
  pub workers: usize,
  /// Ceiling on the post-mint metadata chase before the placeholder row is
  /// written. The default retry cycle's worst-case backoff fits under it.
  pub mint_followup_deadline: Duration,
}

impl Default for ReconcilePolicy {
  fn default() -> Self {
    Self {
      retry:                  RetryPolicy::default(),
      workers:                4,
      mint_followup_deadline: Duration::from_secs(10),
    }
  }
}

// ─── Pass outcomes ───────────────────────────────────────────────────────────

/// Why a mint address came out of a pass without a complete row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
  /// The retry budget ran out before the API produced a payload.
  LookupExhausted,
  /// The payload arrived but the cache write failed.
  StoreWrite,
}

/// One address left unresolved by a pass. Not a tombstone; the next pass
/// retries it.
#[derive(Debug, Clone)]
pub struct Unresolved {
  pub mint:     String,
  pub attempts: u32,
  pub reason:   UnresolvedReason,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
  /// Addresses fetched and written this pass.
  pub completed:        Vec<String>,
  pub unresolved:       Vec<Unresolved>,
  /// Addresses that already had complete rows and were skipped.
  pub already_complete: usize,
}

impl ReconcileReport {
  pub fn is_settled(&self) -> bool { self.unresolved.is_empty() }
}

/// How the post-mint follow-up ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
  /// Metadata resolved within the deadline; the complete row is cached.
  Complete(NftMetadata),
  /// The deadline or attempt budget ran out; a placeholder row was cached
  /// for a later pass to heal.
  Placeholder(NftMetadata),
}

impl RecordOutcome {
  pub fn metadata(&self) -> &NftMetadata {
    match self {
      Self::Complete(m) | Self::Placeholder(m) => m,
    }
  }
}

/// Result of one bounded fetch cycle.
enum Fetched {
  Resolved { row: NftMetadata, attempts: u32 },
  Exhausted { attempts: u32 },
}

// ─── Reconciler ──────────────────────────────────────────────────────────────

pub struct Reconciler<St, Src> {
  store:  Arc<St>,
  source: Src,
  policy: ReconcilePolicy,
}

impl<St, Src> Reconciler<St, Src>
where
  St: MintStore,
  Src: MetadataSource,
{
  pub fn new(store: Arc<St>, source: Src, policy: ReconcilePolicy) -> Self {
    Self { store, source, policy }
  }

  /// One full pass over the cache. Every lookup is joined before this
  /// returns; addresses that stay unresolved are reported, not retried
  /// forever.
  ///
  /// List-reads failing fail the pass. Per-address failures never do: a
  /// write failure is logged and leaves the row pending for the next pass.
  pub async fn run(&self) -> Result<ReconcileReport> {
    let mints = self.store.list_mints().await.map_err(box_store)?;
    let metadata = self.store.list_metadata().await.map_err(box_store)?;
    let by_mint: HashMap<&str, &NftMetadata> =
      metadata.iter().map(|m| (m.mint.as_str(), m)).collect();

    let mut report = ReconcileReport::default();
    let mut work: Vec<String> = Vec::new();
    for record in &mints {
      match MetadataStatus::of(by_mint.get(record.mint.as_str()).copied()) {
        MetadataStatus::Complete => report.already_complete += 1,
        MetadataStatus::Missing | MetadataStatus::Incomplete => work.push(record.mint.clone()),
      }
    }

    if work.is_empty() {
      return Ok(report);
    }
    tracing::info!(pending = work.len(), "reconciling metadata cache");

    let results: Vec<(String, Fetched)> = stream::iter(work)
      .map(|mint| async move {
        let fetched = self.fetch_with_retry(&mint).await;
        (mint, fetched)
      })
      .buffer_unordered(self.policy.workers.max(1))
      .collect()
      .await;

    for (mint, fetched) in results {
      match fetched {
        Fetched::Resolved { row, attempts } => {
          match self.store.upsert_metadata(&row).await {
            Ok(()) => report.completed.push(mint.clone()),
            Err(e) => {
              tracing::error!(mint = %mint, error = %e, "metadata cache write failed");
              report.unresolved.push(Unresolved {
                mint: mint.clone(),
                attempts,
                reason: UnresolvedReason::StoreWrite,
              });
            }
          }
        }
        Fetched::Exhausted { attempts } => {
          tracing::warn!(mint = %mint, attempts, "metadata lookup exhausted");
          report.unresolved.push(Unresolved {
            mint: mint.clone(),
            attempts,
            reason: UnresolvedReason::LookupExhausted,
          });
        }
      }
    }

    Ok(report)
  }

  /// Record a fresh mint and chase its metadata under the follow-up
  /// deadline. The mint row is written first; if the lookup does not
  /// produce a payload in time, a placeholder metadata row is written
  /// instead and [`run`](Self::run) heals it later.
  ///
  /// Store failures on this path are logged and swallowed; nothing here
  /// propagates to the caller that just minted.
  pub async fn record_new_mint(&self, mint: &str, minter: &str) -> RecordOutcome {
    let record = MintRecord::new(mint, minter);
    if let Err(e) = self.store.record_mint(&record).await {
      tracing::error!(mint, error = %e, "failed to record mint");
    }

    let fetched = tokio::time::timeout(
      self.policy.mint_followup_deadline,
      self.fetch_with_retry(mint),
    )
    .await;

    let row = match fetched {
      Ok(Fetched::Resolved { mut row, .. }) => {
        row.minter = Some(minter.to_owned());
        row
      }
      Ok(Fetched::Exhausted { .. }) | Err(_) => {
        tracing::warn!(mint, "metadata not indexed in time, writing placeholder");
        NftMetadata::placeholder(mint, minter)
      }
    };

    if let Err(e) = self.store.upsert_metadata(&row).await {
      tracing::error!(mint, error = %e, "metadata cache write failed");
    }

    if row.is_complete() {
      RecordOutcome::Complete(row)
    } else {
      RecordOutcome::Placeholder(row)
    }
  }

  /// Backfill mint records discovered by the chain scan. The minting
  /// wallet is unknown on this path and left empty. Returns the
  /// newly-added count; known addresses are no-ops.
  pub async fn import_chain_mints(&self, addresses: &[String]) -> usize {
    let mut added = 0;
    for address in addresses {
      let record = MintRecord::new(address.clone(), "");
      match self.store.record_mint(&record).await {
        Ok(true) => added += 1,
        Ok(false) => {}
        Err(e) => {
          tracing::error!(mint = %address, error = %e, "failed to record scanned mint");
        }
      }
    }
    added
  }

  /// Bounded lookup cycle: capped exponential backoff between attempts.
  /// "Not yet indexed" replies and transport errors are retried alike.
  async fn fetch_with_retry(&self, mint: &str) -> Fetched {
    let retry = &self.policy.retry;
    for attempt in 1..=retry.max_attempts {
      match self.source.resolve(mint).await {
        Ok(Lookup::Resolved(row)) => return Fetched::Resolved { row, attempts: attempt },
        Ok(Lookup::NotIndexed) => {
          tracing::debug!(mint, attempt, "token not indexed yet");
        }
        Err(e) => {
          tracing::warn!(mint, attempt, error = %e, "metadata lookup failed");
        }
      }
      if attempt < retry.max_attempts {
        tokio::time::sleep(retry.delay_for(attempt)).await;
      }
    }
    Fetched::Exhausted { attempts: retry.max_attempts }
  }
}

fn box_store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    sync::{
      Mutex,
      atomic::{AtomicBool, AtomicU32, Ordering},
    },
    time::Instant,
  };

  use super::*;
  use crate::metadata::OffChainData;

  // ── Stub store ──────────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("stub store write failure")]
  struct StubStoreError;

  #[derive(Default)]
  struct MemStore {
    mints:       Mutex<Vec<MintRecord>>,
    metadata:    Mutex<Vec<NftMetadata>>,
    fail_writes: AtomicBool,
  }

  impl MintStore for MemStore {
    type Error = StubStoreError;

    async fn list_mints(&self) -> Result<Vec<MintRecord>, StubStoreError> {
      Ok(self.mints.lock().unwrap().clone())
    }

    async fn record_mint(&self, record: &MintRecord) -> Result<bool, StubStoreError> {
      let mut mints = self.mints.lock().unwrap();
      if mints.iter().any(|m| m.mint == record.mint) {
        return Ok(false);
      }
      mints.push(record.clone());
      Ok(true)
    }

    async fn list_metadata(&self) -> Result<Vec<NftMetadata>, StubStoreError> {
      Ok(self.metadata.lock().unwrap().clone())
    }

    async fn get_metadata(&self, mint: &str) -> Result<Option<NftMetadata>, StubStoreError> {
      Ok(
        self
          .metadata
          .lock()
          .unwrap()
          .iter()
          .find(|m| m.mint == mint)
          .cloned(),
      )
    }

    async fn upsert_metadata(&self, row: &NftMetadata) -> Result<(), StubStoreError> {
      if self.fail_writes.load(Ordering::SeqCst) {
        return Err(StubStoreError);
      }
      let mut rows = self.metadata.lock().unwrap();
      match rows.iter_mut().find(|m| m.mint == row.mint) {
        Some(existing) => *existing = row.clone(),
        None => rows.push(row.clone()),
      }
      Ok(())
    }
  }

  // ── Stub source ─────────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("stub transport failure")]
  struct StubSourceError;

  /// Counts calls; resolves after `succeed_after` calls per address, or
  /// never when `succeed_after` is `u32::MAX`.
  struct StubSource {
    calls:         AtomicU32,
    succeed_after: u32,
  }

  impl StubSource {
    fn always() -> Self {
      Self { calls: AtomicU32::new(0), succeed_after: 0 }
    }

    fn never() -> Self {
      Self { calls: AtomicU32::new(0), succeed_after: u32::MAX }
    }

    fn calls(&self) -> u32 { self.calls.load(Ordering::SeqCst) }
  }

  impl MetadataSource for &StubSource {
    type Error = StubSourceError;

    async fn resolve(&self, mint: &str) -> Result<Lookup, StubSourceError> {
      let seen = self.calls.fetch_add(1, Ordering::SeqCst);
      if self.succeed_after == u32::MAX || seen < self.succeed_after {
        return Ok(Lookup::NotIndexed);
      }
      Ok(Lookup::Resolved(NftMetadata {
        mint:           mint.to_owned(),
        minter:         None,
        off_chain_data: OffChainData {
          image:       format!("https://example.com/{mint}.png"),
          name:        format!("Item {mint}"),
          description: "stub".into(),
        },
        explorer_url:   Some(format!("https://explorer.example/{mint}")),
      }))
    }
  }

  fn fast_policy() -> ReconcilePolicy {
    ReconcilePolicy {
      retry: RetryPolicy {
        max_attempts: 3,
        base_delay:   Duration::from_millis(5),
        max_delay:    Duration::from_millis(20),
      },
      workers: 4,
      mint_followup_deadline: Duration::from_millis(200),
    }
  }

  fn reconciler<'a>(
    store: Arc<MemStore>,
    source: &'a StubSource,
  ) -> Reconciler<MemStore, &'a StubSource> {
    Reconciler::new(store, source, fast_policy())
  }

  async fn seed_mints(store: &MemStore, mints: &[(&str, &str)]) {
    for (mint, minter) in mints {
      store.record_mint(&MintRecord::new(*mint, *minter)).await.unwrap();
    }
  }

  // ── Reconcile pass ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn pass_completes_every_missing_row() {
    let store = Arc::new(MemStore::default());
    seed_mints(&store, &[("A", "U1"), ("B", "U2"), ("C", "U3")]).await;
    let source = StubSource::always();

    let report = reconciler(store.clone(), &source).run().await.unwrap();
    assert_eq!(report.completed.len(), 3);
    assert!(report.is_settled());

    let rows = store.list_metadata().await.unwrap();
    assert_eq!(rows.len(), 3);
    for mint in ["A", "B", "C"] {
      let matching: Vec<_> = rows.iter().filter(|m| m.mint == mint).collect();
      assert_eq!(matching.len(), 1, "exactly one row for {mint}");
      assert!(matching[0].is_complete());
    }
  }

  #[tokio::test]
  async fn pass_heals_incomplete_rows() {
    let store = Arc::new(MemStore::default());
    seed_mints(&store, &[("A", "U1")]).await;
    store
      .upsert_metadata(&NftMetadata::placeholder("A", "U1"))
      .await
      .unwrap();
    let source = StubSource::always();

    let report = reconciler(store.clone(), &source).run().await.unwrap();
    assert_eq!(report.completed, vec!["A".to_string()]);

    let row = store.get_metadata("A").await.unwrap().unwrap();
    assert!(row.is_complete());
  }

  #[tokio::test]
  async fn settled_cache_issues_no_lookups() {
    let store = Arc::new(MemStore::default());
    seed_mints(&store, &[("A", "U1"), ("B", "U2")]).await;
    let source = StubSource::always();

    let rec = reconciler(store.clone(), &source);
    rec.run().await.unwrap();
    let calls_after_first = source.calls();
    assert!(calls_after_first >= 2);

    let report = rec.run().await.unwrap();
    assert_eq!(report.already_complete, 2);
    assert!(report.completed.is_empty());
    assert_eq!(source.calls(), calls_after_first, "no further lookups");
  }

  #[tokio::test]
  async fn exhausted_lookup_is_surfaced_not_looped() {
    let store = Arc::new(MemStore::default());
    seed_mints(&store, &[("A", "U1")]).await;
    let source = StubSource::never();

    let report = reconciler(store.clone(), &source).run().await.unwrap();
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].mint, "A");
    assert_eq!(report.unresolved[0].attempts, 3);
    assert_eq!(report.unresolved[0].reason, UnresolvedReason::LookupExhausted);
    assert_eq!(source.calls(), 3, "attempt budget respected");
  }

  #[tokio::test]
  async fn write_failure_is_reported_not_propagated() {
    let store = Arc::new(MemStore::default());
    seed_mints(&store, &[("A", "U1")]).await;
    store.fail_writes.store(true, Ordering::SeqCst);
    let source = StubSource::always();

    let report = reconciler(store.clone(), &source).run().await.unwrap();
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].reason, UnresolvedReason::StoreWrite);
  }

  // ── Post-mint follow-up ─────────────────────────────────────────────────

  #[tokio::test]
  async fn record_new_mint_resolves_when_indexed() {
    let store = Arc::new(MemStore::default());
    let source = StubSource::always();

    let outcome = reconciler(store.clone(), &source)
      .record_new_mint("A", "U1")
      .await;
    let RecordOutcome::Complete(row) = outcome else {
      panic!("expected complete metadata");
    };
    assert_eq!(row.minter.as_deref(), Some("U1"));

    let mints = store.list_mints().await.unwrap();
    assert_eq!(mints, vec![MintRecord::new("A", "U1")]);
    assert!(store.get_metadata("A").await.unwrap().unwrap().is_complete());
  }

  #[tokio::test]
  async fn record_new_mint_falls_back_to_placeholder_within_ceiling() {
    let store = Arc::new(MemStore::default());
    let source = StubSource::never();
    let rec = reconciler(store.clone(), &source);

    let started = Instant::now();
    let outcome = rec.record_new_mint("A", "U1").await;
    let elapsed = started.elapsed();

    let RecordOutcome::Placeholder(row) = outcome else {
      panic!("expected placeholder");
    };
    assert_eq!(row.mint, "A");
    assert_eq!(row.minter.as_deref(), Some("U1"));
    assert!(row.off_chain_data.image.is_empty());
    assert!(
      elapsed <= rec.policy.mint_followup_deadline + Duration::from_millis(500),
      "placeholder written within the ceiling, took {elapsed:?}"
    );

    // The placeholder is durable and visible as incomplete.
    let cached = store.get_metadata("A").await.unwrap().unwrap();
    assert!(!cached.is_complete());
  }

  #[test]
  fn default_backoff_fits_under_followup_deadline() {
    let policy = ReconcilePolicy::default();
    assert!(policy.retry.total_backoff() <= policy.mint_followup_deadline);
  }

  // ── Chain import ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn import_skips_known_addresses() {
    let store = Arc::new(MemStore::default());
    seed_mints(&store, &[("A", "U1")]).await;
    let source = StubSource::always();
    let rec = reconciler(store.clone(), &source);

    let added = rec
      .import_chain_mints(&["A".into(), "B".into(), "C".into()])
      .await;
    assert_eq!(added, 2);

    // Importing again is a no-op.
    let added = rec.import_chain_mints(&["B".into(), "C".into()]).await;
    assert_eq!(added, 0);
    assert_eq!(store.list_mints().await.unwrap().len(), 3);
  }
}

//! Candy-machine supply and sale-window state.
//!
//! [`MachineConfig`] holds the chain-agnostic inputs decoded from the
//! on-chain account; [`MachineSnapshot`] is the derived view rendered to
//! users. Snapshots are re-derived against the current clock on every
//! request and never persisted.

use serde::{Deserialize, Serialize};

// ─── Config ──────────────────────────────────────────────────────────────────

/// How a sale ends, when the machine carries end settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EndCondition {
  /// Sale closes at a unix timestamp.
  Date(i64),
  /// Sale closes after this many items have been redeemed.
  Amount(u64),
}

/// Snapshot inputs read from the candy-machine account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
  pub items_available: u64,
  pub items_redeemed:  u64,
  pub price_lamports:  u64,
  /// Unix seconds; `None` means no public go-live is set.
  pub go_live_date:    Option<i64>,
  /// True when whitelist settings enable a presale.
  pub presale_enabled: bool,
  pub end_condition:   Option<EndCondition>,
}

impl MachineConfig {
  /// Derive the renderable snapshot as of `now` (unix seconds).
  pub fn snapshot(&self, now: i64) -> MachineSnapshot {
    let items_remaining = self.items_available.saturating_sub(self.items_redeemed);
    let is_sold_out = self.items_redeemed >= self.items_available;

    // A presale stays live until the public go-live passes.
    let is_presale =
      self.presale_enabled && self.go_live_date.map(|d| d > now).unwrap_or(true);

    let window_open =
      is_presale || self.go_live_date.map(|d| d <= now).unwrap_or(false);

    let not_ended = match self.end_condition {
      Some(EndCondition::Date(end)) => end > now,
      Some(EndCondition::Amount(n)) => self.items_redeemed < n,
      None => true,
    };

    MachineSnapshot {
      items_available: self.items_available,
      items_redeemed:  self.items_redeemed,
      items_remaining,
      price_lamports:  self.price_lamports,
      go_live_date:    self.go_live_date,
      is_presale,
      is_active:       window_open && not_ended,
      is_sold_out,
    }
  }
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Read-only supply/sale state, re-derived on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
  pub items_available: u64,
  pub items_redeemed:  u64,
  pub items_remaining: u64,
  pub price_lamports:  u64,
  pub go_live_date:    Option<i64>,
  pub is_presale:      bool,
  pub is_active:       bool,
  pub is_sold_out:     bool,
}

impl MachineSnapshot {
  /// Sell-out always suppresses minting, even while the sale window is open.
  pub fn can_mint(&self) -> bool { self.is_active && !self.is_sold_out }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config() -> MachineConfig {
    MachineConfig {
      items_available: 353,
      items_redeemed:  10,
      price_lamports:  500_000_000,
      go_live_date:    Some(1_000),
      presale_enabled: false,
      end_condition:   None,
    }
  }

  #[test]
  fn live_machine_can_mint() {
    let snap = config().snapshot(2_000);
    assert!(snap.is_active);
    assert!(!snap.is_sold_out);
    assert!(snap.can_mint());
    assert_eq!(snap.items_remaining, 343);
  }

  #[test]
  fn before_go_live_is_inactive() {
    let snap = config().snapshot(500);
    assert!(!snap.is_active);
    assert!(!snap.can_mint());
  }

  #[test]
  fn missing_go_live_stays_inactive_without_presale() {
    let mut cfg = config();
    cfg.go_live_date = None;
    assert!(!cfg.snapshot(2_000).is_active);
  }

  #[test]
  fn presale_opens_window_before_go_live() {
    let mut cfg = config();
    cfg.presale_enabled = true;
    let snap = cfg.snapshot(500);
    assert!(snap.is_presale);
    assert!(snap.is_active);

    // Once the go-live passes, it is a public sale, not a presale.
    let snap = cfg.snapshot(2_000);
    assert!(!snap.is_presale);
    assert!(snap.is_active);
  }

  #[test]
  fn sold_out_boundary_suppresses_minting() {
    let mut cfg = config();
    cfg.items_redeemed = cfg.items_available;
    let snap = cfg.snapshot(2_000);
    assert!(snap.is_sold_out);
    assert_eq!(snap.items_remaining, 0);
    // The window is still open, but sell-out wins.
    assert!(snap.is_active);
    assert!(!snap.can_mint());
  }

  #[test]
  fn end_by_date_closes_sale() {
    let mut cfg = config();
    cfg.end_condition = Some(EndCondition::Date(1_500));
    assert!(cfg.snapshot(1_200).is_active);
    assert!(!cfg.snapshot(1_600).is_active);
  }

  #[test]
  fn end_by_amount_closes_sale() {
    let mut cfg = config();
    cfg.end_condition = Some(EndCondition::Amount(10));
    // items_redeemed == 10 reaches the cap.
    assert!(!cfg.snapshot(2_000).is_active);
    cfg.items_redeemed = 9;
    assert!(cfg.snapshot(2_000).is_active);
  }
}

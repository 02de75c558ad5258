//! [`SqliteStore`] — the SQLite implementation of [`MintStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use gumball_core::{
  metadata::{NftMetadata, OffChainData},
  mint::MintRecord,
  store::MintStore,
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The durable mint/metadata cache, backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Metadata row as stored; decoded off the connection thread.
struct RawMetadata {
  mint:           String,
  minter:         Option<String>,
  off_chain_json: String,
  explorer_url:   Option<String>,
}

impl RawMetadata {
  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      mint:           row.get(0)?,
      minter:         row.get(1)?,
      off_chain_json: row.get(2)?,
      explorer_url:   row.get(3)?,
    })
  }

  fn into_metadata(self) -> Result<NftMetadata> {
    let off_chain_data: OffChainData = serde_json::from_str(&self.off_chain_json)?;
    Ok(NftMetadata {
      mint: self.mint,
      minter: self.minter,
      off_chain_data,
      explorer_url: self.explorer_url,
    })
  }
}

const METADATA_COLUMNS: &str = "mint, minter, off_chain_json, explorer_url";

// ─── Trait impl ──────────────────────────────────────────────────────────────

impl MintStore for SqliteStore {
  type Error = Error;

  async fn list_mints(&self) -> Result<Vec<MintRecord>> {
    let rows: Vec<MintRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT mint, minter FROM mints ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(MintRecord {
              mint:   row.get(0)?,
              minter: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn record_mint(&self, record: &MintRecord) -> Result<bool> {
    let mint        = record.mint.clone();
    let minter      = record.minter.clone();
    let recorded_at = Utc::now().to_rfc3339();

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO mints (mint, minter, recorded_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(mint) DO NOTHING",
          rusqlite::params![mint, minter, recorded_at],
        )?;
        Ok(changed > 0)
      })
      .await?;
    Ok(inserted)
  }

  async fn list_metadata(&self) -> Result<Vec<NftMetadata>> {
    let raws: Vec<RawMetadata> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {METADATA_COLUMNS} FROM metadatas"))?;
        let rows = stmt
          .query_map([], RawMetadata::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawMetadata::into_metadata).collect()
  }

  async fn get_metadata(&self, mint: &str) -> Result<Option<NftMetadata>> {
    let mint = mint.to_owned();
    let raw: Option<RawMetadata> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {METADATA_COLUMNS} FROM metadatas WHERE mint = ?1"),
              rusqlite::params![mint],
              RawMetadata::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawMetadata::into_metadata).transpose()
  }

  async fn upsert_metadata(&self, row: &NftMetadata) -> Result<()> {
    let mint           = row.mint.clone();
    let minter         = row.minter.clone();
    let off_chain_json = serde_json::to_string(&row.off_chain_data)?;
    let explorer_url   = row.explorer_url.clone();
    let updated_at     = Utc::now().to_rfc3339();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO metadatas (mint, minter, off_chain_json, explorer_url, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(mint) DO UPDATE SET
             minter         = COALESCE(excluded.minter, minter),
             off_chain_json = excluded.off_chain_json,
             explorer_url   = excluded.explorer_url,
             updated_at     = excluded.updated_at",
          rusqlite::params![mint, minter, off_chain_json, explorer_url, updated_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

//! SQL schema for the gumball SQLite cache.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Mint records are written once and never updated. The UNIQUE mint column
-- turns replayed inserts into no-ops.
CREATE TABLE IF NOT EXISTS mints (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    mint        TEXT NOT NULL UNIQUE,
    minter      TEXT NOT NULL DEFAULT '',
    recorded_at TEXT NOT NULL    -- ISO 8601 UTC; store-assigned
);

-- Metadata rows are keyed by mint address and rewritten in place while
-- incomplete (placeholder healing).
CREATE TABLE IF NOT EXISTS metadatas (
    mint           TEXT PRIMARY KEY,
    minter         TEXT,
    off_chain_json TEXT NOT NULL,   -- JSON payload: image, name, description
    explorer_url   TEXT,
    updated_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS mints_minter_idx ON mints(minter);

PRAGMA user_version = 1;
";

//! SQL schema for the phone book SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS contacts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name      TEXT NOT NULL,   -- max 100 chars, checked by the domain
    last_name       TEXT NOT NULL,   -- max 100 chars
    phone_number    TEXT NOT NULL,   -- max 20 chars; external business key
    address         TEXT,            -- max 200 chars
    created_at_utc  TEXT NOT NULL,   -- RFC 3339 UTC; set once on insert
    updated_at_utc  TEXT NOT NULL,   -- RFC 3339 UTC; refreshed on update
    UNIQUE (phone_number)
);

CREATE INDEX IF NOT EXISTS contacts_first_name_idx ON contacts(first_name);

PRAGMA user_version = 1;
";

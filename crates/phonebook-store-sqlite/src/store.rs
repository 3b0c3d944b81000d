//! [`SqliteRepository`] — the SQLite implementation of [`ContactRepository`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{error, warn};

use phonebook_core::{
  contact::{Contact, ContactPatch, StoredContact, merge},
  store::{ContactRepository, Page},
};

use crate::{
  Error, Result,
  encode::{CONTACT_COLUMNS, RawContact, contact_from_row, encode_dt},
  schema::SCHEMA,
};

// ─── Write outcomes ──────────────────────────────────────────────────────────

/// What an update closure observed inside its transaction.
enum Outcome<T> {
  Done(T),
  Missing,
  Duplicate,
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

/// Run a write statement. Returns `false` if the `UNIQUE (phone_number)`
/// constraint rejected it.
fn try_write(
  tx: &rusqlite::Transaction<'_>,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<bool> {
  match tx.execute(sql, params) {
    Ok(_) => Ok(true),
    Err(e) if is_unique_violation(&e) => Ok(false),
    Err(e) => Err(e),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact repository backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Each
/// operation is one closure on the connection thread; writes run inside a
/// transaction that rolls back on drop unless committed.
#[derive(Clone)]
pub struct SqliteRepository {
  conn: tokio_rusqlite::Connection,
}

impl SqliteRepository {
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

  /// The full persisted row for `phone_number`, including the surrogate id
  /// and server-assigned timestamps.
  pub async fn record(&self, phone_number: &str) -> Result<Option<StoredContact>> {
    let phone = phone_number.to_owned();

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{} WHERE phone_number = ?1", RawContact::SELECT),
              rusqlite::params![phone],
              RawContact::from_row,
            )
            .optional()?,
        )
      })
      .await
      .inspect_err(|e| error!(error = %e, phone_number, "record failed"))?;

    raw.map(RawContact::into_stored).transpose()
  }

  /// Number of stored contacts.
  pub async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }
}

// ─── ContactRepository impl ──────────────────────────────────────────────────

impl ContactRepository for SqliteRepository {
  type Error = Error;

  async fn list_contacts(&self, page: Page) -> Result<Vec<Contact>> {
    let limit = i64::from(page.page_size());
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONTACT_COLUMNS} FROM contacts
           ORDER BY first_name ASC, id ASC
           LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], |row| {
            contact_from_row(row, 0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from)
      .inspect_err(|e| {
        error!(
          error = %e,
          page = page.page(),
          page_size = page.page_size(),
          "list_contacts failed"
        )
      })
  }

  async fn search_by_phone_number<'a>(
    &'a self,
    phone_number: &'a str,
  ) -> Result<Option<Contact>> {
    let phone = phone_number.to_owned();

    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts
                 WHERE phone_number = ?1
                 ORDER BY id ASC LIMIT 1"
              ),
              rusqlite::params![phone],
              |row| contact_from_row(row, 0),
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::from)
      .inspect_err(|e| {
        error!(error = %e, phone_number, "search_by_phone_number failed")
      })?;

    if found.is_none() {
      warn!(phone_number, "search_by_phone_number found no contact");
    }
    Ok(found)
  }

  async fn create(&self, contact: Contact) -> Result<()> {
    let now = encode_dt(Utc::now());
    let phone = contact.phone_number.clone();
    let summary = contact.to_string();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let written = try_write(
          &tx,
          "INSERT INTO contacts (
             first_name, last_name, phone_number, address,
             created_at_utc, updated_at_utc
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![
            contact.first_name,
            contact.last_name,
            contact.phone_number,
            contact.address,
            now,
          ],
        )?;
        if written {
          tx.commit()?;
        }
        Ok(written)
      })
      .await
      .map_err(Error::from)
      .inspect_err(|e| error!(error = %e, contact = %summary, "create failed"))?;

    if !written {
      warn!(phone_number = %phone, "create rejected duplicate phone number");
      return Err(Error::DuplicatePhoneNumber(phone));
    }
    Ok(())
  }

  async fn update<'a>(
    &'a self,
    phone_number: &'a str,
    patch: ContactPatch,
  ) -> Result<Contact> {
    let now = encode_dt(Utc::now());
    let phone = phone_number.to_owned();
    let summary = format!("{patch:?}");

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current = tx
          .query_row(
            &format!(
              "SELECT id, {CONTACT_COLUMNS}, updated_at_utc FROM contacts
               WHERE phone_number = ?1"
            ),
            rusqlite::params![phone],
            |row| {
              Ok((
                row.get::<_, i64>(0)?,
                contact_from_row(row, 1)?,
                row.get::<_, String>(5)?,
              ))
            },
          )
          .optional()?;

        let Some((id, current, previous)) = current else {
          return Ok(Outcome::Missing);
        };

        let merged = merge(&current, &patch);
        // Fixed-width encoding: string max is chronological max.
        let stamped = std::cmp::max(now, previous);

        let written = try_write(
          &tx,
          "UPDATE contacts
           SET first_name = ?1, last_name = ?2, phone_number = ?3,
               address = ?4, updated_at_utc = ?5
           WHERE id = ?6",
          rusqlite::params![
            merged.first_name,
            merged.last_name,
            merged.phone_number,
            merged.address,
            stamped,
            id,
          ],
        )?;
        if !written {
          return Ok(Outcome::Duplicate);
        }
        tx.commit()?;
        Ok(Outcome::Done(merged))
      })
      .await
      .map_err(Error::from)
      .inspect_err(|e| {
        error!(error = %e, phone_number, patch = %summary, "update failed")
      })?;

    match outcome {
      Outcome::Done(contact) => Ok(contact),
      Outcome::Missing => {
        warn!(phone_number, "update found no contact");
        Err(Error::NotFound(phone_number.to_owned()))
      }
      Outcome::Duplicate => {
        warn!(phone_number, "update would duplicate an existing phone number");
        Err(Error::DuplicatePhoneNumber(phone_number.to_owned()))
      }
    }
  }

  async fn delete<'a>(&'a self, phone_number: &'a str) -> Result<()> {
    let phone = phone_number.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute(
          "DELETE FROM contacts WHERE phone_number = ?1",
          rusqlite::params![phone],
        )?;
        tx.commit()?;
        Ok(removed)
      })
      .await
      .map_err(Error::from)
      .inspect_err(|e| error!(error = %e, phone_number, "delete failed"))?;

    if removed == 0 {
      warn!(phone_number, "delete found no contact");
      return Err(Error::NotFound(phone_number.to_owned()));
    }
    Ok(())
  }

  async fn save(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("PRAGMA wal_checkpoint(PASSIVE)", [], |_| Ok(()))?;
        Ok(())
      })
      .await
      .map_err(Error::from)
      .inspect_err(|e| error!(error = %e, "save failed"))
  }
}

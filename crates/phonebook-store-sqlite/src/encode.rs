//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that string order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use phonebook_core::contact::{Contact, StoredContact};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// Column list matching [`contact_from_row`].
pub const CONTACT_COLUMNS: &str = "first_name, last_name, phone_number, address";

/// Read the four [`CONTACT_COLUMNS`] starting at column `offset`.
pub fn contact_from_row(
  row: &rusqlite::Row<'_>,
  offset: usize,
) -> rusqlite::Result<Contact> {
  Ok(Contact {
    first_name:   row.get(offset)?,
    last_name:    row.get(offset + 1)?,
    phone_number: row.get(offset + 2)?,
    address:      row.get(offset + 3)?,
  })
}

/// A full `contacts` row with timestamps still in their text encoding.
pub struct RawContact {
  pub id:             i64,
  pub contact:        Contact,
  pub created_at_utc: String,
  pub updated_at_utc: String,
}

impl RawContact {
  pub const SELECT: &'static str = "SELECT id, first_name, last_name, phone_number, address, \
                                    created_at_utc, updated_at_utc FROM contacts";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      contact:        contact_from_row(row, 1)?,
      created_at_utc: row.get(5)?,
      updated_at_utc: row.get(6)?,
    })
  }

  pub fn into_stored(self) -> Result<StoredContact> {
    Ok(StoredContact {
      id:             self.id,
      contact:        self.contact,
      created_at_utc: decode_dt(&self.created_at_utc)?,
      updated_at_utc: decode_dt(&self.updated_at_utc)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let early = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let late = early + chrono::Duration::milliseconds(1500);
    assert!(encode_dt(early) < encode_dt(late));
    assert_eq!(encode_dt(early).len(), encode_dt(late).len());
  }

  #[test]
  fn timestamp_decodes_back() {
    let dt = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap();
    assert_eq!(decode_dt(&encode_dt(dt)).unwrap(), dt);
  }

  #[test]
  fn garbage_timestamp_is_date_parse_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}

//! Error type for `phonebook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("contact not found: {0}")]
  NotFound(String),

  /// The `UNIQUE (phone_number)` constraint rejected a write.
  #[error("phone number already exists: {0}")]
  DuplicatePhoneNumber(String),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl From<Error> for phonebook_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::NotFound(p) => Self::NotFound(p),
      Error::DuplicatePhoneNumber(p) => Self::DuplicatePhoneNumber(p),
      other => Self::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error types for `phonebook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Client input that breaks a field or paging rule.
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("contact not found: {0}")]
  NotFound(String),

  #[error("phone number already exists: {0}")]
  DuplicatePhoneNumber(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// `true` for failures caused by the environment rather than by the caller.
  pub fn is_infrastructure(&self) -> bool { matches!(self, Self::Store(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

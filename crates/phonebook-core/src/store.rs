//! The `ContactRepository` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `phonebook-store-sqlite`). The service and API layers depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Error, Result,
  contact::{Contact, ContactPatch},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// A one-based page window over contacts ordered by first name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  page:      u32,
  page_size: u32,
}

impl Page {
  /// Both `page` and `page_size` must be at least 1.
  pub fn new(page: u32, page_size: u32) -> Result<Self> {
    if page < 1 || page_size < 1 {
      return Err(Error::Validation(format!(
        "page must be >= 1 and pageSize >= 1 (got page={page}, pageSize={page_size})"
      )));
    }
    Ok(Self { page, page_size })
  }

  pub fn page(&self) -> u32 { self.page }

  pub fn page_size(&self) -> u32 { self.page_size }

  /// Rows skipped before this window.
  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.page_size)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a contact store backend.
///
/// Every call runs in its own store session, released on every exit path.
/// Sessions are never shared between calls.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<Error>;

  /// Contacts ordered by first name, windowed by `page`. A short or empty
  /// result is the only end-of-data signal.
  fn list_contacts(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// First exact match on phone number. Returns `None` if absent.
  fn search_by_phone_number<'a>(
    &'a self,
    phone_number: &'a str,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + 'a;

  /// Persist a new row, stamping both timestamps. Fails with a duplicate
  /// error if the phone number is already taken.
  fn create(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Merge `patch` over the row for `phone_number` and refresh its update
  /// timestamp. Fails with a not-found error if no such row exists.
  fn update<'a>(
    &'a self,
    phone_number: &'a str,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + 'a;

  /// Hard-delete the row for `phone_number`. Fails with a not-found error if
  /// no such row exists.
  fn delete<'a>(
    &'a self,
    phone_number: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Flush pending changes to durable storage.
  fn save(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn page_rejects_zero() {
    assert!(Page::new(0, 10).is_err());
    assert!(Page::new(1, 0).is_err());
  }

  #[test]
  fn page_offset() {
    assert_eq!(Page::new(1, 10).unwrap().offset(), 0);
    assert_eq!(Page::new(2, 1).unwrap().offset(), 1);
    assert_eq!(Page::new(3, 10).unwrap().offset(), 20);
  }
}

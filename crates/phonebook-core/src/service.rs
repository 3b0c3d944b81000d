//! [`ContactService`] — business rules between the API and the repository.
//!
//! The service decides whether a phone number is valid and whether it is
//! already taken. Every repository failure is logged with the operation name
//! and its parameters, then returned unchanged.

use tracing::{error, warn};

use crate::{
  Error, Result,
  contact::{Contact, ContactPatch},
  phone::PhoneValidator,
  store::{ContactRepository, Page},
};

/// Stateless apart from its collaborators; safe to share across requests.
pub struct ContactService<R> {
  repository: R,
  validator:  Box<dyn PhoneValidator>,
}

impl<R: ContactRepository> ContactService<R> {
  pub fn new(repository: R, validator: impl PhoneValidator + 'static) -> Self {
    Self { repository, validator: Box::new(validator) }
  }

  pub fn repository(&self) -> &R { &self.repository }

  pub async fn list_contacts(&self, page: Page) -> Result<Vec<Contact>> {
    self
      .repository
      .list_contacts(page)
      .await
      .map_err(Into::into)
      .inspect_err(|e| {
        log_failure(
          e,
          &format!(
            "listing contacts for page {} with pageSize {}",
            page.page(),
            page.page_size()
          ),
        )
      })
  }

  pub async fn find_by_phone_number(
    &self,
    phone_number: &str,
  ) -> Result<Option<Contact>> {
    self
      .repository
      .search_by_phone_number(phone_number)
      .await
      .map_err(Into::into)
      .inspect_err(|e| {
        log_failure(e, &format!("searching contact by phone number {phone_number}"))
      })
  }

  /// Best-effort: another request may create or delete the same number
  /// between this check and a following write.
  pub async fn exists(&self, phone_number: &str) -> Result<bool> {
    Ok(self.find_by_phone_number(phone_number).await?.is_some())
  }

  pub async fn create(&self, contact: Contact) -> Result<()> {
    let summary = contact.to_string();
    self
      .repository
      .create(contact)
      .await
      .map_err(Into::into)
      .inspect_err(|e| log_failure(e, &format!("creating contact: {summary}")))
  }

  pub async fn update(
    &self,
    phone_number: &str,
    patch: ContactPatch,
  ) -> Result<Contact> {
    let summary = format!("{patch:?}");
    self
      .repository
      .update(phone_number, patch)
      .await
      .map_err(Into::into)
      .inspect_err(|e| {
        log_failure(e, &format!("updating contact {phone_number} with {summary}"))
      })
  }

  pub async fn delete(&self, phone_number: &str) -> Result<()> {
    self
      .repository
      .delete(phone_number)
      .await
      .map_err(Into::into)
      .inspect_err(|e| {
        log_failure(e, &format!("deleting contact with phone number {phone_number}"))
      })
  }

  /// Parse failures count as invalid; they never surface as errors.
  pub fn is_valid_phone_number(&self, phone_number: &str) -> bool {
    self.validator.validate(phone_number)
  }
}

fn log_failure(e: &Error, operation: &str) {
  if e.is_infrastructure() {
    error!(error = %e, "error {operation}");
  } else {
    warn!(error = %e, "rejected {operation}");
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
  };

  use super::*;
  use crate::contact::merge;

  // ─── Fake repository ───────────────────────────────────────────────────────

  #[derive(Default)]
  struct MemoryRepository {
    rows:    Mutex<Vec<Contact>>,
    failing: AtomicBool,
  }

  #[derive(Debug, thiserror::Error)]
  #[error("store unreachable")]
  struct Unreachable;

  impl MemoryRepository {
    fn check(&self) -> Result<()> {
      if self.failing.load(Ordering::SeqCst) {
        return Err(Error::Store(Box::new(Unreachable)));
      }
      Ok(())
    }
  }

  impl ContactRepository for MemoryRepository {
    type Error = Error;

    async fn list_contacts(&self, page: Page) -> Result<Vec<Contact>> {
      self.check()?;
      let mut rows = self.rows.lock().unwrap().clone();
      rows.sort_by(|a, b| a.first_name.cmp(&b.first_name));
      Ok(
        rows
          .into_iter()
          .skip(page.offset() as usize)
          .take(page.page_size() as usize)
          .collect(),
      )
    }

    async fn search_by_phone_number<'a>(
      &'a self,
      phone_number: &'a str,
    ) -> Result<Option<Contact>> {
      self.check()?;
      let rows = self.rows.lock().unwrap();
      Ok(rows.iter().find(|c| c.phone_number == phone_number).cloned())
    }

    async fn create(&self, contact: Contact) -> Result<()> {
      self.check()?;
      self.rows.lock().unwrap().push(contact);
      Ok(())
    }

    async fn update<'a>(
      &'a self,
      phone_number: &'a str,
      patch: ContactPatch,
    ) -> Result<Contact> {
      self.check()?;
      let mut rows = self.rows.lock().unwrap();
      let row = rows
        .iter_mut()
        .find(|c| c.phone_number == phone_number)
        .ok_or_else(|| Error::NotFound(phone_number.to_owned()))?;
      *row = merge(row, &patch);
      Ok(row.clone())
    }

    async fn delete<'a>(&'a self, phone_number: &'a str) -> Result<()> {
      self.check()?;
      let mut rows = self.rows.lock().unwrap();
      let before = rows.len();
      rows.retain(|c| c.phone_number != phone_number);
      if rows.len() == before {
        return Err(Error::NotFound(phone_number.to_owned()));
      }
      Ok(())
    }

    async fn save(&self) -> Result<()> { self.check() }
  }

  struct PlusPrefixValidator;

  impl PhoneValidator for PlusPrefixValidator {
    fn validate(&self, phone_number: &str) -> bool {
      phone_number.starts_with('+') && phone_number.len() > 4
    }
  }

  fn service() -> ContactService<MemoryRepository> {
    ContactService::new(MemoryRepository::default(), PlusPrefixValidator)
  }

  fn contact(first: &str, phone: &str) -> Contact {
    Contact {
      first_name:   first.into(),
      last_name:    "Doe".into(),
      phone_number: phone.into(),
      address:      None,
    }
  }

  // ─── Reads ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_contacts_delegates_paging() {
    let s = service();
    s.create(contact("Charlie", "+3")).await.unwrap();
    s.create(contact("Alice", "+1")).await.unwrap();
    s.create(contact("Bob", "+2")).await.unwrap();

    let page = s.list_contacts(Page::new(2, 1).unwrap()).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].first_name, "Bob");
  }

  #[tokio::test]
  async fn find_missing_returns_none() {
    let s = service();
    assert!(s.find_by_phone_number("+999").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn exists_reflects_store() {
    let s = service();
    s.create(contact("John", "123456789")).await.unwrap();
    assert!(s.exists("123456789").await.unwrap());
    assert!(!s.exists("987654321").await.unwrap());
  }

  // ─── Failures ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn infrastructure_failures_propagate() {
    let s = service();
    s.repository().failing.store(true, Ordering::SeqCst);

    let page = Page::new(1, 10).unwrap();
    assert!(matches!(s.list_contacts(page).await, Err(Error::Store(_))));
    assert!(matches!(s.find_by_phone_number("+1").await, Err(Error::Store(_))));
    assert!(matches!(s.exists("+1").await, Err(Error::Store(_))));
    assert!(matches!(s.create(contact("A", "+1")).await, Err(Error::Store(_))));
    assert!(matches!(
      s.update("+1", ContactPatch::default()).await,
      Err(Error::Store(_))
    ));
    assert!(matches!(s.delete("+1").await, Err(Error::Store(_))));
  }

  #[tokio::test]
  async fn update_missing_is_not_found() {
    let s = service();
    let result = s.update("+404", ContactPatch::default()).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert!(s.list_contacts(Page::new(1, 10).unwrap()).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn delete_missing_is_not_found() {
    let s = service();
    s.create(contact("John", "+1")).await.unwrap();
    assert!(matches!(s.delete("+404").await, Err(Error::NotFound(_))));
    assert!(s.exists("+1").await.unwrap());
  }

  // ─── Validation ────────────────────────────────────────────────────────────

  #[test]
  fn phone_validation_uses_injected_capability() {
    let s = service();
    assert!(s.is_valid_phone_number("+12345"));
    assert!(!s.is_valid_phone_number("12345"));
    assert!(!s.is_valid_phone_number(""));
  }
}

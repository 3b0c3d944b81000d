//! Contact records, the persisted row shape, and the update merge.
//!
//! A [`Contact`] is identified externally by its phone number. The store adds
//! a surrogate id and two timestamps, carried alongside in [`StoredContact`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Error, Result};

// ─── Field rules ─────────────────────────────────────────────────────────────

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_ADDRESS_LEN: usize = 200;

// ─── Contact ─────────────────────────────────────────────────────────────────

/// The domain record: name, phone number (business key), optional address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub first_name:   String,
  pub last_name:    String,
  pub phone_number: String,
  pub address:      Option<String>,
}

impl Contact {
  /// Check required fields and column maxima.
  pub fn validate(&self) -> Result<()> {
    require("firstName", &self.first_name, MAX_NAME_LEN)?;
    require("lastName", &self.last_name, MAX_NAME_LEN)?;
    require("phoneNumber", &self.phone_number, MAX_PHONE_LEN)?;
    if let Some(address) = &self.address {
      check_len("address", address, MAX_ADDRESS_LEN)?;
    }
    Ok(())
  }
}

impl fmt::Display for Contact {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Name: {} {}, Phone: {}, Address: {}",
      self.first_name,
      self.last_name,
      self.phone_number,
      self.address.as_deref().unwrap_or("N/A"),
    )
  }
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// Incoming values for an update. `None` and blank strings mean "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub phone_number: Option<String>,
  pub address:      Option<String>,
}

impl ContactPatch {
  /// Check column maxima for every field that will actually be applied.
  pub fn validate(&self) -> Result<()> {
    if let Some(v) = present(&self.first_name) {
      check_len("firstName", v, MAX_NAME_LEN)?;
    }
    if let Some(v) = present(&self.last_name) {
      check_len("lastName", v, MAX_NAME_LEN)?;
    }
    if let Some(v) = present(&self.phone_number) {
      check_len("phoneNumber", v, MAX_PHONE_LEN)?;
    }
    if let Some(v) = present(&self.address) {
      check_len("address", v, MAX_ADDRESS_LEN)?;
    }
    Ok(())
  }

  /// The replacement phone number, if this patch moves the contact off
  /// `current`.
  pub fn new_phone_number(&self, current: &str) -> Option<&str> {
    present(&self.phone_number).filter(|p| *p != current)
  }
}

/// Apply `patch` over `current` field by field, keeping every value the patch
/// leaves absent or blank.
pub fn merge(current: &Contact, patch: &ContactPatch) -> Contact {
  let pick = |incoming: &Option<String>, existing: &str| {
    present(incoming).unwrap_or(existing).to_owned()
  };

  Contact {
    first_name:   pick(&patch.first_name, &current.first_name),
    last_name:    pick(&patch.last_name, &current.last_name),
    phone_number: pick(&patch.phone_number, &current.phone_number),
    address:      present(&patch.address)
      .map(str::to_owned)
      .or_else(|| current.address.clone()),
  }
}

// ─── Persisted row ───────────────────────────────────────────────────────────

/// A contact as the store holds it. Timestamps are server-assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContact {
  pub id:             i64,
  pub contact:        Contact,
  pub created_at_utc: DateTime<Utc>,
  pub updated_at_utc: DateTime<Utc>,
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn present(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|s| !s.trim().is_empty())
}

fn require(field: &str, value: &str, max: usize) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation(format!("{field} is required")));
  }
  check_len(field, value, max)
}

fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
  if value.chars().count() > max {
    return Err(Error::Validation(format!(
      "{field} must be at most {max} characters"
    )));
  }
  Ok(())
}

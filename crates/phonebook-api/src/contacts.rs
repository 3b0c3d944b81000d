//! Handlers for `/api/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/contacts` | `?page` (default 1), `?pageSize` (1–10, default 10) |
//! | `GET`    | `/api/contacts/search` | `?phoneNumber` required; 404 if absent |
//! | `POST`   | `/api/contacts` | Body: [`ContactBody`]; 201 + created contact |
//! | `PUT`    | `/api/contacts/{phone_number}` | Partial [`ContactBody`]; 202, empty |
//! | `DELETE` | `/api/contacts/{phone_number}` | 202, empty |
//!
//! Existence checks here are separate round trips from the writes that
//! follow them. The store's unique constraint settles any race, surfacing as
//! 409 (or 404 when the row vanished first).

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use phonebook_core::{
  contact::{Contact, ContactPatch},
  store::{ContactRepository, Page},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{AppState, error::ApiError};

pub const DEFAULT_PAGE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 10;

// ─── Request body ─────────────────────────────────────────────────────────────

/// JSON body accepted by `POST` (all but `address` required) and `PUT` (all
/// optional; absent or blank fields keep their stored value).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub phone_number: Option<String>,
  pub address:      Option<String>,
}

impl ContactBody {
  pub fn into_contact(self) -> Result<Contact, ApiError> {
    let contact = Contact {
      first_name:   self.first_name.unwrap_or_default(),
      last_name:    self.last_name.unwrap_or_default(),
      phone_number: self.phone_number.map(trimmed).unwrap_or_default(),
      address:      self.address.filter(|a| !a.trim().is_empty()),
    };
    contact.validate()?;
    Ok(contact)
  }

  pub fn into_patch(self) -> Result<ContactPatch, ApiError> {
    let patch = ContactPatch {
      first_name:   self.first_name,
      last_name:    self.last_name,
      phone_number: self.phone_number.map(trimmed),
      address:      self.address,
    };
    patch.validate()?;
    Ok(patch)
  }
}

/// Phone numbers are stored and compared without surrounding whitespace.
fn trimmed(phone_number: String) -> String { phone_number.trim().to_owned() }

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub page:      Option<i64>,
  pub page_size: Option<i64>,
}

/// `GET /api/contacts[?page=<n>][&pageSize=<n>]`
pub async fn list<R>(
  State(state): State<AppState<R>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  R: ContactRepository + 'static,
{
  let Query(params) = params?;
  let page = params.page.unwrap_or(DEFAULT_PAGE);
  let page_size = params.page_size.unwrap_or(MAX_PAGE_SIZE);

  if page < 1 || !(1..=MAX_PAGE_SIZE).contains(&page_size) {
    warn!(page, page_size, "invalid paging parameters");
    return Err(ApiError::BadRequest(
      "Page must be >= 1 and PageSize must be between 1 and 10.".into(),
    ));
  }

  // Any page beyond u32::MAX is already past the end of the store.
  let page = u32::try_from(page).unwrap_or(u32::MAX);
  let page_size = u32::try_from(page_size).unwrap_or(1);
  let window = Page::new(page, page_size)?;

  let contacts = state.contacts.list_contacts(window).await?;
  Ok(Json(contacts))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  pub phone_number: Option<String>,
}

/// `GET /api/contacts/search?phoneNumber=<number>`
pub async fn search<R>(
  State(state): State<AppState<R>>,
  params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Contact>, ApiError>
where
  R: ContactRepository + 'static,
{
  let Query(params) = params?;
  let Some(phone_number) = params
    .phone_number
    .map(trimmed)
    .filter(|p| !p.is_empty())
  else {
    warn!("phone number search attempted with empty phoneNumber");
    return Err(ApiError::BadRequest("Phone number must be provided.".into()));
  };

  let contact = state
    .contacts
    .find_by_phone_number(&phone_number)
    .await?
    .ok_or_else(|| {
      info!(%phone_number, "no contact found");
      ApiError::NotFound("No contact found with the provided phone number.".into())
    })?;
  Ok(Json(contact))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /api/contacts` — returns 201 + the created contact.
pub async fn create<R>(
  State(state): State<AppState<R>>,
  body: Result<Json<ContactBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  R: ContactRepository + 'static,
{
  let Json(body) = body?;
  let contact = body.into_contact()?;

  if state.contacts.exists(&contact.phone_number).await? {
    warn!(
      phone_number = %contact.phone_number,
      "attempt to create duplicate contact"
    );
    return Err(ApiError::duplicate_phone_number());
  }

  if !state.contacts.is_valid_phone_number(&contact.phone_number) {
    warn!(phone_number = %contact.phone_number, "invalid phone number format");
    return Err(ApiError::BadRequest("Invalid phone number format.".into()));
  }

  state.contacts.create(contact.clone()).await?;
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /api/contacts/{phone_number}` — body is a partial [`ContactBody`].
pub async fn update<R>(
  State(state): State<AppState<R>>,
  Path(phone_number): Path<String>,
  body: Result<Json<ContactBody>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  R: ContactRepository + 'static,
{
  let Json(body) = body?;
  let patch = body.into_patch()?;

  if !state.contacts.exists(&phone_number).await? {
    info!(%phone_number, "attempt to update non-existent contact");
    return Err(ApiError::contact_not_found());
  }

  if let Some(new_number) = patch.new_phone_number(&phone_number).map(str::to_owned) {
    if state.contacts.exists(&new_number).await? {
      warn!(%new_number, "attempt to update contact onto an existing phone number");
      return Err(ApiError::duplicate_phone_number());
    }
    if !state.contacts.is_valid_phone_number(&new_number) {
      warn!(%new_number, "invalid new phone number format");
      return Err(ApiError::BadRequest("Invalid new phone number format.".into()));
    }
  }

  state.contacts.update(&phone_number, patch).await?;
  Ok(StatusCode::ACCEPTED)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/contacts/{phone_number}`
pub async fn delete<R>(
  State(state): State<AppState<R>>,
  Path(phone_number): Path<String>,
) -> Result<StatusCode, ApiError>
where
  R: ContactRepository + 'static,
{
  if !state.contacts.exists(&phone_number).await? {
    info!(%phone_number, "attempt to delete non-existent contact");
    return Err(ApiError::contact_not_found());
  }

  state.contacts.delete(&phone_number).await?;
  Ok(StatusCode::ACCEPTED)
}

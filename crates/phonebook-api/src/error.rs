//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned for every 500; the cause is only logged.
pub const INTERNAL_MESSAGE: &str =
  "An error occurred while processing your request.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn contact_not_found() -> Self { Self::NotFound("Contact not found.".into()) }

  pub fn duplicate_phone_number() -> Self {
    Self::Conflict("A contact with the same phone number already exists.".into())
  }
}

impl From<phonebook_core::Error> for ApiError {
  fn from(e: phonebook_core::Error) -> Self {
    use phonebook_core::Error as E;
    match e {
      E::Validation(m) => Self::BadRequest(m),
      E::NotFound(_) => Self::contact_not_found(),
      E::DuplicatePhoneNumber(_) => Self::duplicate_phone_number(),
      E::Store(source) => Self::Internal(source),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Internal(e) => {
        error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

//! Request/error counting middleware and `GET /api/metrics`.

use std::{any::Any, sync::Arc};

use axum::{
  Json,
  extract::{Request, State},
  middleware::Next,
  response::{IntoResponse, Response},
};
use phonebook_core::{
  metrics::{Metrics, MetricsSnapshot},
  store::ContactRepository,
};

use crate::{AppState, error::ApiError};

/// Count every inbound request, and count it again as an error when the
/// downstream handler fails (any 5xx, including caught panics).
pub async fn track(
  State(metrics): State<Arc<Metrics>>,
  req: Request,
  next: Next,
) -> Response {
  metrics.increment_requests();
  let response = next.run(req).await;
  if response.status().is_server_error() {
    metrics.increment_errors();
  }
  response
}

/// Turn a handler panic into the generic 500 body.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
  let detail = payload
    .downcast_ref::<String>()
    .map(String::as_str)
    .or_else(|| payload.downcast_ref::<&str>().copied())
    .unwrap_or("unknown panic");
  ApiError::Internal(format!("handler panicked: {detail}").into()).into_response()
}

/// `GET /api/metrics`
pub async fn snapshot<R>(State(state): State<AppState<R>>) -> Json<MetricsSnapshot>
where
  R: ContactRepository + 'static,
{
  Json(state.metrics.snapshot())
}

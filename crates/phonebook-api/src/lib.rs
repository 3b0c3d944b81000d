//! JSON REST API for the phone book.
//!
//! Exposes an axum [`Router`] backed by a [`ContactService`] over any
//! [`ContactRepository`]. TLS and auth are the caller's responsibility.

pub mod contacts;
pub mod error;
pub mod metrics;
pub mod settings;

use std::sync::Arc;

use axum::{
  Router, middleware,
  routing::{get, put},
};
use phonebook_core::{
  metrics::Metrics, service::ContactService, store::ContactRepository,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::ApiError;
pub use settings::ServerConfig;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<R> {
  pub contacts: Arc<ContactService<R>>,
  pub metrics:  Arc<Metrics>,
}

impl<R> Clone for AppState<R> {
  fn clone(&self) -> Self {
    Self {
      contacts: Arc::clone(&self.contacts),
      metrics:  Arc::clone(&self.metrics),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router, wrapped in the metrics interceptor.
pub fn router<R>(state: AppState<R>) -> Router
where
  R: ContactRepository + 'static,
{
  let metrics = Arc::clone(&state.metrics);

  let routes = Router::new()
    .route("/api/contacts", get(contacts::list::<R>).post(contacts::create::<R>))
    .route("/api/contacts/search", get(contacts::search::<R>))
    .route(
      "/api/contacts/{phone_number}",
      put(contacts::update::<R>).delete(contacts::delete::<R>),
    )
    .route("/api/metrics", get(metrics::snapshot::<R>))
    .route("/health", get(health))
    .with_state(state);

  instrument(routes, metrics)
}

/// Wrap `routes` so every request is counted, handler panics become 500s,
/// and each request gets a trace span.
pub fn instrument(routes: Router, metrics: Arc<Metrics>) -> Router {
  routes
    .layer(CatchPanicLayer::custom(metrics::panic_response))
    .layer(middleware::from_fn_with_state(metrics, metrics::track))
    .layer(TraceLayer::new_for_http())
}

/// `GET /health` — liveness probe.
async fn health() -> &'static str { "Healthy" }

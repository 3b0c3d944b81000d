//! Process-wide request and error counters.
//!
//! Counters start at zero on process start and are never persisted. Reads
//! are not synchronised with increments, so a snapshot may land between the
//! request and error counts of an in-flight request.

use std::{
  sync::atomic::{AtomicU64, Ordering},
  time::{Duration, Instant},
};

use serde::Serialize;

#[derive(Debug)]
pub struct Metrics {
  total_requests: AtomicU64,
  total_errors:   AtomicU64,
  started:        Instant,
}

/// Point-in-time view of [`Metrics`], serialised for `GET /api/metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
  pub total_requests: u64,
  pub total_errors:   u64,
  pub uptime_seconds: u64,
}

impl Metrics {
  pub fn new() -> Self {
    Self {
      total_requests: AtomicU64::new(0),
      total_errors:   AtomicU64::new(0),
      started:        Instant::now(),
    }
  }

  pub fn increment_requests(&self) {
    self.total_requests.fetch_add(1, Ordering::Relaxed);
  }

  pub fn increment_errors(&self) {
    self.total_errors.fetch_add(1, Ordering::Relaxed);
  }

  pub fn uptime(&self) -> Duration { self.started.elapsed() }

  pub fn snapshot(&self) -> MetricsSnapshot {
    MetricsSnapshot {
      total_requests: self.total_requests.load(Ordering::Relaxed),
      total_errors:   self.total_errors.load(Ordering::Relaxed),
      uptime_seconds: self.uptime().as_secs(),
    }
  }
}

impl Default for Metrics {
  fn default() -> Self { Self::new() }
}

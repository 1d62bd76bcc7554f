//! Locale resolution counters.
//!
//! Tracks how page requests were resolved so operators can see how much
//! traffic arrives without a usable locale segment.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Resolution counters. One global instance is shared by the resolver.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    /// Paths that already carried a supported locale
    accepted: AtomicUsize,

    /// Paths rewritten to the fallback locale
    rewritten: AtomicUsize,

    /// Excluded paths (API, static assets, well-known files)
    bypassed: AtomicUsize,
}

static METRICS: OnceLock<ResolverMetrics> = OnceLock::new();

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the global resolver metrics instance.
    pub fn global() -> &'static ResolverMetrics {
        METRICS.get_or_init(ResolverMetrics::new)
    }

    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rewritten(&self) {
        self.rewritten.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bypassed(&self) {
        self.bypassed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn rewritten(&self) -> usize {
        self.rewritten.load(Ordering::Relaxed)
    }

    pub fn bypassed(&self) -> usize {
        self.bypassed.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let accepted = self.accepted();
        let rewritten = self.rewritten();
        let pages = accepted + rewritten;
        let fallback_rate = if pages > 0 {
            (rewritten as f64 / pages as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            accepted,
            rewritten,
            bypassed: self.bypassed(),
            fallback_rate,
        }
    }
}

/// Snapshot of the resolution counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub accepted: usize,
    pub rewritten: usize,
    pub bypassed: usize,

    /// Share of page requests rewritten to the fallback, as a percentage (0-100)
    pub fallback_rate: f64,
}

//! Lookup metrics for localizers built by one factory.
//!
//! Counters are shared by every localizer the factory hands out and can be
//! read at any time through [`LookupMetrics::report`].

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lookup and load counters.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Lookups answered with a value from the data source
    hits: AtomicUsize,

    /// Lookups the data source could not resolve (recorded in the miss cache)
    misses: AtomicUsize,

    /// Lookups answered from the miss cache without touching the data source
    short_circuits: AtomicUsize,

    /// Record sets loaded from the backing store
    loads: AtomicUsize,

    /// Failed load attempts
    load_failures: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_short_circuit(&self) {
        self.short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn short_circuits(&self) -> usize {
        self.short_circuits.load(Ordering::Relaxed)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn load_failures(&self) -> usize {
        self.load_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let misses = self.misses();
        let short_circuits = self.short_circuits();
        let total = hits + misses + short_circuits;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            misses,
            short_circuits,
            hit_rate,
            loads: self.loads(),
            load_failures: self.load_failures(),
        }
    }
}

/// Snapshot of lookup statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub misses: usize,
    pub short_circuits: usize,

    /// Share of lookups resolved to a value, as a percentage (0-100)
    pub hit_rate: f64,

    pub loads: usize,
    pub load_failures: usize,
}

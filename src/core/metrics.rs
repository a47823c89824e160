//! Handler metrics for observability
//!
//! Counters describing what a handler did with the events published to it:
//! how many it accepted or rejected on the synchronous pass, and how the
//! deferred deliveries ended.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-handler counters.
///
/// # Example
///
/// ```
/// use rust_fanout_logger::HandlerMetrics;
///
/// let metrics = HandlerMetrics::new();
/// metrics.record_accepted();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.accepted(), 1);
/// assert_eq!(metrics.delivered(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct HandlerMetrics {
    /// Events that passed `should_report` and were scheduled
    accepted: AtomicU64,

    /// Events filtered out on the synchronous pass
    rejected: AtomicU64,

    /// Deferred deliveries that completed without error
    delivered: AtomicU64,

    /// Deferred deliveries whose sink or observer failed
    failed: AtomicU64,

    /// Deferred deliveries skipped because the handler was disposed first
    discarded: AtomicU64,
}

impl HandlerMetrics {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    /// Accepted events whose deferred delivery has not finished yet.
    pub fn pending(&self) -> u64 {
        self.accepted()
            .saturating_sub(self.delivered() + self.failed() + self.discarded())
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self) -> u64 {
        self.discarded.fetch_add(1, Ordering::Relaxed)
    }

    /// Get failure rate as a percentage (0.0 - 100.0) of finished deliveries
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = self.delivered() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.accepted.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.discarded.store(0, Ordering::Relaxed);
    }
}

impl Default for HandlerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HandlerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted()),
            rejected: AtomicU64::new(self.rejected()),
            delivered: AtomicU64::new(self.delivered()),
            failed: AtomicU64::new(self.failed()),
            discarded: AtomicU64::new(self.discarded()),
        }
    }
}

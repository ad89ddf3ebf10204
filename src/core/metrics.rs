//! Logger metrics for observability
//!
//! Per-sink counters of what happened to each offered event: filtered out by
//! the gate, delivered, failed, or dropped because the sink's queue was full.

use super::session_config::SinkKind;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single sink
#[derive(Debug, Default)]
pub struct SinkCounters {
    /// Events the sink's gate rejected
    filtered: AtomicU64,

    /// Events written or accepted by the remote end
    delivered: AtomicU64,

    /// Delivery attempts that returned an error or panicked
    failed: AtomicU64,

    /// Events lost because the sink's queue was full or closed
    dropped: AtomicU64,

    /// Events skipped by the worker because the sink was disabled after queueing
    skipped: AtomicU64,
}

impl SinkCounters {
    pub const fn new() -> Self {
        Self {
            filtered: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
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
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
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
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_skipped(&self) -> u64 {
        self.skipped.fetch_add(1, Ordering::Relaxed)
    }
}

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use multisink_logger::core::{LoggerMetrics, SinkKind};
///
/// let metrics = LoggerMetrics::new();
/// metrics.sink(SinkKind::Local).record_delivered();
/// metrics.sink(SinkKind::Remote).record_failed();
///
/// assert_eq!(metrics.sink(SinkKind::Local).delivered(), 1);
/// assert_eq!(metrics.total_delivered(), 1);
/// assert_eq!(metrics.total_failed(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    sinks: [SinkCounters; 3],
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            sinks: [SinkCounters::new(), SinkCounters::new(), SinkCounters::new()],
        }
    }

    #[inline]
    pub fn sink(&self, kind: SinkKind) -> &SinkCounters {
        &self.sinks[kind.index()]
    }

    pub fn total_delivered(&self) -> u64 {
        self.sinks.iter().map(SinkCounters::delivered).sum()
    }

    pub fn total_failed(&self) -> u64 {
        self.sinks.iter().map(SinkCounters::failed).sum()
    }

    pub fn total_dropped(&self) -> u64 {
        self.sinks.iter().map(SinkCounters::dropped).sum()
    }
}

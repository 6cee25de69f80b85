// Performance metrics module
//
// Lightweight counters for the conversion worker

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Conversion metrics shared between the orchestrator and its worker
///
/// Uses atomic operations for thread-safe tracking without locks. The runner logs a
/// summary after every batch.
#[derive(Debug)]
pub struct Metrics {
    /// Files converted and post-processed successfully
    pub files_converted: AtomicUsize,

    /// Files whose conversion or post-processing failed
    pub files_failed: AtomicUsize,

    /// Batches started
    pub batches_started: AtomicUsize,

    /// Total wall time spent on jobs in milliseconds
    pub total_conversion_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            files_converted: AtomicUsize::new(0),
            files_failed: AtomicUsize::new(0),
            batches_started: AtomicUsize::new(0),
            total_conversion_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_batch_started(&self) {
        self.batches_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_converted(&self, duration: Duration) {
        self.files_converted.fetch_add(1, Ordering::Relaxed);
        self.record_time(duration);
    }

    pub fn record_file_failed(&self, duration: Duration) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
        self.record_time(duration);
    }

    fn record_time(&self, duration: Duration) {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        // Saturates instead of wrapping
        let _ = self.total_conversion_time_ms.fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |total| Some(total.saturating_add(ms)),
        );
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average time per attempted file in milliseconds
    pub fn avg_conversion_time_ms(&self) -> f64 {
        let total = self.total_conversion_time_ms.load(Ordering::Relaxed);
        let count = self.files_converted.load(Ordering::Relaxed)
            + self.files_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Metrics: {} batches, {} files converted, {} failed, avg {:.2}ms per file, uptime {:.0}s",
            self.batches_started.load(Ordering::Relaxed),
            self.files_converted.load(Ordering::Relaxed),
            self.files_failed.load(Ordering::Relaxed),
            self.avg_conversion_time_ms(),
            self.uptime().as_secs_f64()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

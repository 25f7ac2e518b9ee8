//! Ambient metrics collectors (SPEC_FULL §10.5), grounded on
//! `ofh_downlink_handler_metrics_collector.h` /
//! `ofh_uplink_request_handler_metrics_collector.h` /
//! `ofh_message_transmitter_metrics_collector.h`: plain atomic counters plus
//! a wall-clock execution-time measurer, collected on demand by an external
//! exporter (out of scope, per the Non-goal in spec §1/SPEC_FULL §12).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Wall-clock stopwatch around one `handle_*`/`on_new_symbol` invocation.
pub struct TimeExecutionMeasurer {
    start: Instant,
}

impl TimeExecutionMeasurer {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for TimeExecutionMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct ExecutionTimeAccumulator {
    total_ns: AtomicU64,
    samples: AtomicU64,
}

impl ExecutionTimeAccumulator {
    fn record(&self, elapsed: Duration) {
        self.total_ns.fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
        self.samples.fetch_add(1, Ordering::Relaxed);
    }

    fn mean(&self) -> Duration {
        let samples = self.samples.load(Ordering::Relaxed);
        if samples == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.total_ns.load(Ordering::Relaxed) / samples)
    }
}

/// Snapshot returned by [`DownlinkHandlerMetrics::collect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DownlinkHandlerMetricsSnapshot {
    pub late_count: u64,
    pub pool_exhausted_count: u64,
    pub fragment_too_small_count: u64,
    pub mean_execution_time: Duration,
}

/// Counters for component C9 (`ofh_downlink_handler_metrics_collector`).
#[derive(Default)]
pub struct DownlinkHandlerMetrics {
    late_count: AtomicU64,
    pool_exhausted_count: AtomicU64,
    fragment_too_small_count: AtomicU64,
    execution_time: ExecutionTimeAccumulator,
}

impl DownlinkHandlerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_late(&self) {
        self.late_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_pool_exhausted(&self) {
        self.pool_exhausted_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_fragment_too_small(&self) {
        self.fragment_too_small_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_execution(&self, elapsed: Duration) {
        self.execution_time.record(elapsed);
    }

    pub fn collect(&self) -> DownlinkHandlerMetricsSnapshot {
        DownlinkHandlerMetricsSnapshot {
            late_count: self.late_count.load(Ordering::Relaxed),
            pool_exhausted_count: self.pool_exhausted_count.load(Ordering::Relaxed),
            fragment_too_small_count: self.fragment_too_small_count.load(Ordering::Relaxed),
            mean_execution_time: self.execution_time.mean(),
        }
    }
}

/// Snapshot returned by [`UplinkRequestHandlerMetrics::collect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UplinkRequestHandlerMetricsSnapshot {
    pub late_count: u64,
    pub prach_late_count: u64,
    pub pool_exhausted_count: u64,
    pub mean_execution_time: Duration,
}

/// Counters for component C10 (`ofh_uplink_request_handler_metrics_collector`).
#[derive(Default)]
pub struct UplinkRequestHandlerMetrics {
    late_count: AtomicU64,
    prach_late_count: AtomicU64,
    pool_exhausted_count: AtomicU64,
    execution_time: ExecutionTimeAccumulator,
}

impl UplinkRequestHandlerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_late(&self) {
        self.late_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_prach_late(&self) {
        self.prach_late_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_pool_exhausted(&self) {
        self.pool_exhausted_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_execution(&self, elapsed: Duration) {
        self.execution_time.record(elapsed);
    }

    pub fn collect(&self) -> UplinkRequestHandlerMetricsSnapshot {
        UplinkRequestHandlerMetricsSnapshot {
            late_count: self.late_count.load(Ordering::Relaxed),
            prach_late_count: self.prach_late_count.load(Ordering::Relaxed),
            pool_exhausted_count: self.pool_exhausted_count.load(Ordering::Relaxed),
            mean_execution_time: self.execution_time.mean(),
        }
    }
}

/// Snapshot returned by [`MessageTransmitterMetrics::collect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageTransmitterMetricsSnapshot {
    pub nof_bursts_sent: u64,
    pub nof_frames_sent: u64,
    pub nof_bytes_sent: u64,
    pub mean_execution_time: Duration,
}

/// Counters for component C11 (`ofh_message_transmitter_metrics_collector`).
#[derive(Default)]
pub struct MessageTransmitterMetrics {
    nof_bursts_sent: AtomicU64,
    nof_frames_sent: AtomicU64,
    nof_bytes_sent: AtomicU64,
    execution_time: ExecutionTimeAccumulator,
}

impl MessageTransmitterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_burst_sent(&self, nof_frames: usize, nof_bytes: usize) {
        self.nof_bursts_sent.fetch_add(1, Ordering::Relaxed);
        self.nof_frames_sent.fetch_add(nof_frames as u64, Ordering::Relaxed);
        self.nof_bytes_sent.fetch_add(nof_bytes as u64, Ordering::Relaxed);
    }

    pub fn record_execution(&self, elapsed: Duration) {
        self.execution_time.record(elapsed);
    }

    pub fn collect(&self) -> MessageTransmitterMetricsSnapshot {
        MessageTransmitterMetricsSnapshot {
            nof_bursts_sent: self.nof_bursts_sent.load(Ordering::Relaxed),
            nof_frames_sent: self.nof_frames_sent.load(Ordering::Relaxed),
            nof_bytes_sent: self.nof_bytes_sent.load(Ordering::Relaxed),
            mean_execution_time: self.execution_time.mean(),
        }
    }
}

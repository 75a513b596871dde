//! Basic metrics instrumentation.
//!
//! Counters for the validation pipeline and duration tracking for gateway calls.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the validation and payment services.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of validation calls
    validations_total: Arc<AtomicU64>,

    /// Validations that produced a valid code
    validations_valid_total: Arc<AtomicU64>,

    /// QR payloads with an embedded code
    extraction_hits_total: Arc<AtomicU64>,

    /// QR payloads without an embedded code
    extraction_misses_total: Arc<AtomicU64>,

    /// Payments accepted by the gateway
    payments_submitted_total: Arc<AtomicU64>,

    /// Payments parked in the offline queue
    payments_queued_total: Arc<AtomicU64>,

    /// Total number of gateway requests
    gateway_requests_total: Arc<AtomicU64>,

    /// Total number of gateway errors
    gateway_errors_total: Arc<AtomicU64>,

    /// Total duration of all gateway requests in milliseconds
    gateway_duration_total_ms: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            validations_total: Arc::new(AtomicU64::new(0)),
            validations_valid_total: Arc::new(AtomicU64::new(0)),
            extraction_hits_total: Arc::new(AtomicU64::new(0)),
            extraction_misses_total: Arc::new(AtomicU64::new(0)),
            payments_submitted_total: Arc::new(AtomicU64::new(0)),
            payments_queued_total: Arc::new(AtomicU64::new(0)),
            gateway_requests_total: Arc::new(AtomicU64::new(0)),
            gateway_errors_total: Arc::new(AtomicU64::new(0)),
            gateway_duration_total_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record one validation outcome.
    pub fn record_validation(&self, is_valid: bool) {
        self.validations_total.fetch_add(1, Ordering::Relaxed);
        if is_valid {
            self.validations_valid_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record one QR extraction attempt.
    pub fn record_extraction(&self, hit: bool) {
        if hit {
            self.extraction_hits_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.extraction_misses_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_payment_submitted(&self) {
        self.payments_submitted_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_payment_queued(&self) {
        self.payments_queued_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a gateway request with duration.
    pub fn record_gateway_request(&self, duration: Duration) {
        self.gateway_requests_total.fetch_add(1, Ordering::Relaxed);
        self.gateway_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a gateway error.
    pub fn record_gateway_error(&self) {
        self.gateway_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn validations_total(&self) -> u64 {
        self.validations_total.load(Ordering::Relaxed)
    }

    pub fn validations_valid_total(&self) -> u64 {
        self.validations_valid_total.load(Ordering::Relaxed)
    }

    pub fn validations_invalid_total(&self) -> u64 {
        self.validations_total()
            .saturating_sub(self.validations_valid_total())
    }

    pub fn extraction_hits_total(&self) -> u64 {
        self.extraction_hits_total.load(Ordering::Relaxed)
    }

    pub fn extraction_misses_total(&self) -> u64 {
        self.extraction_misses_total.load(Ordering::Relaxed)
    }

    pub fn payments_submitted_total(&self) -> u64 {
        self.payments_submitted_total.load(Ordering::Relaxed)
    }

    pub fn payments_queued_total(&self) -> u64 {
        self.payments_queued_total.load(Ordering::Relaxed)
    }

    pub fn gateway_requests_total(&self) -> u64 {
        self.gateway_requests_total.load(Ordering::Relaxed)
    }

    pub fn gateway_errors_total(&self) -> u64 {
        self.gateway_errors_total.load(Ordering::Relaxed)
    }

    pub fn gateway_duration_total_ms(&self) -> u64 {
        self.gateway_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average gateway request duration in milliseconds.
    pub fn gateway_duration_avg_ms(&self) -> f64 {
        let total = self.gateway_duration_total_ms();
        let count = self.gateway_requests_total();
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            validations_total: self.validations_total(),
            validations_valid_total: self.validations_valid_total(),
            validations_invalid_total: self.validations_invalid_total(),
            extraction_hits_total: self.extraction_hits_total(),
            extraction_misses_total: self.extraction_misses_total(),
            payments_submitted_total: self.payments_submitted_total(),
            payments_queued_total: self.payments_queued_total(),
            gateway_requests_total: self.gateway_requests_total(),
            gateway_errors_total: self.gateway_errors_total(),
            gateway_duration_avg_ms: self.gateway_duration_avg_ms(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub validations_total: u64,
    pub validations_valid_total: u64,
    pub validations_invalid_total: u64,
    pub extraction_hits_total: u64,
    pub extraction_misses_total: u64,
    pub payments_submitted_total: u64,
    pub payments_queued_total: u64,
    pub gateway_requests_total: u64,
    pub gateway_errors_total: u64,
    pub gateway_duration_avg_ms: f64,
}

/// Helper for timing gateway requests.
pub struct GatewayTimer {
    start: Instant,
    metrics: Metrics,
}

impl GatewayTimer {
    /// Start timing a gateway request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        self.metrics.record_gateway_request(self.start.elapsed());
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        self.metrics.record_gateway_request(self.start.elapsed());
        self.metrics.record_gateway_error();
    }
}

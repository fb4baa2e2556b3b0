//! Detection and translation metrics.
//!
//! Fallbacks never reach the user, so these counters are how an operator
//! notices a broken model or a failing translation service.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by the identifier, normalizer and localizer.
///
/// Constructed once and handed to each component as an `Arc`.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Number of messages classified by the language model
    detections: AtomicUsize,

    /// Number of classifications that failed and fell back to the reference language
    detection_fallbacks: AtomicUsize,

    /// Number of requests sent to the translation service
    translation_requests: AtomicUsize,

    /// Number of translation requests that failed (text passed through untranslated)
    translation_failures: AtomicUsize,

    /// Number of translations skipped because source and target were the same
    short_circuits: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_detection(&self) {
        self.detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection_fallback(&self) {
        self.detection_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translation_request(&self) {
        self.translation_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translation_failure(&self) {
        self.translation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_short_circuit(&self) {
        self.short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn detections(&self) -> usize {
        self.detections.load(Ordering::Relaxed)
    }

    pub fn detection_fallbacks(&self) -> usize {
        self.detection_fallbacks.load(Ordering::Relaxed)
    }

    pub fn translation_requests(&self) -> usize {
        self.translation_requests.load(Ordering::Relaxed)
    }

    pub fn translation_failures(&self) -> usize {
        self.translation_failures.load(Ordering::Relaxed)
    }

    pub fn short_circuits(&self) -> usize {
        self.short_circuits.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let requests = self.translation_requests();
        let failures = self.translation_failures();
        let translation_success_rate = if requests > 0 {
            ((requests - failures) as f64 / requests as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            detections: self.detections(),
            detection_fallbacks: self.detection_fallbacks(),
            translation_requests: requests,
            translation_failures: failures,
            translation_success_rate,
            short_circuits: self.short_circuits(),
        }
    }
}

/// Snapshot of the current counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub detections: usize,
    pub detection_fallbacks: usize,
    pub translation_requests: usize,
    pub translation_failures: usize,

    /// Translation success rate as a percentage (0-100)
    pub translation_success_rate: f64,

    pub short_circuits: usize,
}

//! Settings read by the request middleware on every request.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::observability::{LoggingConfig, ObservabilityConfig};

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(1_000);
static OTEL_PARENT_PROPAGATION: AtomicBool = AtomicBool::new(false);

pub(super) fn apply(logging: &LoggingConfig, observability: &ObservabilityConfig) {
    SLOW_REQUEST_THRESHOLD_MS.store(logging.slow_request_threshold_ms, Ordering::Relaxed);

    // Incoming trace headers only matter when spans are exported.
    OTEL_PARENT_PROPAGATION.store(
        observability.otel_enabled && observability.otel_parent_propagation_enabled,
        Ordering::Relaxed,
    );
}

pub(super) fn slow_request_threshold_ms() -> u64 {
    SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed)
}

pub(super) fn otel_parent_propagation_enabled() -> bool {
    OTEL_PARENT_PROPAGATION.load(Ordering::Relaxed)
}

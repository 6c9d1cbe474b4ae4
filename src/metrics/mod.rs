use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Events handled per kind and resulting status code
// - Handling latency per kind (dominated by ledger round trips)
// - Failures per kind and tier (domain, not_found, unexpected)
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub events_handled: IntCounterVec,
    pub event_duration: HistogramVec,
    pub failures: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let events_handled = IntCounterVec::new(
            Opts::new("events_handled_total", "Total integration events handled"),
            &["kind", "status"],
        )?;
        registry.register(Box::new(events_handled.clone()))?;

        // NetSuite calls routinely take seconds
        let event_duration = HistogramVec::new(
            HistogramOpts::new(
                "event_handling_duration_seconds",
                "Integration event handling duration",
            )
            .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 120.0]),
            &["kind"],
        )?;
        registry.register(Box::new(event_duration.clone()))?;

        let failures = IntCounterVec::new(
            Opts::new("ledger_failures_total", "Events that ended in a failure tier"),
            &["kind", "tier"],
        )?;
        registry.register(Box::new(failures.clone()))?;

        Ok(Self {
            registry,
            events_handled,
            event_duration,
            failures,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_event(&self, kind: &str, status: u16, duration_secs: f64) {
        self.events_handled
            .with_label_values(&[kind, &status.to_string()])
            .inc();
        self.event_duration
            .with_label_values(&[kind])
            .observe(duration_secs);
    }

    pub fn record_failure(&self, kind: &str, tier: &str) {
        self.failures.with_label_values(&[kind, tier]).inc();
    }
}

use prometheus::{
    Encoder, GaugeVec, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub lifecycle_ops_total: IntCounterVec,
    pub lifecycle_latency_seconds: HistogramVec,
    pub active_sessions: IntGauge,
    pub cache_entries: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let lifecycle_ops_total = IntCounterVec::new(
            Opts::new("lifecycle_ops_total", "Lifecycle operations by op and outcome"),
            &["op", "outcome"],
        )
        .expect("valid lifecycle_ops_total metric");

        let lifecycle_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "lifecycle_latency_seconds",
                "Latency of lifecycle operations in seconds",
            ),
            &["op"],
        )
        .expect("valid lifecycle_latency_seconds metric");

        let active_sessions = IntGauge::new("active_sessions", "Logged-in portal sessions")
            .expect("valid active_sessions metric");

        let cache_entries = GaugeVec::new(
            Opts::new("cache_entries", "Cached view-model entries per collection"),
            &["collection"],
        )
        .expect("valid cache_entries metric");

        registry
            .register(Box::new(lifecycle_ops_total.clone()))
            .expect("register lifecycle_ops_total");
        registry
            .register(Box::new(lifecycle_latency_seconds.clone()))
            .expect("register lifecycle_latency_seconds");
        registry
            .register(Box::new(active_sessions.clone()))
            .expect("register active_sessions");
        registry
            .register(Box::new(cache_entries.clone()))
            .expect("register cache_entries");

        Self {
            registry,
            lifecycle_ops_total,
            lifecycle_latency_seconds,
            active_sessions,
            cache_entries,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

// src/metrics/collector.rs
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Inbound page requests
    pub requests_total: IntCounterVec,
    pub request_duration_seconds: HistogramVec,

    // Remote service calls
    pub translations_total: IntCounterVec,
    pub health_checks_total: IntCounterVec,
    pub upstream_duration_seconds: HistogramVec,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("translator_requests_total", "Total number of page requests"),
            &["method", "status_code"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "translator_request_duration_seconds",
                "Page request duration in seconds",
            ),
            &["method"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let translations_total = IntCounterVec::new(
            Opts::new(
                "translator_translations_total",
                "Translation attempts by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(translations_total.clone()))?;

        let health_checks_total = IntCounterVec::new(
            Opts::new(
                "translator_health_checks_total",
                "Remote health checks by result",
            ),
            &["result"],
        )?;
        registry.register(Box::new(health_checks_total.clone()))?;

        let upstream_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "translator_upstream_duration_seconds",
                "Remote service call duration",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
            &["endpoint"],
        )?;
        registry.register(Box::new(upstream_duration_seconds.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            translations_total,
            health_checks_total,
            upstream_duration_seconds,
        })
    }

    pub fn record_request(&self, method: &str, status_code: u16, duration: std::time::Duration) {
        let status = status_code.to_string();
        self.requests_total
            .with_label_values(&[method, &status])
            .inc();

        self.request_duration_seconds
            .with_label_values(&[method])
            .observe(duration.as_secs_f64());
    }

    pub fn record_translation(&self, outcome: &str) {
        self.translations_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_health_check(&self, result: &str) {
        self.health_checks_total.with_label_values(&[result]).inc();
    }

    pub fn record_upstream(&self, endpoint: &str, duration: std::time::Duration) {
        self.upstream_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration.as_secs_f64());
    }
}

// Helper for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_exposes_recorded_series() {
        let registry = MetricsRegistry::new().unwrap();
        let collector = registry.collector();

        collector.record_translation("success");
        collector.record_translation("timeout");
        collector.record_health_check("unreachable");

        let text = String::from_utf8(registry.gather().unwrap()).unwrap();
        assert!(text.contains(r#"translator_translations_total{outcome="success"} 1"#));
        assert!(text.contains(r#"translator_translations_total{outcome="timeout"} 1"#));
        assert!(text.contains(r#"translator_health_checks_total{result="unreachable"} 1"#));
    }
}

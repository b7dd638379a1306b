use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::modules::directory::model::{BusinessStatus, StatusCounts};

const NAMESPACE: &str = "geosme";

/// Central metrics registry for the directory service
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Auth
    pub login_attempts_total: CounterVec,
    pub two_factor_events_total: CounterVec,

    // Directory
    pub competitor_analyses_total: CounterVec,
    pub competitors_found: HistogramVec,
    pub sme_status_changes_total: CounterVec,
    pub businesses_by_status: IntGaugeVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace(NAMESPACE),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace(NAMESPACE)
                .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let login_attempts_total = CounterVec::new(
            Opts::new("login_attempts_total", "Login attempts by outcome").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(login_attempts_total.clone()))?;

        let two_factor_events_total = CounterVec::new(
            Opts::new("two_factor_events_total", "Two-factor setup and verification events")
                .namespace(NAMESPACE),
            &["event"],
        )?;
        registry.register(Box::new(two_factor_events_total.clone()))?;

        let competitor_analyses_total = CounterVec::new(
            Opts::new("competitor_analyses_total", "Competitor analyses by saturation result")
                .namespace(NAMESPACE),
            &["saturation"],
        )?;
        registry.register(Box::new(competitor_analyses_total.clone()))?;

        let competitors_found = HistogramVec::new(
            HistogramOpts::new("competitors_found", "Competitors found per analysis")
                .namespace(NAMESPACE)
                .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0]),
            &["category"],
        )?;
        registry.register(Box::new(competitors_found.clone()))?;

        let sme_status_changes_total = CounterVec::new(
            Opts::new("sme_status_changes_total", "SME verification status transitions")
                .namespace(NAMESPACE),
            &["from", "to"],
        )?;
        registry.register(Box::new(sme_status_changes_total.clone()))?;

        let businesses_by_status = IntGaugeVec::new(
            Opts::new("businesses_by_status", "Businesses in the directory by status")
                .namespace(NAMESPACE),
            &["status"],
        )?;
        registry.register(Box::new(businesses_by_status.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            login_attempts_total,
            two_factor_events_total,
            competitor_analyses_total,
            competitors_found,
            sme_status_changes_total,
            businesses_by_status,
        }))
    }

    pub fn set_business_counts(&self, counts: &StatusCounts) {
        for status in BusinessStatus::ALL {
            self.businesses_by_status
                .with_label_values(&[status.as_str()])
                .set(counts.get(status) as i64);
        }
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

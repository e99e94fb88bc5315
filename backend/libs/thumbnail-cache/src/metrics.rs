//! Thumbnail cache metrics

use crate::error::ErrorKind;
use crate::models::CacheStatus;
use prometheus::{CounterVec, Histogram, HistogramOpts, Opts, Registry};
use std::sync::OnceLock;
use std::time::Duration;

static METRICS: OnceLock<ThumbnailMetricsInner> = OnceLock::new();

struct ThumbnailMetricsInner {
    lookups: CounterVec,
    errors: CounterVec,
    render_duration: Histogram,
}

impl ThumbnailMetricsInner {
    fn new() -> Self {
        Self {
            lookups: CounterVec::new(
                Opts::new(
                    "thumbnail_cache_lookups_total",
                    "Thumbnail lookups by outcome",
                ),
                &["status"],
            )
            .expect("valid metric definition"),
            errors: CounterVec::new(
                Opts::new("thumbnail_cache_errors_total", "Failed thumbnail lookups"),
                &["kind"],
            )
            .expect("valid metric definition"),
            render_duration: Histogram::with_opts(
                HistogramOpts::new(
                    "thumbnail_cache_render_duration_seconds",
                    "Thumbnail API round trip time",
                )
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            )
            .expect("valid metric definition"),
        }
    }

    fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        registry.register(Box::new(self.lookups.clone()))?;
        registry.register(Box::new(self.errors.clone()))?;
        registry.register(Box::new(self.render_duration.clone()))?;
        Ok(())
    }
}

fn get_metrics() -> &'static ThumbnailMetricsInner {
    METRICS.get_or_init(ThumbnailMetricsInner::new)
}

/// Handle for recording thumbnail cache metrics
#[derive(Clone, Default)]
pub struct ThumbnailMetrics;

impl ThumbnailMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Register metrics with a Prometheus registry
    pub fn register(registry: &Registry) -> Result<(), prometheus::Error> {
        get_metrics().register(registry)
    }

    pub fn record_lookup(&self, status: CacheStatus) {
        get_metrics()
            .lookups
            .with_label_values(&[status.as_str()])
            .inc();
    }

    pub fn record_error(&self, kind: ErrorKind) {
        get_metrics().errors.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn record_render(&self, elapsed: Duration) {
        get_metrics().render_duration.observe(elapsed.as_secs_f64());
    }
}

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Config cache metrics
    pub cache_hits: IntCounter,
    pub cache_refetches: IntCounter,
    pub cache_stale_served: IntCounter,

    // Remote source metrics
    pub fetch_failures: IntCounterVec,
    pub fetch_duration: HistogramVec,

    // Token metrics
    pub token_refresh_attempts: IntCounter,
    pub token_refresh_failures: IntCounterVec,
    pub token_expiry_unix: IntGauge,

    // Http
    pub http_requests: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("sheetconfig".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Cache
            cache_hits: IntCounter::new("cache_hits_total", "Requests served from a fresh snapshot").unwrap(),
            cache_refetches: IntCounter::new("cache_refetches_total", "Requests that triggered a remote fetch").unwrap(),
            cache_stale_served: IntCounter::new("cache_stale_served_total", "Requests served from a stale snapshot after a failed fetch").unwrap(),

            // Source
            fetch_failures: IntCounterVec::new(Opts::new("fetch_failures_total", "Fetch failures by reason"),&["reason"],).unwrap(),
            fetch_duration: HistogramVec::new(HistogramOpts::new("fetch_duration_seconds", "Fetch duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["outcome"],).unwrap(),

            // Token
            token_refresh_attempts: IntCounter::new("token_refresh_attempts_total", "Access token renewal attempts").unwrap(),
            token_refresh_failures: IntCounterVec::new(Opts::new("token_refresh_failures_total", "Access token renewal failures by reason"),&["reason"],).unwrap(),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Access token expiry timestamp").unwrap(),

            // Http
            http_requests: IntCounterVec::new(Opts::new("http_requests_total", "Http requests by route and status"),&["route", "status"],).unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total","Validation errors during startup",).unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.cache_refetches.clone())).unwrap();
        reg.register(Box::new(metrics.cache_stale_served.clone())).unwrap();
        reg.register(Box::new(metrics.fetch_failures.clone())).unwrap();
        reg.register(Box::new(metrics.fetch_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_refresh_attempts.clone())).unwrap();
        reg.register(Box::new(metrics.token_refresh_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_expiry_unix.clone())).unwrap();
        reg.register(Box::new(metrics.http_requests.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}

//! Prometheus metrics for the HTTP surface, series cache and remote fetches.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
    pub cache_hits_total: IntCounter,
    pub cache_misses_total: IntCounter,
    /// Callers that joined a fetch already in flight for their key
    pub cache_coalesced_total: IntCounter,
    pub cache_evictions_total: IntCounter,
    pub series_fetches_total: IntCounter,
    /// Failed fetches labelled by error kind
    pub series_fetch_failures_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let cache_hits_total =
            IntCounter::new("series_cache_hits_total", "Series cache lookups served from cache")?;
        let cache_misses_total = IntCounter::new(
            "series_cache_misses_total",
            "Series cache lookups that started a fetch",
        )?;
        let cache_coalesced_total = IntCounter::new(
            "series_cache_coalesced_total",
            "Series cache lookups that joined an in-flight fetch",
        )?;
        let cache_evictions_total =
            IntCounter::new("series_cache_evictions_total", "Series cache entries evicted")?;
        let series_fetches_total =
            IntCounter::new("series_fetches_total", "Remote series fetches issued")?;
        let series_fetch_failures_total = IntCounterVec::new(
            Opts::new("series_fetch_failures_total", "Remote series fetches that failed"),
            &["kind"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(cache_hits_total.clone()))?;
        registry.register(Box::new(cache_misses_total.clone()))?;
        registry.register(Box::new(cache_coalesced_total.clone()))?;
        registry.register(Box::new(cache_evictions_total.clone()))?;
        registry.register(Box::new(series_fetches_total.clone()))?;
        registry.register(Box::new(series_fetch_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            cache_hits_total,
            cache_misses_total,
            cache_coalesced_total,
            cache_evictions_total,
            series_fetches_total,
            series_fetch_failures_total,
        })
    }

    /// Render all metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

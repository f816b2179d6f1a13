//! Test utilities for API server integration tests

use axum_test::TestServer;
use statewatt::cache::SeriesCache;
use statewatt::config::CacheConfig;
use statewatt::core::http::{create_router, AppState, HealthStatus};
use statewatt::metrics::Metrics;
use statewatt::services::EiaClient;
use statewatt::EnergyInsights;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use wiremock::MockServer;

use crate::eia_mock::API_KEY;

/// API server wired to a mocked EIA API
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub eia: MockServer,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let eia = MockServer::start().await;
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));

        let client = EiaClient::with_client(eia.uri(), API_KEY, reqwest::Client::new())
            .with_max_retries(1)
            .with_retry_delay(Duration::from_millis(1));
        let insights = EnergyInsights::new(
            Arc::new(client),
            SeriesCache::with_metrics(CacheConfig::unbounded(), metrics.clone()),
        );

        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            insights,
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            eia,
        }
    }
}

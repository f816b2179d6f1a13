//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::core::insights::EnergyInsights;
use crate::error::EnergyError;
use crate::metrics::Metrics;
use crate::models::{
    FuelCode, FuelInfo, GenerationMixTable, IntensityTable, Region, SeasonalBandRow,
};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub insights: EnergyInsights,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

fn error_response(e: EnergyError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        _ if e.is_fetch_failure() => StatusCode::BAD_GATEWAY,
        EnergyError::UnknownRegion(_)
        | EnergyError::UnknownFuel(_)
        | EnergyError::InvalidWindow { .. } => StatusCode::BAD_REQUEST,
        // a required (non-fuel) series the source does not carry
        EnergyError::SeriesNotFound { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_client_error() {
        warn!(error = %e, "Rejected query");
    } else {
        error!(error = %e, kind = e.kind(), "Query failed");
    }
    (status, Json(json!({ "error": e.to_string() })))
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "statewatt-api",
        "cached_series": state.insights.cache().len().await,
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Inclusive year window; an omitted bound leaves that side open.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    start: Option<i32>,
    end: Option<i32>,
}

impl WindowQuery {
    fn bounds(&self) -> Result<(i32, i32), EnergyError> {
        let start = self.start.unwrap_or(i32::MIN);
        let end = self.end.unwrap_or(i32::MAX);
        if start > end {
            return Err(EnergyError::InvalidWindow { start, end });
        }
        Ok((start, end))
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerationQuery {
    #[serde(default)]
    fuels: String,
    start: Option<i32>,
    end: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct IntensityQuery {
    #[serde(default)]
    regions: String,
    start: Option<i32>,
    end: Option<i32>,
}

/// Parse a comma-separated list, skipping empty items.
fn parse_list<T>(
    raw: &str,
    parse: impl Fn(&str) -> Result<T, EnergyError>,
) -> Result<Vec<T>, EnergyError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse)
        .collect()
}

async fn list_regions(State(state): State<AppState>) -> Json<Vec<Region>> {
    Json(state.insights.regions())
}

async fn list_fuels(State(state): State<AppState>) -> Json<Vec<FuelInfo>> {
    Json(state.insights.fuels())
}

async fn consumption(
    State(state): State<AppState>,
    Path(region): Path<String>,
    Query(window): Query<WindowQuery>,
) -> ApiResult<Vec<SeasonalBandRow>> {
    let region = Region::parse(&region).map_err(error_response)?;
    let (start, end) = window.bounds().map_err(error_response)?;

    let rows = state
        .insights
        .consumption_bands(region, start, end)
        .await
        .map_err(error_response)?;
    Ok(Json(rows))
}

async fn generation(
    State(state): State<AppState>,
    Path(region): Path<String>,
    Query(params): Query<GenerationQuery>,
) -> ApiResult<GenerationMixTable> {
    let region = Region::parse(&region).map_err(error_response)?;
    let fuels = parse_list(&params.fuels, FuelCode::parse).map_err(error_response)?;
    let (start, end) = WindowQuery {
        start: params.start,
        end: params.end,
    }
    .bounds()
    .map_err(error_response)?;

    let table = state
        .insights
        .generation_mix(region, &fuels, start, end)
        .await
        .map_err(error_response)?;
    Ok(Json(table))
}

async fn intensity(
    State(state): State<AppState>,
    Query(params): Query<IntensityQuery>,
) -> ApiResult<Vec<IntensityTable>> {
    let regions = parse_list(&params.regions, Region::parse).map_err(error_response)?;
    let (start, end) = WindowQuery {
        start: params.start,
        end: params.end,
    }
    .bounds()
    .map_err(error_response)?;

    let tables = state
        .insights
        .intensity_many(&regions, start, end)
        .await
        .map_err(error_response)?;
    Ok(Json(tables))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/regions", get(list_regions))
        .route("/api/fuels", get(list_fuels))
        .route("/api/regions/{region}/consumption", get(consumption))
        .route("/api/regions/{region}/generation", get(generation))
        .route("/api/intensity", get(intensity))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    insights: EnergyInsights,
    metrics: Arc<Metrics>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        insights,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}

//! Statewatt API Server
//!
//! JSON API over the consumption-band, generation-mix and intensity views.
//! Remote series are cached in-process, so each instance warms its own cache.

use dotenvy::dotenv;
use statewatt::config::{self, InsightsConfig};
use statewatt::core::http::start_server;
use statewatt::logging;
use statewatt::metrics::Metrics;
use statewatt::EnergyInsights;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = config::get_port()?;
    let insights_config = InsightsConfig::from_env()?;

    let env = config::get_environment();
    info!("Starting Statewatt API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);
    info!(
        base_url = %insights_config.api_base_url,
        ttl_seconds = insights_config.cache.ttl.map(|t| t.as_secs()),
        max_entries = insights_config.cache.max_entries,
        "Series cache configured"
    );

    let metrics = Arc::new(Metrics::new()?);
    let insights = EnergyInsights::from_config(&insights_config, Some(metrics.clone()))?;

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, insights, metrics).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}

// FloatChat V1 Backend Entry Point
// Chat-driven analysis over Argo float profiles

mod actors;
mod brain;
mod charts;
mod config;
mod data;
mod error;
mod models;
mod pipeline;
mod server;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use actors::OpenRouterHandle;
use config::{Config, LoggingStatus};
use data::{ArgoDataStore, DataService};
use pipeline::QueryPipeline;
use server::AppState;
use tracing::{error, info, warn};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

// Installs the tracing stack: a console layer always, plus a JSON file layer
// when the sink can be opened. File logging is best-effort.
fn init_telemetry(config: &Config) -> LoggingStatus {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = tracing_subscriber::fmt::layer();

    match config.open_log_sink() {
        Ok((file, path)) => {
            let file_layer =
                BunyanFormattingLayer::new(env!("CARGO_PKG_NAME").to_string(), Arc::new(file));
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(JsonStorageLayer)
                .with(file_layer)
                .init();
            LoggingStatus::FileAndConsole(path)
        }
        Err(reason) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
            LoggingStatus::ConsoleOnly { reason }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env();

    match init_telemetry(&config) {
        LoggingStatus::FileAndConsole(path) => info!("Logging to console and {:?}", path),
        LoggingStatus::ConsoleOnly { reason } => {
            warn!("Could not set up file logging: {}", reason);
        }
    }

    info!("FloatChat API starting up...");

    // A missing API key is not fatal: /health reports not_configured and
    // text generation uses local fallbacks.
    match config.validate() {
        Ok(()) => info!("Configuration validated successfully"),
        Err(e) => error!("Configuration validation failed: {}", e),
    }
    config.ensure_data_dir();

    let data = DataService::new(ArgoDataStore::new(config.data_dir.clone()));

    // Warm the dataset and summary caches without blocking the bind.
    let warm = data.clone();
    tokio::spawn(async move { warm.warm_up().await });

    let generator = OpenRouterHandle::new(config.api_url.clone(), config.api_key.clone());
    let state = AppState {
        pipeline: QueryPipeline::new(generator, data.clone()),
        data,
        api_configured: config.api_configured(),
    };
    let app = server::router(state, &config.cors_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Starting FloatChat API on {}", addr);
    info!("FloatChat API startup complete");

    axum::serve(listener, app).await?;
    Ok(())
}

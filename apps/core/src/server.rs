//! HTTP transport layer: route table, request handlers, and CORS policy.

use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::warn;
use validator::Validate;

use crate::actors::TextGenerator;
use crate::data::{DataService, COLUMNS};
use crate::error::AppError;
use crate::models::{HealthResponse, QueryRequest, QueryResponse};
use crate::pipeline::QueryPipeline;

/// Number of records returned by `GET /data/preview`.
const PREVIEW_LIMIT: usize = 100;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState<G> {
    pub pipeline: QueryPipeline<G>,
    pub data: DataService,
    pub api_configured: bool,
}

/// Builds the full application router with CORS applied to every route.
pub fn router<G>(state: AppState<G>, cors_origins: &[String]) -> Router
where
    G: TextGenerator + Clone,
{
    Router::new()
        .route("/", get(root))
        .route("/query", post(process_query))
        .route("/health", get(health_check))
        .route("/data/summary", get(data_summary))
        .route("/data/preview", get(data_preview))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Browser clients send credentialed requests, so origins must be listed
/// explicitly. Unparseable entries are skipped with a warning rather than
/// failing startup.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "FloatChat API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "AI-powered chat interface for Argo oceanographic data analysis",
        "endpoints": {
            "query": "/query",
            "health": "/health",
            "data_summary": "/data/summary",
            "data_preview": "/data/preview",
        },
    }))
}

async fn process_query<G>(
    State(state): State<AppState<G>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError>
where
    G: TextGenerator + Clone,
{
    request.validate()?;
    Ok(Json(state.pipeline.process_query(request).await))
}

async fn health_check<G>(State(state): State<AppState<G>>) -> Json<HealthResponse>
where
    G: TextGenerator + Clone,
{
    let data_available = matches!(state.data.dataset().await, Some(d) if !d.is_empty());
    let status = if data_available { "healthy" } else { "degraded" };
    let data_status = if data_available {
        "available"
    } else {
        "unavailable"
    };
    let api_status = if state.api_configured {
        "configured"
    } else {
        "not_configured"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        data_status: data_status.to_string(),
        api_status: api_status.to_string(),
    })
}

async fn data_summary<G>(State(state): State<AppState<G>>) -> Result<Json<Value>, AppError>
where
    G: TextGenerator + Clone,
{
    let summary = state
        .data
        .summary()
        .await
        .ok_or_else(|| AppError::DataUnavailable("Data summary not available".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "summary": summary,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

async fn data_preview<G>(State(state): State<AppState<G>>) -> Result<Json<Value>, AppError>
where
    G: TextGenerator + Clone,
{
    let dataset = match state.data.dataset().await {
        Some(dataset) if !dataset.is_empty() => dataset,
        _ => return Err(AppError::DataUnavailable("Data not available".to_string())),
    };
    let preview: Vec<_> = dataset.records().iter().take(PREVIEW_LIMIT).collect();

    Ok(Json(json!({
        "success": true,
        "preview": preview,
        "total_records": dataset.len(),
        "columns": COLUMNS,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let Json(body) = root().await;
        assert_eq!(body["name"], "FloatChat API");
        assert_eq!(body["endpoints"]["query"], "/query");
        assert_eq!(body["endpoints"]["data_preview"], "/data/preview");
    }

    #[test]
    fn test_cors_layer_tolerates_invalid_origin() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "not a header\nvalue".to_string(),
        ];
        // Must not panic; the bad entry is dropped.
        let _ = cors_layer(&origins);
    }
}

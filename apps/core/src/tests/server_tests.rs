//! Server Tests
//!
//! HTTP endpoint tests against a real server bound to an ephemeral port.

use crate::actors::messages::PromptKind;
use crate::actors::traits::TextGenerator;
use crate::data::measurement::tests::sample_measurement;
use crate::data::measurement::Measurement;
use crate::data::store::{ArgoDataStore, DataService};
use crate::data::{Dataset, COLUMNS};
use crate::error::AppError;
use crate::pipeline::QueryPipeline;
use crate::server::{router, AppState};
use async_trait::async_trait;
use serde_json::{json, Value};

// ============================================================================
// Test Fixtures
// ============================================================================

const ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone)]
struct CannedGenerator;

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate_response(
        &self,
        _query: String,
        _data_context: Option<String>,
        _kind: PromptKind,
    ) -> Result<String, AppError> {
        Ok("Test response.".to_string())
    }
}

fn sample_records() -> Vec<Measurement> {
    (0..20)
        .map(|i| {
            let mut m = sample_measurement();
            m.profile_id = i % 4;
            m.depth_m = 50.0 * i as f64;
            m.pressure_dbar = m.depth_m * 1.025;
            m
        })
        .collect()
}

fn state_with_records(
    dir: &tempfile::TempDir,
    api_configured: bool,
) -> AppState<CannedGenerator> {
    let store = ArgoDataStore::new(dir.path());
    store.persist(&Dataset::new(sample_records())).unwrap();

    let data = DataService::new(ArgoDataStore::new(dir.path()));
    AppState {
        pipeline: QueryPipeline::new(CannedGenerator, data.clone()),
        data,
        api_configured,
    }
}

fn unavailable_state(dir: &tempfile::TempDir) -> AppState<CannedGenerator> {
    let store = ArgoDataStore::new(dir.path());
    std::fs::write(store.cache_path(), b"corrupted").unwrap();

    let data = DataService::new(store);
    AppState {
        pipeline: QueryPipeline::new(CannedGenerator, data.clone()),
        data,
        api_configured: false,
    }
}

/// Serves the router on an ephemeral port and returns the base URL.
async fn spawn_app(state: AppState<CannedGenerator>) -> String {
    let app = router(state, &[ALLOWED_ORIGIN.to_string()]);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_root_describes_the_api() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(state_with_records(&dir, true)).await;

    let body: Value = reqwest::get(format!("{}/", url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["name"], "FloatChat API");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["endpoints"]["query"], "/query");
    assert_eq!(body["endpoints"]["data_summary"], "/data/summary");
}

#[tokio::test]
async fn test_health_reports_ready_service() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(state_with_records(&dir, true)).await;

    let body: Value = reqwest::get(format!("{}/health", url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["data_status"], "available");
    assert_eq!(body["api_status"], "configured");
}

#[tokio::test]
async fn test_health_reports_degraded_service() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(unavailable_state(&dir)).await;

    let response = reqwest::get(format!("{}/health", url)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["data_status"], "unavailable");
    assert_eq!(body["api_status"], "not_configured");
}

#[tokio::test]
async fn test_query_round_trip_with_chart() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(state_with_records(&dir, true)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/query", url))
        .json(&json!({"message": "show me temperature profiles"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["query_type"], "data_query");
    assert_eq!(body["data_summary"]["records_found"], 20);
    assert!(body["plot_url"]
        .as_str()
        .is_some_and(|url| url.starts_with("data:text/html;base64,")));
}

#[tokio::test]
async fn test_query_rejects_empty_message() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(state_with_records(&dir, true)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/query", url))
        .json(&json!({"message": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Bad request");
}

#[tokio::test]
async fn test_query_without_message_field_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(state_with_records(&dir, true)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/query", url))
        .json(&json!({"language": "en"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn test_empty_match_and_unavailable_data_answer_differently() {
    let query = json!({"message": "temperature at 4000 to 5000 m"});
    let client = reqwest::Client::new();

    let with_data_dir = tempfile::tempdir().unwrap();
    let with_data = spawn_app(state_with_records(&with_data_dir, true)).await;
    let empty_match: Value = client
        .post(format!("{}/query", with_data))
        .json(&query)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let broken_dir = tempfile::tempdir().unwrap();
    let broken = spawn_app(unavailable_state(&broken_dir)).await;
    let unavailable: Value = client
        .post(format!("{}/query", broken))
        .json(&query)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Both answer 200 with a data_query type, but only the empty match is
    // a success; the texts steer the user differently.
    assert_eq!(empty_match["success"], true);
    assert!(empty_match["text_response"]
        .as_str()
        .unwrap()
        .starts_with("No data found"));

    assert_eq!(unavailable["success"], false);
    assert!(unavailable["text_response"]
        .as_str()
        .unwrap()
        .contains("unable to access the Argo dataset"));
    assert_eq!(unavailable["error_message"], "Data not available");
}

#[tokio::test]
async fn test_data_summary_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(state_with_records(&dir, true)).await;

    let response = reqwest::get(format!("{}/data/summary", url)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["summary"]["total_measurements"], 20);
    assert_eq!(body["summary"]["total_profiles"], 4);
}

#[tokio::test]
async fn test_data_summary_unavailable_is_service_error() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(unavailable_state(&dir)).await;

    let response = reqwest::get(format!("{}/data/summary", url)).await.unwrap();
    assert_eq!(response.status(), 503);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_data_preview_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(state_with_records(&dir, true)).await;

    let response = reqwest::get(format!("{}/data/preview", url)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_records"], 20);
    assert_eq!(body["preview"].as_array().unwrap().len(), 20);
    assert_eq!(body["columns"].as_array().unwrap().len(), COLUMNS.len());
    assert_eq!(body["columns"][0], "profile_id");
    assert!(body["preview"][0]["depth_m"].is_number());
}

#[tokio::test]
async fn test_data_preview_unavailable_is_service_error() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(unavailable_state(&dir)).await;

    let response = reqwest::get(format!("{}/data/preview", url)).await.unwrap();
    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn test_cors_preflight_for_listed_origin() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(state_with_records(&dir, true)).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/query", url))
        .header("Origin", ALLOWED_ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
    assert_eq!(
        headers
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn test_cors_preflight_for_unlisted_origin() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_app(state_with_records(&dir, true)).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/query", url))
        .header("Origin", "https://evil.example")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

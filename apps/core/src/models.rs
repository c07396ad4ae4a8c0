use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

/// Incoming body for `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QueryRequest {
    /// The user's natural-language question.
    #[validate(length(min = 1))]
    pub message: String,
    /// Preferred response language (advisory, forwarded to the model).
    #[serde(default = "default_language")]
    pub language: String,
    /// Whether a chart should be rendered when data is available.
    #[serde(default = "default_true")]
    pub include_visualization: bool,
}

/// Compact statistics attached to data-query replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDataSummary {
    /// Number of records after filtering.
    pub records_found: usize,
    /// Number of distinct profiles in the filtered set.
    pub profiles: usize,
    /// Earliest and latest measurement dates, RFC 3339.
    pub date_range: Option<[String; 2]>,
    /// Shallowest and deepest measurement in meters.
    pub depth_range: Option<[f64; 2]>,
}

/// Outgoing body for `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The generated (or fallback) reply text.
    pub text_response: String,
    /// Base64 `data:text/html` URL of the rendered chart, when one was made.
    pub plot_url: Option<String>,
    /// Statistics for data queries, absent otherwise.
    pub data_summary: Option<QueryDataSummary>,
    /// Label of the detected intent (`greeting`, `data_query`, ...).
    pub query_type: String,
    /// RFC 3339 timestamp of the reply.
    pub timestamp: String,
    /// False only on the data-unavailable and internal-error paths.
    pub success: bool,
    /// Machine-readable failure note accompanying `success = false`.
    pub error_message: Option<String>,
}

/// Outgoing body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` when data is available, `degraded` otherwise.
    pub status: String,
    /// RFC 3339 timestamp of the check.
    pub timestamp: String,
    /// `available` or `unavailable`.
    pub data_status: String,
    /// `configured` or `not_configured`.
    pub api_status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_defaults() {
        let request: QueryRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(request.message, "hi");
        assert_eq!(request.language, "en");
        assert!(request.include_visualization);
    }

    #[test]
    fn test_query_request_rejects_empty_message() {
        let request: QueryRequest = serde_json::from_str(r#"{"message": ""}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_query_response_round_trip() {
        let response = QueryResponse {
            text_response: "hello".to_string(),
            plot_url: None,
            data_summary: None,
            query_type: "greeting".to_string(),
            timestamp: "2025-01-01T00:00:00Z".to_string(),
            success: true,
            error_message: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["query_type"], "greeting");
        assert_eq!(json["plot_url"], serde_json::Value::Null);
        assert_eq!(json["success"], true);
    }
}

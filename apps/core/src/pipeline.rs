//! Query processing pipeline: classify the message, fetch and filter data
//! when asked for it, generate the text response, and attach a chart.
//!
//! The pipeline holds its collaborators as fields, so request handling
//! never reaches for process-wide state.

use crate::actors::messages::PromptKind;
use crate::actors::traits::TextGenerator;
use crate::brain::intent::{Intent, IntentClassifier, QueryParams, Variable};
use crate::charts::{self, PlotKind};
use crate::data::filter::{self, QueryFilter};
use crate::data::measurement::Dataset;
use crate::data::store::DataService;
use crate::data::summary;
use crate::error::AppError;
use crate::models::{QueryDataSummary, QueryRequest, QueryResponse};
use chrono::Utc;
use tracing::{error, info};

const DATA_UNAVAILABLE_TEXT: &str =
    "I apologize, but I'm currently unable to access the Argo dataset. Please try again later.";
const NO_MATCH_TEXT: &str =
    "No data found matching your criteria. Please try adjusting your query parameters.";
const GENERATION_ERROR_TEXT: &str = "I encountered an issue generating a detailed response, \
     but I can still help with your oceanographic data analysis.";
const PROCESSING_ERROR_TEXT: &str = "I apologize, but I encountered an error processing your \
     request. Please try again or rephrase your question.";

/// Orchestrates one query from classification to response.
#[derive(Clone)]
pub struct QueryPipeline<G> {
    classifier: IntentClassifier,
    generator: G,
    data: DataService,
}

impl<G: TextGenerator> QueryPipeline<G> {
    pub fn new(generator: G, data: DataService) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            generator,
            data,
        }
    }

    /// Processes a query. Failures never escape; they become an error
    /// response with `success: false`.
    pub async fn process_query(&self, request: QueryRequest) -> QueryResponse {
        info!("Processing query: {}...", truncate_chars(&request.message, 100));

        match self.try_process(&request).await {
            Ok(response) => {
                info!(
                    "Query processed successfully. Response length: {}",
                    response.text_response.len()
                );
                response
            }
            Err(e) => {
                error!("Error processing query: {}", e);
                QueryResponse {
                    text_response: PROCESSING_ERROR_TEXT.to_string(),
                    plot_url: None,
                    data_summary: None,
                    query_type: "error".to_string(),
                    timestamp: Utc::now().to_rfc3339(),
                    success: false,
                    error_message: Some(e.to_string()),
                }
            }
        }
    }

    async fn try_process(&self, request: &QueryRequest) -> Result<QueryResponse, AppError> {
        let result = self.classifier.classify(&request.message);
        info!(
            "Detected query type: {}, parameters: {:?}",
            result.intent, result.params
        );

        let mut filtered: Option<Dataset> = None;
        let mut data_context: Option<String> = None;

        if result.intent == Intent::DataQuery {
            let dataset = match self.data.dataset().await {
                Some(dataset) if !dataset.is_empty() => dataset,
                _ => return Ok(data_unavailable_response(result.intent)),
            };

            let data = filter::query(&dataset, &filter_from_params(&result.params));
            if data.is_empty() {
                return Ok(no_match_response(result.intent));
            }

            data_context = Some(summary::data_context(&data));
            filtered = Some(data);
        }

        let kind = match result.intent {
            Intent::DataQuery => PromptKind::DataAnalysis,
            Intent::Greeting => PromptKind::Greeting,
            _ => PromptKind::Explanation,
        };

        let mut text_response = match self
            .generator
            .generate_response(request.message.clone(), data_context, kind)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!("Error generating LLM response: {}", e);
                GENERATION_ERROR_TEXT.to_string()
            }
        };

        let mut plot_url = None;
        if request.include_visualization {
            if let Some(data) = &filtered {
                match build_chart(data, &request.message, &result.params) {
                    Ok((url, kind)) => {
                        plot_url = Some(url);
                        text_response.push_str(&format!(
                            "\n\nI've created a {} visualization to help illustrate the data patterns.",
                            kind.display_name()
                        ));
                    }
                    Err(e) => error!("Error creating visualization: {}", e),
                }
            }
        }

        Ok(QueryResponse {
            text_response,
            plot_url,
            data_summary: filtered.as_ref().map(summarize_records),
            query_type: result.intent.label().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            success: true,
            error_message: None,
        })
    }
}

fn filter_from_params(params: &QueryParams) -> QueryFilter {
    QueryFilter {
        min_depth: params.min_depth,
        max_depth: params.max_depth,
        region: params.region.clone(),
        ..QueryFilter::default()
    }
}

fn build_chart(
    data: &Dataset,
    message: &str,
    params: &QueryParams,
) -> Result<(String, PlotKind), AppError> {
    let suggestions = charts::suggest(message);
    let kind = suggestions.first().copied().ok_or_else(|| {
        AppError::Internal("no chart suggestion for data query".to_string())
    })?;
    info!("Creating plot of type: {}", kind.label());

    let variable = params.variable.unwrap_or(Variable::Temperature);
    let title = format!("Visualization for: {}...", truncate_chars(message, 50));
    let html = charts::render(data, kind, variable, &title)?;
    Ok((charts::encode_data_url(&html), kind))
}

fn summarize_records(data: &Dataset) -> QueryDataSummary {
    let date_range = match (
        data.iter().map(|m| m.date).min(),
        data.iter().map(|m| m.date).max(),
    ) {
        (Some(start), Some(end)) => Some([start.to_rfc3339(), end.to_rfc3339()]),
        _ => None,
    };
    let depth_range = data
        .iter()
        .map(|m| m.depth_m)
        .fold(None, |acc: Option<[f64; 2]>, depth| match acc {
            Some([min, max]) => Some([min.min(depth), max.max(depth)]),
            None => Some([depth, depth]),
        });

    QueryDataSummary {
        records_found: data.len(),
        profiles: data.profile_count(),
        date_range,
        depth_range,
    }
}

fn data_unavailable_response(intent: Intent) -> QueryResponse {
    QueryResponse {
        text_response: DATA_UNAVAILABLE_TEXT.to_string(),
        plot_url: None,
        data_summary: None,
        query_type: intent.label().to_string(),
        timestamp: Utc::now().to_rfc3339(),
        success: false,
        error_message: Some("Data not available".to_string()),
    }
}

fn no_match_response(intent: Intent) -> QueryResponse {
    QueryResponse {
        text_response: NO_MATCH_TEXT.to_string(),
        plot_url: None,
        data_summary: None,
        query_type: intent.label().to_string(),
        timestamp: Utc::now().to_rfc3339(),
        success: true,
        error_message: None,
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

//! # Charts Module
//!
//! Plotly visualization building for FloatChat.
//! Figures are rendered as standalone HTML pages and shipped to the client
//! as base64 data URLs, so no plot files are written to disk.
//!
//! ## Components
//! - `figures`: Per-chart trace and layout builders

mod figures;

use crate::brain::intent::Variable;
use crate::data::measurement::Dataset;
use crate::error::AppError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use figures::Figure;
use serde_json::json;
use uuid::Uuid;

/// Chart types the service can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    TemperatureDepthProfile,
    TsDiagram,
    GeographicMap,
    TimeSeries,
    DepthDistribution,
    RegionalComparison,
    CorrelationHeatmap,
    ThreeDScatter,
}

impl PlotKind {
    pub fn label(&self) -> &'static str {
        match self {
            PlotKind::TemperatureDepthProfile => "temperature_depth_profile",
            PlotKind::TsDiagram => "ts_diagram",
            PlotKind::GeographicMap => "geographic_map",
            PlotKind::TimeSeries => "time_series",
            PlotKind::DepthDistribution => "depth_distribution",
            PlotKind::RegionalComparison => "regional_comparison",
            PlotKind::CorrelationHeatmap => "correlation_heatmap",
            PlotKind::ThreeDScatter => "3d_scatter",
        }
    }

    /// Label with spaces, for user-facing messages.
    pub fn display_name(&self) -> String {
        self.label().replace('_', " ")
    }
}

/// Suggests chart types for a query, most specific first. Falls back to a
/// standard trio when the query names no chart.
pub fn suggest(query: &str) -> Vec<PlotKind> {
    let query = query.to_lowercase();
    let mut suggestions = Vec::new();

    if query.contains("profile") {
        suggestions.push(PlotKind::TemperatureDepthProfile);
    }
    if (query.contains("salinity") && query.contains("temperature")) || query.contains("t-s") {
        suggestions.push(PlotKind::TsDiagram);
    }
    if query.contains("map") || query.contains("geographic") || query.contains("location") {
        suggestions.push(PlotKind::GeographicMap);
    }
    if query.contains("time") || query.contains("trend") || query.contains("temporal") {
        suggestions.push(PlotKind::TimeSeries);
    }
    if query.contains("distribution") || query.contains("histogram") {
        suggestions.push(PlotKind::DepthDistribution);
    }
    if query.contains("region") || query.contains("compare") {
        suggestions.push(PlotKind::RegionalComparison);
    }
    if query.contains("correlation") || query.contains("relationship") {
        suggestions.push(PlotKind::CorrelationHeatmap);
    }
    if query.contains("3d") || query.contains("three") {
        suggestions.push(PlotKind::ThreeDScatter);
    }

    if suggestions.is_empty() {
        suggestions = vec![
            PlotKind::TemperatureDepthProfile,
            PlotKind::GeographicMap,
            PlotKind::TsDiagram,
        ];
    }

    suggestions
}

/// Renders a chart as a standalone HTML page. The variable selects the
/// plotted column for the charts that take one; the others ignore it.
pub fn render(
    dataset: &Dataset,
    kind: PlotKind,
    variable: Variable,
    title: &str,
) -> Result<String, AppError> {
    let figure = match kind {
        PlotKind::TemperatureDepthProfile => figures::temperature_depth_profile(dataset, title),
        PlotKind::TsDiagram => figures::ts_diagram(dataset, title),
        PlotKind::GeographicMap => figures::geographic_map(dataset, variable, title),
        PlotKind::TimeSeries => figures::time_series(dataset, variable, title),
        PlotKind::DepthDistribution => figures::depth_distribution(dataset, title),
        PlotKind::RegionalComparison => figures::regional_comparison(dataset, variable, title),
        PlotKind::CorrelationHeatmap => figures::correlation_heatmap(dataset, title),
        PlotKind::ThreeDScatter => figures::three_d_scatter(dataset, title),
    };
    html_page(&figure)
}

/// Wraps an HTML page in a `data:` URL for embedding in a JSON response.
pub fn encode_data_url(html: &str) -> String {
    format!("data:text/html;base64,{}", STANDARD.encode(html))
}

fn html_page(figure: &Figure) -> Result<String, AppError> {
    let div_id = Uuid::new_v4();
    let data = serde_json::to_string(&figure.data)?;
    let layout = serde_json::to_string(&figure.layout)?;
    let config = serde_json::to_string(&json!({
        "displayModeBar": true,
        "displaylogo": false,
        "responsive": true
    }))?;

    Ok(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\" />\n\
         <script src=\"https://cdn.plot.ly/plotly-2.32.0.min.js\"></script>\n\
         </head>\n\
         <body>\n\
         <div id=\"{div_id}\" class=\"plotly-graph-div\" style=\"height:100%; width:100%;\"></div>\n\
         <script type=\"text/javascript\">\n\
         Plotly.newPlot(\"{div_id}\", {data}, {layout}, {config});\n\
         </script>\n\
         </body>\n\
         </html>"
    ))
}

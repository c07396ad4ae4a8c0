//! Query intent classification using ordered rules.
//!
//! Fast keyword and regex matching against the user message.
//! No ML model required - pure Rust string matching.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Standalone greeting (hi, hello, good morning, etc.)
    Greeting,
    /// Request for dataset records, numbers, or charts
    DataQuery,
    /// Conceptual question about floats or oceanography
    Explanation,
    /// Anything else
    General,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns a human-readable label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::DataQuery => "data_query",
            Intent::Explanation => "explanation",
            Intent::General => "general",
        }
    }
}

/// Measured variable a data query asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    Temperature,
    Salinity,
}

impl Variable {
    pub fn label(&self) -> &'static str {
        match self {
            Variable::Temperature => "temperature",
            Variable::Salinity => "salinity",
        }
    }

    /// Column of the cached table that holds this variable
    pub fn column_name(&self) -> &'static str {
        match self {
            Variable::Temperature => "temperature_c",
            Variable::Salinity => "salinity_psu",
        }
    }
}

/// Parameters extracted from a data query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub variable: Option<Variable>,
    pub region: Option<String>,
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Detected intent
    pub intent: Intent,
    /// Extracted parameters (empty except for data queries)
    pub params: QueryParams,
}

/// Messages that count as a greeting only when they are the entire message
const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Substrings that mark a conceptual question
const EXPLANATION_KEYWORDS: &[&str] = &[
    "what is",
    "how does",
    "explain",
    "why",
    "definition",
    "concept",
    "argo float",
    "oceanography",
    "marine science",
    "help me understand",
];

/// Substrings that mark a request for data or charts
const DATA_KEYWORDS: &[&str] = &[
    "temperature",
    "salinity",
    "depth",
    "profile",
    "data",
    "show me",
    "plot",
    "graph",
    "visualization",
    "chart",
    "analyze",
    "trend",
    "pattern",
    "distribution",
    "atlantic",
    "pacific",
    "indian",
    "ocean",
    "latitude",
    "longitude",
    "region",
];

// Compiled once at startup
static DEPTH_RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(?:to|-)?\s*(\d+)?\s*(?:m|meter|depth)")
        .expect("Invalid regex: depth range pattern")
});

/// Rule-based intent classifier. Rules are checked in a fixed order and
/// the first match wins: exact greeting, then explanation keywords, then
/// data keywords, then the general fallback.
#[derive(Clone)]
pub struct IntentClassifier;

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify the intent of a user message
    pub fn classify(&self, text: &str) -> IntentResult {
        let lowered = text.to_lowercase();
        let lowered = lowered.trim();
        let normalized = lowered.trim_end_matches('!');

        if GREETINGS.contains(&normalized) {
            return IntentResult {
                intent: Intent::Greeting,
                params: QueryParams::default(),
            };
        }

        if EXPLANATION_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return IntentResult {
                intent: Intent::Explanation,
                params: QueryParams::default(),
            };
        }

        if DATA_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return IntentResult {
                intent: Intent::DataQuery,
                params: extract_query_params(lowered),
            };
        }

        IntentResult {
            intent: Intent::General,
            params: QueryParams::default(),
        }
    }
}

fn extract_query_params(message: &str) -> QueryParams {
    let mut params = QueryParams::default();

    if message.contains("temperature") {
        params.variable = Some(Variable::Temperature);
    } else if message.contains("salinity") {
        params.variable = Some(Variable::Salinity);
    }

    if message.contains("atlantic") {
        params.region = Some("Atlantic".to_string());
    } else if message.contains("pacific") {
        params.region = Some("Pacific".to_string());
    } else if message.contains("indian") {
        params.region = Some("Indian".to_string());
    }

    if let Some(captures) = DEPTH_RANGE_PATTERN.captures(message) {
        params.min_depth = captures.get(1).and_then(|m| m.as_str().parse().ok());
        params.max_depth = captures.get(2).and_then(|m| m.as_str().parse().ok());
    }

    params
}

//! # Brain Module
//!
//! Fast, non-LLM analysis system for FloatChat.
//! Classifies user input BEFORE calling the LLM so the orchestrator knows
//! whether to fetch data, build charts, or answer directly.
//!
//! ## Components
//! - `intent`: Ordered-rule intent classification with parameter extraction

pub mod intent;

// Re-export main types for convenience
pub use intent::{Intent, IntentClassifier, IntentResult, QueryParams, Variable};

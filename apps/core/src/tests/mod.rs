//! Test Module
//!
//! Comprehensive test suite for the FloatChat backend.
//!
//! ## Test Categories
//! - `brain_tests`: Intent classification rules and query parameter extraction
//! - `data_tests`: Dataset synthesis, the Arrow cache, filtering, statistics
//! - `pipeline_tests`: End-to-end query orchestration with mock generation
//! - `server_tests`: HTTP endpoints served over an ephemeral port

pub mod server_tests;

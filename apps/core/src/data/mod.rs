//! # Data Module
//!
//! Dataset storage, synthesis, filtering, and statistics for FloatChat.
//!
//! ## Components
//! - `measurement`: record model with derived season / latitude-zone fields
//! - `synthetic`: deterministic seeded sample-data generator
//! - `store`: Arrow IPC cache plus the initialize-once data service
//! - `filter`: pure range/equality filtering
//! - `summary`: dataset statistics and the text-generation data context

pub mod filter;
pub mod measurement;
pub mod store;
pub mod summary;
pub mod synthetic;

pub use filter::QueryFilter;
pub use measurement::{Dataset, LatZone, Measurement, Season};
pub use store::{ArgoDataStore, DataService, COLUMNS};
pub use summary::DatasetSummary;

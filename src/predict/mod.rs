//! Prediction and inference
//!
//! Lazily load trained bundles and fall back to the heuristic without them.

pub mod cache;
pub mod heuristic;
pub mod service;

pub use cache::{BundleCache, CacheStatus};
pub use service::{format_prediction, PredictionService};

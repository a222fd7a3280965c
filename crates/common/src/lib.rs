//! ShopScout Common Library
//!
//! Shared code for the ShopScout services including:
//! - Catalog records and comparison results
//! - Query planning (pattern catalog, classifier, extractor, plan builder)
//! - Query embedding client abstraction
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod catalog;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod metrics;
pub mod planner;

// Re-export commonly used types
pub use catalog::{ComparisonResult, ProductRecord, ProductView, StockStatus};
pub use config::AppConfig;
pub use embeddings::Embedder;
pub use errors::{AppError, Result};
pub use planner::{PlanBuilder, QueryIntent, QueryPlan};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Backend port contracts
//!
//! The planner never talks to a store directly. Hosts construct one
//! implementation of each port and hand it to the pipeline; either may be
//! absent.

use async_trait::async_trait;
use shopscout_common::catalog::{ComparisonResult, ProductRecord};
use shopscout_common::errors::Result;

/// Symbolic reasoning over products, categories and similarity links
///
/// Every operation applies the in-stock filter. Not finding a product is a
/// normal outcome (`None` or an empty list), never an error.
#[async_trait]
pub trait GraphReasoningPort: Send + Sync {
    /// First in-stock product whose name contains `name`, case-insensitively
    async fn find_product_by_name(&self, name: &str) -> Result<Option<ProductRecord>>;

    /// In-stock neighbours of any product matching `name`, either link direction
    async fn find_similar_products(&self, name: &str, limit: usize) -> Result<Vec<ProductRecord>>;

    /// In-stock products strictly cheaper than the product `name` resolves to,
    /// lowest price first
    async fn find_cheaper_alternatives(&self, name: &str, limit: usize)
        -> Result<Vec<ProductRecord>>;

    /// Side-by-side comparison of two products resolved by name
    async fn compare_products(&self, name1: &str, name2: &str) -> Result<ComparisonResult>;

    /// In-stock products in a category whose name contains `category`,
    /// lowest price first
    async fn find_by_category(&self, category: &str, limit: usize) -> Result<Vec<ProductRecord>>;

    /// Short backend name for logs and readiness reports
    fn backend_name(&self) -> &'static str;
}

/// Nearest-neighbour product search
#[async_trait]
pub trait VectorSearchPort: Send + Sync {
    /// Up to `k` in-stock products ranked by relevance to `query`
    async fn semantic_search(&self, query: &str, k: usize) -> Result<Vec<ProductRecord>>;

    fn backend_name(&self) -> &'static str;
}

//! Catalog types shared by the planner and every backend port
//!
//! Provides:
//! - Product records as returned by the graph and vector stores
//! - Stock status with the wire value used by the store front
//! - Structured two-product comparisons

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire value for an available product
pub const IN_STOCK: &str = "instock";

/// Availability of a product
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StockStatus {
    /// Available for purchase
    #[default]
    InStock,
    /// Any other store-front status (outofstock, onbackorder, ...)
    Other(String),
}

impl StockStatus {
    pub fn is_in_stock(&self) -> bool {
        matches!(self, StockStatus::InStock)
    }

    pub fn as_str(&self) -> &str {
        match self {
            StockStatus::InStock => IN_STOCK,
            StockStatus::Other(status) => status,
        }
    }
}

impl From<String> for StockStatus {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(IN_STOCK) {
            StockStatus::InStock
        } else {
            StockStatus::Other(trimmed.to_string())
        }
    }
}

impl From<&str> for StockStatus {
    fn from(value: &str) -> Self {
        StockStatus::from(value.to_string())
    }
}

impl From<StockStatus> for String {
    fn from(value: StockStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product as returned by either backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Stable identifier (empty when the backend did not supply one)
    #[serde(default)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Price in store currency, never negative
    pub price: f64,

    /// Availability, in-stock when absent on the wire
    #[serde(default)]
    pub stock_status: StockStatus,

    /// Category names in backend order
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ProductRecord {
    /// Create an in-stock product without categories
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.max(0.0),
            stock_status: StockStatus::InStock,
            categories: Vec::new(),
        }
    }

    pub fn with_stock_status(mut self, status: impl Into<StockStatus>) -> Self {
        self.stock_status = status.into();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_status.is_in_stock()
    }

    /// Case-insensitive substring match on the product name
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// The comparable view used in two-product comparisons
    pub fn view(&self) -> ProductView {
        ProductView {
            name: self.name.clone(),
            price: self.price,
            categories: self.categories.clone(),
            stock_status: self.stock_status.clone(),
        }
    }
}

/// Comparable attributes of one side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub name: String,
    pub price: f64,
    pub categories: Vec<String>,
    pub stock_status: StockStatus,
}

/// Structured side-by-side comparison of two resolved products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductComparison {
    pub product1: ProductView,
    pub product2: ProductView,

    /// Absolute price gap, never negative
    pub price_difference: f64,

    /// Name of the lower-priced product (first product on a tie)
    pub cheaper: String,
}

/// Outcome of comparing two products by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonResult {
    /// One or both names did not resolve to an in-stock product
    Unresolved { message: String },
    /// Both names resolved
    Compared(ProductComparison),
}

impl ComparisonResult {
    /// Error value naming both query terms
    pub fn unresolved(name1: &str, name2: &str) -> Self {
        ComparisonResult::Unresolved {
            message: format!("Could not find one or both products: {}, {}", name1, name2),
        }
    }

    /// Compare two resolved views
    pub fn between(product1: ProductView, product2: ProductView) -> Self {
        let price_difference = (product1.price - product2.price).abs();
        let cheaper = if product1.price <= product2.price {
            product1.name.clone()
        } else {
            product2.name.clone()
        };

        ComparisonResult::Compared(ProductComparison {
            product1,
            product2,
            price_difference,
            cheaper,
        })
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ComparisonResult::Compared(_))
    }
}

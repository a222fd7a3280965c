//! In-memory catalog graph
//!
//! Holds products in insertion order, which is the stable ordering every
//! lookup resolves against, plus an undirected similarity adjacency.
//! Loaded from a JSON snapshot:
//!
//! ```json
//! {
//!   "products": [{"id": "9", "name": "Bracelet 9", "price": 45.0, "categories": ["Bracelets"]}],
//!   "similar": [["9", "12"]]
//! }
//! ```

use crate::ports::GraphReasoningPort;
use async_trait::async_trait;
use serde::Deserialize;
use shopscout_common::catalog::{ComparisonResult, ProductRecord};
use shopscout_common::errors::{AppError, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CatalogSnapshot {
    products: Vec<ProductRecord>,

    #[serde(default)]
    similar: Vec<(String, String)>,
}

/// Product graph kept entirely in memory
#[derive(Debug, Default)]
pub struct CatalogGraph {
    /// Products in insertion order
    products: Vec<ProductRecord>,

    /// Product id -> position in `products`
    index: HashMap<String, usize>,

    /// Position -> linked positions, both directions recorded
    similar: HashMap<usize, Vec<usize>>,
}

impl CatalogGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        let mut graph = Self::new();

        for product in snapshot.products {
            graph.add_product(product)?;
        }
        for (a, b) in &snapshot.similar {
            graph.link_similar(a, b)?;
        }

        Ok(graph)
    }

    /// Load a JSON snapshot from disk
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| AppError::Configuration {
            message: format!("Failed to read catalog {}: {}", path.display(), e),
        })?;

        let graph = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            products = graph.len(),
            "Catalog graph loaded"
        );
        Ok(graph)
    }

    /// Add a product; ids must be unique and non-empty
    pub fn add_product(&mut self, product: ProductRecord) -> Result<()> {
        if product.id.is_empty() {
            return Err(AppError::Validation {
                message: format!("product {:?} has no id", product.name),
                field: Some("id".to_string()),
            });
        }
        if self.index.contains_key(&product.id) {
            return Err(AppError::Validation {
                message: format!("duplicate product id {}", product.id),
                field: Some("id".to_string()),
            });
        }

        self.index.insert(product.id.clone(), self.products.len());
        self.products.push(product);
        Ok(())
    }

    /// Link two products as similar; the link is undirected
    pub fn link_similar(&mut self, a: &str, b: &str) -> Result<()> {
        let pa = self.position(a)?;
        let pb = self.position(b)?;

        if pa == pb {
            return Ok(());
        }

        let forward = self.similar.entry(pa).or_default();
        if !forward.contains(&pb) {
            forward.push(pb);
        }
        let backward = self.similar.entry(pb).or_default();
        if !backward.contains(&pa) {
            backward.push(pa);
        }
        Ok(())
    }

    /// Get product count
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ProductRecord> {
        self.index.get(id).map(|&pos| &self.products[pos])
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| AppError::ProductNotFound { id: id.to_string() })
    }

    fn resolve(&self, name: &str) -> Option<&ProductRecord> {
        self.products
            .iter()
            .find(|p| p.is_in_stock() && p.name_contains(name))
    }

    fn by_price(mut products: Vec<ProductRecord>, limit: usize) -> Vec<ProductRecord> {
        // stable, so equal prices keep catalog order
        products.sort_by(|a, b| a.price.total_cmp(&b.price));
        products.truncate(limit);
        products
    }
}

#[async_trait]
impl GraphReasoningPort for CatalogGraph {
    async fn find_product_by_name(&self, name: &str) -> Result<Option<ProductRecord>> {
        Ok(self.resolve(name).cloned())
    }

    async fn find_similar_products(&self, name: &str, limit: usize) -> Result<Vec<ProductRecord>> {
        let mut seen = HashSet::new();

        let similar = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.name_contains(name))
            .flat_map(|(pos, _)| self.similar.get(&pos).into_iter().flatten())
            .filter(|&&neighbour| self.products[neighbour].is_in_stock())
            .filter(|&&neighbour| seen.insert(neighbour))
            .take(limit)
            .map(|&neighbour| self.products[neighbour].clone())
            .collect();

        Ok(similar)
    }

    async fn find_cheaper_alternatives(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<ProductRecord>> {
        let Some(reference) = self.resolve(name) else {
            tracing::debug!(name = name, "Reference product not found");
            return Ok(Vec::new());
        };

        let cheaper = self
            .products
            .iter()
            .filter(|p| p.is_in_stock() && p.price < reference.price)
            .cloned()
            .collect();

        Ok(Self::by_price(cheaper, limit))
    }

    async fn compare_products(&self, name1: &str, name2: &str) -> Result<ComparisonResult> {
        match (self.resolve(name1), self.resolve(name2)) {
            (Some(p1), Some(p2)) => Ok(ComparisonResult::between(p1.view(), p2.view())),
            _ => Ok(ComparisonResult::unresolved(name1, name2)),
        }
    }

    async fn find_by_category(&self, category: &str, limit: usize) -> Result<Vec<ProductRecord>> {
        let needle = category.to_lowercase();

        let matching = self
            .products
            .iter()
            .filter(|p| p.is_in_stock())
            .filter(|p| p.categories.iter().any(|c| c.to_lowercase().contains(&needle)))
            .cloned()
            .collect();

        Ok(Self::by_price(matching, limit))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

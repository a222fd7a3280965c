//! Qdrant vector adapter
//!
//! Points carry the catalog document as payload:
//! `page_content` ("name — brand — price — categories") and a `metadata`
//! struct with `sku`, `price`, `category` (comma separated) and
//! `stock_status`.

use crate::ports::VectorSearchPort;
use async_trait::async_trait;
use qdrant_client::qdrant::{
    value::Kind, Condition, Filter, Query, QueryPointsBuilder, ScoredPoint, Value,
};
use qdrant_client::Qdrant;
use shopscout_common::catalog::{ProductRecord, StockStatus, IN_STOCK};
use shopscout_common::config::VectorConfig;
use shopscout_common::embeddings::Embedder;
use shopscout_common::errors::{AppError, Result};
use std::collections::HashMap;
use std::sync::Arc;

const CONTENT_SEPARATOR: &str = " — ";

/// Semantic product search over a Qdrant collection
pub struct QdrantVectorSearch {
    client: Qdrant,
    collection: String,
    stock_key: String,
    embedder: Arc<dyn Embedder>,
}

impl QdrantVectorSearch {
    pub fn new(config: &VectorConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let mut builder = Qdrant::from_url(&config.url);
        if let Some(api_key) = &config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder.build().map_err(|e| AppError::VectorBackend {
            message: format!("Failed to create Qdrant client: {}", e),
        })?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
            stock_key: config.stock_payload_key.clone(),
            embedder,
        })
    }
}

#[async_trait]
impl VectorSearchPort for QdrantVectorSearch {
    async fn semantic_search(&self, query: &str, k: usize) -> Result<Vec<ProductRecord>> {
        let vector = self.embedder.embed(query).await?;

        let request = QueryPointsBuilder::new(self.collection.clone())
            .query(Query::new_nearest(vector))
            .filter(Filter::must([Condition::matches(
                self.stock_key.clone(),
                IN_STOCK.to_string(),
            )]))
            .with_payload(true)
            .limit(k as u64);

        let response = self
            .client
            .query(request)
            .await
            .map_err(|e| AppError::VectorBackend {
                message: e.to_string(),
            })?;

        let products: Vec<ProductRecord> = response
            .result
            .iter()
            .filter_map(product_from_point)
            .filter(|p| p.is_in_stock())
            .take(k)
            .collect();

        tracing::debug!(
            collection = %self.collection,
            hits = response.result.len(),
            products = products.len(),
            "Semantic search completed"
        );
        Ok(products)
    }

    fn backend_name(&self) -> &'static str {
        "qdrant"
    }
}

fn product_from_point(point: &ScoredPoint) -> Option<ProductRecord> {
    product_from_payload(&point.payload)
}

fn product_from_payload(payload: &HashMap<String, Value>) -> Option<ProductRecord> {
    let metadata = match payload.get("metadata").and_then(|v| v.kind.as_ref()) {
        Some(Kind::StructValue(s)) => &s.fields,
        _ => payload,
    };

    let content = payload_string(payload, "page_content");
    let name = payload_string(metadata, "name").or_else(|| {
        content
            .as_deref()
            .and_then(|c| c.split(CONTENT_SEPARATOR).next())
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
    })?;

    let id = payload_string(metadata, "sku")
        .or_else(|| payload_number(metadata, "sku").map(|n| format!("{}", n as i64)))
        .unwrap_or_default();

    let price = payload_number(metadata, "price").unwrap_or(0.0);

    let categories = payload_string(metadata, "category")
        .map(|joined| {
            joined
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let stock = payload_string(metadata, "stock_status").unwrap_or_default();

    Some(
        ProductRecord::new(id, name, price)
            .with_categories(categories)
            .with_stock_status(StockStatus::from(stock)),
    )
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
    match payload.get(key)?.kind.as_ref()? {
        Kind::StringValue(text) => Some(text.to_string()),
        Kind::IntegerValue(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers may arrive as strings ("45.00") depending on the ingest source
fn payload_number(payload: &HashMap<String, Value>, key: &str) -> Option<f64> {
    match payload.get(key)?.kind.as_ref()? {
        Kind::DoubleValue(n) => Some(*n),
        Kind::IntegerValue(n) => Some(*n as f64),
        Kind::StringValue(text) => text.trim().parse().ok(),
        _ => None,
    }
}

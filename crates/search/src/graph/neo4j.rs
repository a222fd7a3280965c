//! Neo4j graph adapter
//!
//! Speaks the HTTP transactional endpoint (`/db/{database}/tx/commit`).
//! Products are `Producto` nodes, categories are `Categoria` nodes reached
//! through `PERTENECE_A`, and `SIMILAR_A` links are matched in either
//! direction.

use crate::ports::GraphReasoningPort;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use shopscout_common::catalog::{ComparisonResult, ProductRecord, StockStatus};
use shopscout_common::config::GraphConfig;
use shopscout_common::errors::{AppError, Result};
use std::time::Duration;

const FIND_BY_NAME: &str = "\
MATCH (p:Producto)
WHERE toLower(p.name) CONTAINS toLower($name)
  AND p.stock_status = 'instock'
RETURN {id: p.id, name: p.name, price: p.price, stock_status: p.stock_status} AS product
LIMIT 1";

const FIND_SIMILAR: &str = "\
MATCH (p1:Producto)-[:SIMILAR_A]-(p2:Producto)
WHERE toLower(p1.name) CONTAINS toLower($name)
  AND p2.stock_status = 'instock'
WITH DISTINCT p2
RETURN {id: p2.id, name: p2.name, price: p2.price, stock_status: p2.stock_status} AS product
LIMIT $limit";

const FIND_CHEAPER: &str = "\
MATCH (p:Producto)
WHERE p.price < $reference_price
  AND p.stock_status = 'instock'
RETURN {id: p.id, name: p.name, price: p.price, stock_status: p.stock_status} AS product
ORDER BY p.price ASC
LIMIT $limit";

const CATEGORIES_OF: &str = "\
MATCH (p:Producto {id: $product_id})-[:PERTENECE_A]->(c:Categoria)
RETURN c.name AS category";

const FIND_BY_CATEGORY: &str = "\
MATCH (p:Producto)-[:PERTENECE_A]->(c:Categoria)
WHERE toLower(c.name) CONTAINS toLower($category)
  AND p.stock_status = 'instock'
WITH DISTINCT p
RETURN {id: p.id, name: p.name, price: p.price, stock_status: p.stock_status} AS product
ORDER BY p.price ASC
LIMIT $limit";

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

/// Product map as returned by the Cypher statements above
#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(default)]
    id: Value,
    name: Option<String>,
    #[serde(default)]
    price: Value,
    stock_status: Option<String>,
}

impl ProductRow {
    fn into_record(self) -> Option<ProductRecord> {
        let name = self.name?;
        let price = number_of(&self.price)?;
        let record = ProductRecord::new(text_of(&self.id).unwrap_or_default(), name, price)
            .with_stock_status(StockStatus::from(self.stock_status.unwrap_or_default()));
        Some(record)
    }
}

/// Ids are numeric in the store and strings here; only an id that
/// survives the round trip ("42" but not "007") is sent as a number.
fn store_id(id: &str) -> Value {
    match id.parse::<i64>() {
        Ok(n) if n.to_string() == id => Value::from(n),
        _ => Value::from(id),
    }
}

/// Graph reasoning over a Neo4j server
pub struct Neo4jGraph {
    client: reqwest::Client,
    endpoint: String,
    user: String,
    password: Option<String>,
}

impl Neo4jGraph {
    pub fn new(config: &GraphConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        let endpoint = format!(
            "{}/db/{}/tx/commit",
            config.url.trim_end_matches('/'),
            config.database
        );

        Ok(Self {
            client,
            endpoint,
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// Run one auto-committed statement and return its rows
    async fn run(&self, statement: &str, parameters: Value) -> Result<Vec<Vec<Value>>> {
        tracing::debug!(
            statement = statement.lines().next().unwrap_or_default(),
            parameters = %parameters,
            "Running Cypher statement"
        );

        let body = json!({
            "statements": [{ "statement": statement, "parameters": parameters }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.user, self.password.as_ref())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GraphBackend {
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GraphBackend {
                message: format!("Neo4j returned {}: {}", status, body),
            });
        }

        let tx: TxResponse = response.json().await.map_err(|e| AppError::GraphBackend {
            message: format!("Failed to parse response: {}", e),
        })?;

        if let Some(error) = tx.errors.into_iter().next() {
            return Err(AppError::GraphBackend {
                message: format!("{}: {}", error.code, error.message),
            });
        }

        let rows: Vec<Vec<Value>> = tx
            .results
            .into_iter()
            .flat_map(|r| r.data)
            .map(|d| d.row)
            .collect();

        tracing::debug!(rows = rows.len(), "Cypher statement completed");
        Ok(rows)
    }

    async fn products(&self, statement: &str, parameters: Value) -> Result<Vec<ProductRecord>> {
        let rows = self.run(statement, parameters).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .filter_map(|value| serde_json::from_value::<ProductRow>(value).ok())
            .filter_map(ProductRow::into_record)
            .collect())
    }

    async fn categories_of(&self, product: &ProductRecord) -> Result<Vec<String>> {
        let product_id = store_id(&product.id);
        let rows = self.run(CATEGORIES_OF, json!({ "product_id": product_id })).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect())
    }
}

#[async_trait]
impl GraphReasoningPort for Neo4jGraph {
    async fn find_product_by_name(&self, name: &str) -> Result<Option<ProductRecord>> {
        let found = self
            .products(FIND_BY_NAME, json!({ "name": name }))
            .await?
            .into_iter()
            .next();

        if found.is_none() {
            tracing::debug!(name = name, "Product not found");
        }
        Ok(found)
    }

    async fn find_similar_products(&self, name: &str, limit: usize) -> Result<Vec<ProductRecord>> {
        self.products(FIND_SIMILAR, json!({ "name": name, "limit": limit }))
            .await
    }

    async fn find_cheaper_alternatives(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<ProductRecord>> {
        let Some(reference) = self.find_product_by_name(name).await? else {
            return Ok(Vec::new());
        };

        tracing::debug!(reference = %reference.name, price = reference.price, "Reference price resolved");

        self.products(
            FIND_CHEAPER,
            json!({ "reference_price": reference.price, "limit": limit }),
        )
        .await
    }

    async fn compare_products(&self, name1: &str, name2: &str) -> Result<ComparisonResult> {
        let p1 = self.find_product_by_name(name1).await?;
        let p2 = self.find_product_by_name(name2).await?;

        let (Some(p1), Some(p2)) = (p1, p2) else {
            return Ok(ComparisonResult::unresolved(name1, name2));
        };

        let categories1 = self.categories_of(&p1).await?;
        let categories2 = self.categories_of(&p2).await?;

        Ok(ComparisonResult::between(
            p1.with_categories(categories1).view(),
            p2.with_categories(categories2).view(),
        ))
    }

    async fn find_by_category(&self, category: &str, limit: usize) -> Result<Vec<ProductRecord>> {
        self.products(FIND_BY_CATEGORY, json!({ "category": category, "limit": limit }))
            .await
    }

    fn backend_name(&self) -> &'static str {
        "neo4j"
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let config = GraphConfig {
            url: "http://neo4j:7474/".to_string(),
            database: "catalog".to_string(),
            ..GraphConfig::default()
        };
        let graph = Neo4jGraph::new(&config).unwrap();
        assert_eq!(graph.endpoint, "http://neo4j:7474/db/catalog/tx/commit");
        assert_eq!(graph.backend_name(), "neo4j");
    }

    #[test]
    fn test_store_id_keeps_padded_ids_as_text() {
        assert_eq!(store_id("42"), json!(42));
        assert_eq!(store_id("007"), json!("007"));
        assert_eq!(store_id("+5"), json!("+5"));
        assert_eq!(store_id("sku-9"), json!("sku-9"));
    }

    #[test]
    fn test_product_row_accepts_loose_types() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": 9,
            "name": "Bracelet 9",
            "price": "45.50",
            "stock_status": "instock"
        }))
        .unwrap();

        let record = row.into_record().unwrap();
        assert_eq!(record.id, "9");
        assert_eq!(record.price, 45.5);
        assert!(record.is_in_stock());
    }

    #[test]
    fn test_product_row_without_price_is_dropped() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": "9",
            "name": "Bracelet 9",
            "price": null,
            "stock_status": null
        }))
        .unwrap();
        assert!(row.into_record().is_none());
    }

    #[test]
    fn test_transaction_errors_parse() {
        let tx: TxResponse = serde_json::from_value(json!({
            "results": [],
            "errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "bad"}]
        }))
        .unwrap();
        assert_eq!(tx.errors[0].code, "Neo.ClientError.Statement.SyntaxError");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_backend_error() {
        let config = GraphConfig {
            url: "http://127.0.0.1:9".to_string(),
            connect_timeout_secs: 1,
            ..GraphConfig::default()
        };
        let graph = Neo4jGraph::new(&config).unwrap();

        let err = graph.find_product_by_name("runner").await.unwrap_err();
        assert!(matches!(err, AppError::GraphBackend { .. }));
    }
}

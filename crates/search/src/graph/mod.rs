//! Graph reasoning backends

mod memory;
mod neo4j;

pub use memory::CatalogGraph;
pub use neo4j::Neo4jGraph;

use crate::ports::GraphReasoningPort;
use shopscout_common::config::GraphConfig;
use shopscout_common::errors::{AppError, Result};
use std::sync::Arc;

/// Build the configured graph backend, `None` when disabled
pub async fn from_config(config: &GraphConfig) -> Result<Option<Arc<dyn GraphReasoningPort>>> {
    match config.backend.as_str() {
        "neo4j" => {
            tracing::info!(url = %config.url, database = %config.database, "Using Neo4j graph backend");
            Ok(Some(Arc::new(Neo4jGraph::new(config)?)))
        }
        "memory" => {
            let path = config.catalog_path.as_deref().ok_or_else(|| AppError::Configuration {
                message: "graph.catalog_path is required for the memory backend".to_string(),
            })?;
            Ok(Some(Arc::new(CatalogGraph::load_from_file(path).await?)))
        }
        "none" => {
            tracing::warn!("Graph backend disabled");
            Ok(None)
        }
        other => Err(AppError::Configuration {
            message: format!("Unknown graph backend: {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_backend() {
        let config = GraphConfig {
            backend: "none".to_string(),
            ..GraphConfig::default()
        };
        assert!(from_config(&config).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_backend_needs_catalog_path() {
        let config = GraphConfig {
            backend: "memory".to_string(),
            ..GraphConfig::default()
        };
        assert!(from_config(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_backend() {
        let config = GraphConfig {
            backend: "janusgraph".to_string(),
            ..GraphConfig::default()
        };
        assert!(from_config(&config).await.is_err());
    }
}

//! Vector search backends

mod qdrant;

pub use qdrant::QdrantVectorSearch;

use crate::ports::VectorSearchPort;
use shopscout_common::config::{EmbeddingConfig, VectorConfig};
use shopscout_common::embeddings::create_embedder;
use shopscout_common::errors::Result;
use std::sync::Arc;

/// Build the configured vector backend, `None` when disabled
pub fn from_config(
    vector: &VectorConfig,
    embedding: &EmbeddingConfig,
) -> Result<Option<Arc<dyn VectorSearchPort>>> {
    if !vector.enabled {
        tracing::warn!("Vector backend disabled");
        return Ok(None);
    }

    let embedder = create_embedder(embedding)?;
    tracing::info!(
        url = %vector.url,
        collection = %vector.collection,
        model = embedder.model_name(),
        "Using Qdrant vector backend"
    );

    Ok(Some(Arc::new(QdrantVectorSearch::new(vector, embedder)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_backend() {
        let config = VectorConfig {
            enabled: false,
            ..VectorConfig::default()
        };
        let port = from_config(&config, &EmbeddingConfig::default()).unwrap();
        assert!(port.is_none());
    }

    #[test]
    fn test_embedding_errors_surface() {
        let embedding = EmbeddingConfig {
            provider: "openai".to_string(),
            api_key: None,
            ..EmbeddingConfig::default()
        };
        assert!(from_config(&VectorConfig::default(), &embedding).is_err());
    }
}

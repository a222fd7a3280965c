//! Configuration management for ShopScout services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Query planning and execution limits
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Graph reasoning backend
    #[serde(default)]
    pub graph: GraphConfig,

    /// Vector search backend
    #[serde(default)]
    pub vector: VectorConfig,

    /// Query embedding provider
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannerConfig {
    /// Upper bound for a single port call in milliseconds
    #[serde(default = "default_port_timeout_ms")]
    pub port_timeout_ms: u64,

    /// Neighbours returned for similarity queries
    #[serde(default = "default_similar_limit")]
    pub similar_limit: usize,

    /// Alternatives returned for price comparison queries
    #[serde(default = "default_cheaper_limit")]
    pub cheaper_limit: usize,

    /// Products returned for recommendation queries
    #[serde(default = "default_category_limit")]
    pub category_limit: usize,

    /// Semantic hits requested from the vector store
    #[serde(default = "default_vector_k")]
    pub vector_k: usize,

    /// Cap applied after graph and vector results are merged
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    /// Backend kind: neo4j, memory, none
    #[serde(default = "default_graph_backend")]
    pub backend: String,

    /// Neo4j HTTP endpoint (e.g. http://localhost:7474)
    #[serde(default = "default_graph_url")]
    pub url: String,

    /// Neo4j database name
    #[serde(default = "default_graph_database")]
    pub database: String,

    /// Neo4j user
    #[serde(default = "default_graph_user")]
    pub user: String,

    /// Neo4j password
    pub password: Option<String>,

    /// JSON catalog snapshot for the in-memory backend
    pub catalog_path: Option<String>,

    /// HTTP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VectorConfig {
    /// Enable the Qdrant vector store
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Qdrant URL (gRPC port)
    #[serde(default = "default_vector_url")]
    pub url: String,

    /// Qdrant API key
    pub api_key: Option<String>,

    /// Collection holding the embedded catalog
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Payload key filtered to in-stock products
    #[serde(default = "default_stock_key")]
    pub stock_payload_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Embedding provider: openai, ollama
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// API key for embedding service
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Model to use
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_request_timeout() -> u64 { 30 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_port_timeout_ms() -> u64 { 5000 }
fn default_similar_limit() -> usize { 5 }
fn default_cheaper_limit() -> usize { 5 }
fn default_category_limit() -> usize { 10 }
fn default_vector_k() -> usize { 5 }
fn default_max_results() -> usize { 10 }
fn default_graph_backend() -> String { "neo4j".to_string() }
fn default_graph_url() -> String { "http://localhost:7474".to_string() }
fn default_graph_database() -> String { "neo4j".to_string() }
fn default_graph_user() -> String { "neo4j".to_string() }
fn default_connect_timeout() -> u64 { 10 }
fn default_enabled() -> bool { true }
fn default_vector_url() -> String { "http://localhost:6334".to_string() }
fn default_collection() -> String { "catalog_kb".to_string() }
fn default_stock_key() -> String { "metadata.stock_status".to_string() }
fn default_embedding_provider() -> String { "ollama".to_string() }
fn default_embedding_model() -> String { "nomic-embed-text".to_string() }
fn default_embedding_timeout() -> u64 { 30 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_port() -> u16 { 9090 }
fn default_service_name() -> String { "shopscout".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__GRAPH__URL=http://neo4j:7474
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

impl PlannerConfig {
    /// Get the per-call port timeout as Duration
    pub fn port_timeout(&self) -> Duration {
        Duration::from_millis(self.port_timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            planner: PlannerConfig::default(),
            graph: GraphConfig::default(),
            vector: VectorConfig::default(),
            embedding: EmbeddingConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            port_timeout_ms: default_port_timeout_ms(),
            similar_limit: default_similar_limit(),
            cheaper_limit: default_cheaper_limit(),
            category_limit: default_category_limit(),
            vector_k: default_vector_k(),
            max_results: default_max_results(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            backend: default_graph_backend(),
            url: default_graph_url(),
            database: default_graph_database(),
            user: default_graph_user(),
            password: None,
            catalog_path: None,
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: default_vector_url(),
            api_key: None,
            collection: default_collection(),
            stock_payload_key: default_stock_key(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            api_key: None,
            api_base: None,
            model: default_embedding_model(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: default_metrics_port(),
            service_name: default_service_name(),
        }
    }
}

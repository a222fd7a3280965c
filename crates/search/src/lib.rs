//! ShopScout Search
//!
//! Executes query plans against the product graph and the vector index:
//! - Backend port contracts and their adapters (in-memory, Neo4j, Qdrant)
//! - Concurrent plan execution with per-call timeouts
//! - Result combination and text rendering
//! - The `DeepSearch` pipeline tying planning to execution

pub mod combiner;
pub mod executor;
pub mod formatter;
pub mod graph;
pub mod pipeline;
pub mod ports;
pub mod vector;

pub use combiner::{QueryOutcome, ResultCombiner};
pub use executor::{BranchOutcome, ExecutionReport, ExecutorConfig, GraphAnswer, PlanExecutor};
pub use formatter::{ResultFormatter, NO_RESULTS_MESSAGE};
pub use graph::{CatalogGraph, Neo4jGraph};
pub use pipeline::{DeepSearch, SearchAnswer};
pub use ports::{GraphReasoningPort, VectorSearchPort};
pub use vector::QdrantVectorSearch;

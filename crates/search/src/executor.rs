//! Plan execution
//!
//! Dispatches a plan to the graph and vector ports:
//! - Both branches run concurrently and are joined before combination
//! - Every port call is bounded by the configured timeout
//! - Failures and timeouts degrade the branch, never the whole query
//!
//! Dropping the future returned by `execute` cancels both in-flight calls.

use crate::ports::{GraphReasoningPort, VectorSearchPort};
use shopscout_common::catalog::{ComparisonResult, ProductRecord};
use shopscout_common::config::PlannerConfig;
use shopscout_common::errors::{AppError, Result};
use shopscout_common::metrics::record_port_call;
use shopscout_common::planner::{IntentParameters, QueryPlan};
use std::future::Future;
use std::time::{Duration, Instant};

/// Limits and timeout applied while executing a plan
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub similar_limit: usize,
    pub cheaper_limit: usize,
    pub category_limit: usize,
    pub vector_k: usize,
    pub port_timeout: Duration,
}

impl From<&PlannerConfig> for ExecutorConfig {
    fn from(config: &PlannerConfig) -> Self {
        Self {
            similar_limit: config.similar_limit,
            cheaper_limit: config.cheaper_limit,
            category_limit: config.category_limit,
            vector_k: config.vector_k,
            port_timeout: config.port_timeout(),
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::from(&PlannerConfig::default())
    }
}

/// What happened to one branch of a plan
#[derive(Debug, Clone, PartialEq)]
pub enum BranchOutcome<T> {
    /// The plan does not use this backend
    Skipped,
    /// The backend is not configured
    Unavailable,
    /// The call succeeded with nothing to show
    Empty,
    Success(T),
    /// The call failed, or the plan lacked the arguments it needs
    Failed { reason: String },
    TimedOut { after: Duration },
}

impl<T> BranchOutcome<T> {
    pub fn label(&self) -> &'static str {
        match self {
            BranchOutcome::Skipped => "skipped",
            BranchOutcome::Unavailable => "unavailable",
            BranchOutcome::Empty => "empty",
            BranchOutcome::Success(_) => "success",
            BranchOutcome::Failed { .. } => "failed",
            BranchOutcome::TimedOut { .. } => "timeout",
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            BranchOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            BranchOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// True when the backend was asked and could not answer
    pub fn is_degraded(&self) -> bool {
        matches!(self, BranchOutcome::Failed { .. } | BranchOutcome::TimedOut { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BranchOutcome<U> {
        match self {
            BranchOutcome::Skipped => BranchOutcome::Skipped,
            BranchOutcome::Unavailable => BranchOutcome::Unavailable,
            BranchOutcome::Empty => BranchOutcome::Empty,
            BranchOutcome::Success(value) => BranchOutcome::Success(f(value)),
            BranchOutcome::Failed { reason } => BranchOutcome::Failed { reason },
            BranchOutcome::TimedOut { after } => BranchOutcome::TimedOut { after },
        }
    }
}

/// Graph branch result
#[derive(Debug, Clone, PartialEq)]
pub enum GraphAnswer {
    Products(Vec<ProductRecord>),
    Comparison(ComparisonResult),
}

/// Outcome of executing one plan
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub graph: BranchOutcome<GraphAnswer>,
    pub vector: BranchOutcome<Vec<ProductRecord>>,
    pub elapsed: Duration,
}

trait BranchValue {
    fn is_empty_value(&self) -> bool;
}

impl BranchValue for Vec<ProductRecord> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl BranchValue for ComparisonResult {
    fn is_empty_value(&self) -> bool {
        false
    }
}

/// Runs plans against the configured ports
#[derive(Debug, Clone, Default)]
pub struct PlanExecutor {
    config: ExecutorConfig,
}

impl PlanExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute `plan`; an absent port leaves its branch `Unavailable`
    pub async fn execute(
        &self,
        plan: &QueryPlan,
        graph: Option<&dyn GraphReasoningPort>,
        vector: Option<&dyn VectorSearchPort>,
    ) -> ExecutionReport {
        let start = Instant::now();

        let (graph, vector) = tokio::join!(
            self.run_graph(plan, graph),
            self.run_vector(plan, vector)
        );

        let report = ExecutionReport {
            graph,
            vector,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            intent = %plan.intent(),
            graph = report.graph.label(),
            vector = report.vector.label(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Plan executed"
        );

        report
    }

    async fn run_graph(
        &self,
        plan: &QueryPlan,
        port: Option<&dyn GraphReasoningPort>,
    ) -> BranchOutcome<GraphAnswer> {
        if !plan.use_graph() {
            return BranchOutcome::Skipped;
        }
        let Some(port) = port else {
            tracing::debug!(intent = %plan.intent(), "Graph backend not configured");
            return BranchOutcome::Unavailable;
        };

        let target = &plan.parameters().target;
        if target.intent() != plan.intent() {
            let reason = format!("no {} parameters could be extracted", plan.intent());
            tracing::warn!(intent = %plan.intent(), "Graph branch skipped: {}", reason);
            return BranchOutcome::Failed { reason };
        }

        let backend = port.backend_name();
        match target {
            IntentParameters::Similarity { reference_product } => self
                .call(
                    backend,
                    "find_similar_products",
                    port.find_similar_products(reference_product, self.config.similar_limit),
                )
                .await
                .map(GraphAnswer::Products),
            IntentParameters::PriceComparison { reference_product } => self
                .call(
                    backend,
                    "find_cheaper_alternatives",
                    port.find_cheaper_alternatives(reference_product, self.config.cheaper_limit),
                )
                .await
                .map(GraphAnswer::Products),
            IntentParameters::Comparison { product1, product2 } => self
                .call(backend, "compare_products", port.compare_products(product1, product2))
                .await
                .map(GraphAnswer::Comparison),
            IntentParameters::Recommendation { use_case } => self
                .call(
                    backend,
                    "find_by_category",
                    port.find_by_category(use_case, self.config.category_limit),
                )
                .await
                .map(GraphAnswer::Products),
            IntentParameters::Simple => BranchOutcome::Skipped,
        }
    }

    async fn run_vector(
        &self,
        plan: &QueryPlan,
        port: Option<&dyn VectorSearchPort>,
    ) -> BranchOutcome<Vec<ProductRecord>> {
        if !plan.use_vector() {
            return BranchOutcome::Skipped;
        }
        let Some(port) = port else {
            tracing::debug!(intent = %plan.intent(), "Vector backend not configured");
            return BranchOutcome::Unavailable;
        };

        self.call(
            port.backend_name(),
            "semantic_search",
            port.semantic_search(plan.query(), self.config.vector_k),
        )
        .await
    }

    /// Await one port call under the timeout and classify its outcome
    async fn call<T, F>(&self, port: &str, operation: &str, fut: F) -> BranchOutcome<T>
    where
        T: BranchValue,
        F: Future<Output = Result<T>>,
    {
        let start = Instant::now();

        let result = tokio::time::timeout(self.config.port_timeout, fut)
            .await
            .unwrap_or_else(|_| {
                Err(AppError::Timeout {
                    operation: operation.to_string(),
                    timeout_ms: self.config.port_timeout.as_millis() as u64,
                })
            });

        let outcome = match result {
            Ok(value) if value.is_empty_value() => BranchOutcome::Empty,
            Ok(value) => BranchOutcome::Success(value),
            Err(AppError::Timeout {
                operation,
                timeout_ms,
            }) => {
                tracing::warn!(
                    port = port,
                    operation = %operation,
                    timeout_ms = timeout_ms,
                    "Port call timed out"
                );
                BranchOutcome::TimedOut {
                    after: Duration::from_millis(timeout_ms),
                }
            }
            Err(e) => {
                tracing::warn!(port = port, operation = operation, error = %e, "Port call failed");
                BranchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        record_port_call(port, operation, outcome.label(), start.elapsed().as_secs_f64());
        outcome
    }
}

//! Deep search pipeline
//!
//! plan → execute → combine → format. The host builds one `DeepSearch` at
//! startup with whichever ports it could construct and shares it across
//! requests; nothing here holds per-query state.

use crate::combiner::{QueryOutcome, ResultCombiner};
use crate::executor::{ExecutionReport, PlanExecutor};
use crate::formatter::ResultFormatter;
use crate::ports::{GraphReasoningPort, VectorSearchPort};
use shopscout_common::config::PlannerConfig;
use shopscout_common::metrics::record_query;
use shopscout_common::planner::{PlanBuilder, QueryPlan};
use std::sync::Arc;
use std::time::Instant;

/// Everything produced while answering one query
#[derive(Debug, Clone)]
pub struct SearchAnswer {
    pub plan: QueryPlan,
    pub outcome: QueryOutcome,
    pub text: String,
    pub report: ExecutionReport,
}

pub struct DeepSearch {
    builder: PlanBuilder,
    executor: PlanExecutor,
    combiner: ResultCombiner,
    formatter: ResultFormatter,
    graph: Option<Arc<dyn GraphReasoningPort>>,
    vector: Option<Arc<dyn VectorSearchPort>>,
}

impl DeepSearch {
    /// Pipeline without backends; attach them with `with_graph`/`with_vector`
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            builder: PlanBuilder::default(),
            executor: PlanExecutor::new(config.into()),
            combiner: ResultCombiner::new(config.max_results),
            formatter: ResultFormatter::new(),
            graph: None,
            vector: None,
        }
    }

    pub fn with_graph(mut self, graph: Arc<dyn GraphReasoningPort>) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn with_vector(mut self, vector: Arc<dyn VectorSearchPort>) -> Self {
        self.vector = Some(vector);
        self
    }

    /// Name of the configured graph backend
    pub fn graph_backend(&self) -> Option<&'static str> {
        self.graph.as_ref().map(|g| g.backend_name())
    }

    /// Name of the configured vector backend
    pub fn vector_backend(&self) -> Option<&'static str> {
        self.vector.as_ref().map(|v| v.backend_name())
    }

    /// Build the plan for a query without executing it
    pub fn plan(&self, query: &str) -> QueryPlan {
        self.builder.build_plan(query)
    }

    pub fn should_activate_deep_reasoning(&self, query: &str) -> bool {
        self.builder.classifier().should_activate_deep_reasoning(query)
    }

    /// Answer a query end to end
    pub async fn answer(&self, query: &str) -> SearchAnswer {
        let start = Instant::now();
        let plan = self.plan(query);

        tracing::info!(
            intent = %plan.intent(),
            use_graph = plan.use_graph(),
            use_vector = plan.use_vector(),
            "Query planned"
        );
        for step in plan.steps() {
            tracing::debug!(step = %step, "Plan step");
        }

        let report = self
            .executor
            .execute(&plan, self.graph.as_deref(), self.vector.as_deref())
            .await;

        if report.graph.is_degraded() || report.vector.is_degraded() {
            tracing::warn!(
                graph = report.graph.label(),
                vector = report.vector.label(),
                "Answering with a degraded backend"
            );
        }

        let outcome = self.combiner.resolve(report.clone());
        let text = self.formatter.format(&outcome, plan.intent());

        record_query(
            start.elapsed().as_secs_f64(),
            plan.intent().as_str(),
            outcome.product_count(),
        );

        SearchAnswer {
            plan,
            outcome,
            text,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::{catalog, StaticVector};
    use crate::formatter::NO_RESULTS_MESSAGE;
    use shopscout_common::catalog::ProductRecord;
    use shopscout_common::planner::QueryIntent;

    fn pipeline() -> DeepSearch {
        DeepSearch::new(&PlannerConfig::default())
            .with_graph(Arc::new(catalog()))
            .with_vector(Arc::new(StaticVector(vec![
                ProductRecord::new("2", "City Walker", 80.0),
                ProductRecord::new("42", "Trail Sandal", 60.0),
            ])))
    }

    #[tokio::test]
    async fn test_price_comparison_end_to_end() {
        let answer = pipeline().answer("cheaper alternatives to bracelet 9").await;

        assert_eq!(answer.plan.intent(), QueryIntent::PriceComparison);
        assert!(answer.plan.use_graph());
        assert!(!answer.plan.use_vector());
        assert_eq!(answer.text, "1. **Bracelet 10** - USD 30.00 (Stock: instock)");
    }

    #[tokio::test]
    async fn test_comparison_renders_template() {
        let answer = pipeline().answer("compare Runner Pro vs City Walker").await;

        assert!(answer.text.starts_with("**Product comparison:**"));
        assert!(answer.text.ends_with("**Cheaper option:** City Walker"));
        match &answer.outcome {
            QueryOutcome::Comparison { supplement, .. } => assert_eq!(supplement.len(), 2),
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unresolved_comparison_message() {
        let answer = pipeline().answer("compare SneakerA vs SneakerB").await;
        assert_eq!(
            answer.text,
            "Could not find one or both products: sneakera, sneakerb"
        );
    }

    #[tokio::test]
    async fn test_recommendation_merges_graph_then_vector() {
        let answer = pipeline().answer("best for running").await;

        let QueryOutcome::Products { products } = &answer.outcome else {
            panic!("expected products");
        };
        let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "42"]);
    }

    #[tokio::test]
    async fn test_no_backends_still_answers() {
        let search = DeepSearch::new(&PlannerConfig::default());
        let answer = search.answer("leather bracelets").await;

        assert_eq!(answer.text, NO_RESULTS_MESSAGE);
        assert_eq!(search.graph_backend(), None);
    }

    #[test]
    fn test_plan_only() {
        let search = pipeline();
        assert!(search.should_activate_deep_reasoning("similar to the leather bracelet"));
        assert!(!search.should_activate_deep_reasoning("leather bracelets"));
        assert_eq!(search.graph_backend(), Some("memory"));
        assert_eq!(search.vector_backend(), Some("static"));
    }
}

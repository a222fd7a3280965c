//! Result combination
//!
//! Merges graph and vector products into one list. Graph results come first
//! and win on duplicate ids; records without an id are never treated as
//! duplicates. Comparisons skip the merge and are carried through as-is.

use crate::executor::{ExecutionReport, GraphAnswer};
use serde::Serialize;
use shopscout_common::catalog::{ComparisonResult, ProductRecord};
use std::collections::HashSet;

/// Default cap on combined results
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Final answer before rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    Products {
        products: Vec<ProductRecord>,
    },
    Comparison {
        result: ComparisonResult,
        /// Semantic matches fetched alongside the comparison
        supplement: Vec<ProductRecord>,
    },
}

impl QueryOutcome {
    /// Products in the answer; a resolved comparison counts both sides
    pub fn product_count(&self) -> usize {
        match self {
            QueryOutcome::Products { products } => products.len(),
            QueryOutcome::Comparison { result, .. } => usize::from(result.is_resolved()) * 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultCombiner {
    max_results: usize,
}

impl Default for ResultCombiner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

impl ResultCombiner {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    /// Concatenate, deduplicate by id and truncate
    pub fn combine(&self, graph: Vec<ProductRecord>, vector: Vec<ProductRecord>) -> Vec<ProductRecord> {
        let mut seen = HashSet::new();

        graph
            .into_iter()
            .chain(vector)
            .filter(|p| p.id.is_empty() || seen.insert(p.id.clone()))
            .take(self.max_results)
            .collect()
    }

    /// Turn an execution report into the outcome to render
    pub fn resolve(&self, report: ExecutionReport) -> QueryOutcome {
        let vector = report.vector.into_value().unwrap_or_default();

        match report.graph.into_value() {
            Some(GraphAnswer::Comparison(result)) => QueryOutcome::Comparison {
                result,
                supplement: vector,
            },
            Some(GraphAnswer::Products(graph)) => QueryOutcome::Products {
                products: self.combine(graph, vector),
            },
            None => QueryOutcome::Products {
                products: self.combine(Vec::new(), vector),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::BranchOutcome;
    use std::time::Duration;

    fn product(id: &str) -> ProductRecord {
        ProductRecord::new(id, format!("Product {}", id), 10.0)
    }

    fn ids(products: &[ProductRecord]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_combine_deduplicates_preserving_order() {
        let combined = ResultCombiner::default().combine(
            vec![product("1"), product("2")],
            vec![product("2"), product("3")],
        );
        assert_eq!(ids(&combined), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_graph_entry_wins_on_duplicate() {
        let graph = vec![ProductRecord::new("2", "From graph", 50.0)];
        let vector = vec![ProductRecord::new("2", "From vector", 55.0)];

        let combined = ResultCombiner::default().combine(graph, vector);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].name, "From graph");
    }

    #[test]
    fn test_combine_caps_at_ten_graph_first() {
        let graph: Vec<_> = (1..=7).map(|i| product(&i.to_string())).collect();
        let vector: Vec<_> = (100..=107).map(|i| product(&i.to_string())).collect();

        let combined = ResultCombiner::default().combine(graph, vector);
        assert_eq!(combined.len(), 10);
        assert_eq!(ids(&combined[..7]), vec!["1", "2", "3", "4", "5", "6", "7"]);
        assert_eq!(ids(&combined[7..]), vec!["100", "101", "102"]);
    }

    #[test]
    fn test_records_without_id_are_all_kept() {
        let combined = ResultCombiner::default().combine(
            vec![ProductRecord::new("", "Anonymous A", 1.0)],
            vec![ProductRecord::new("", "Anonymous B", 2.0)],
        );
        assert_eq!(combined.len(), 2);
    }

    #[test]
    fn test_resolve_keeps_comparison_apart() {
        let report = ExecutionReport {
            graph: BranchOutcome::Success(GraphAnswer::Comparison(ComparisonResult::unresolved(
                "a", "b",
            ))),
            vector: BranchOutcome::Success(vec![product("1")]),
            elapsed: Duration::ZERO,
        };

        match ResultCombiner::default().resolve(report) {
            QueryOutcome::Comparison { result, supplement } => {
                assert!(!result.is_resolved());
                assert_eq!(ids(&supplement), vec!["1"]);
            }
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_degraded_graph_falls_back_to_vector() {
        let report = ExecutionReport {
            graph: BranchOutcome::TimedOut {
                after: Duration::from_millis(5),
            },
            vector: BranchOutcome::Success(vec![product("3")]),
            elapsed: Duration::ZERO,
        };

        let outcome = ResultCombiner::default().resolve(report);
        assert_eq!(
            outcome,
            QueryOutcome::Products {
                products: vec![product("3")]
            }
        );
    }
}

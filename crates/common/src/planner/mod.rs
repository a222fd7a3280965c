//! Query Planner Core Components
//!
//! The planner is the decision layer in front of the backends:
//! - Pattern catalog shared by classification and extraction
//! - Intent classification
//! - Typed parameter extraction
//! - Execution plan construction

mod patterns;
mod classifier;
mod extractor;
mod plan;

pub use patterns::{CaptureRole, PatternCatalog, PatternRule, RuleMatch, BUILTIN_RULES};
pub use classifier::QueryClassifier;
pub use extractor::{ExtractedParameters, IntentParameters, ParameterExtractor};
pub use plan::{PlanBuilder, QueryPlan};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified purpose of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// Plain product lookup, answered by semantic search alone
    Simple,
    /// Side-by-side comparison of two named products
    Comparison,
    /// Products interchangeable with a reference product
    Similarity,
    /// Products cheaper than a reference product
    PriceComparison,
    /// Best products for a use case
    Recommendation,
}

impl QueryIntent {
    /// Pattern groups in the order they are tried
    pub const PRIORITY: [QueryIntent; 4] = [
        QueryIntent::Comparison,
        QueryIntent::Similarity,
        QueryIntent::PriceComparison,
        QueryIntent::Recommendation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryIntent::Simple => "simple",
            QueryIntent::Comparison => "comparison",
            QueryIntent::Similarity => "similarity",
            QueryIntent::PriceComparison => "price_comparison",
            QueryIntent::Recommendation => "recommendation",
        }
    }

    /// Whether the graph store takes part in answering this intent
    pub fn uses_graph(&self) -> bool {
        !matches!(self, QueryIntent::Simple)
    }

    /// Whether the vector store takes part in answering this intent
    pub fn uses_vector(&self) -> bool {
        matches!(
            self,
            QueryIntent::Simple | QueryIntent::Comparison | QueryIntent::Recommendation
        )
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_flags_per_intent() {
        assert!(!QueryIntent::Simple.uses_graph());
        assert!(QueryIntent::Simple.uses_vector());

        for intent in QueryIntent::PRIORITY {
            assert!(intent.uses_graph(), "{} must use the graph", intent);
        }

        assert!(QueryIntent::Comparison.uses_vector());
        assert!(QueryIntent::Recommendation.uses_vector());
        assert!(!QueryIntent::Similarity.uses_vector());
        assert!(!QueryIntent::PriceComparison.uses_vector());
    }

    #[test]
    fn test_intent_wire_names() {
        let json = serde_json::to_string(&QueryIntent::PriceComparison).unwrap();
        assert_eq!(json, "\"price_comparison\"");
        assert_eq!(QueryIntent::PriceComparison.to_string(), "price_comparison");
    }
}

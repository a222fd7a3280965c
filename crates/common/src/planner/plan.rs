//! Execution plans
//!
//! A plan is an immutable record of what a query will touch. The step list
//! is narrative for logs and API callers; execution reads only the intent,
//! the backend flags and the parameters.

use super::classifier::QueryClassifier;
use super::extractor::{ExtractedParameters, IntentParameters, ParameterExtractor};
use super::QueryIntent;
use serde::Serialize;

/// Immutable execution plan for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    query: String,
    steps: Vec<String>,
    use_graph: bool,
    use_vector: bool,
    intent: QueryIntent,
    parameters: ExtractedParameters,
}

impl QueryPlan {
    /// Raw query text, as received
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn use_graph(&self) -> bool {
        self.use_graph
    }

    pub fn use_vector(&self) -> bool {
        self.use_vector
    }

    pub fn intent(&self) -> QueryIntent {
        self.intent
    }

    pub fn parameters(&self) -> &ExtractedParameters {
        &self.parameters
    }
}

/// Builds plans from raw queries
#[derive(Clone, Copy, Default)]
pub struct PlanBuilder {
    classifier: QueryClassifier,
    extractor: ParameterExtractor,
}

impl PlanBuilder {
    pub fn new(classifier: QueryClassifier, extractor: ParameterExtractor) -> Self {
        Self {
            classifier,
            extractor,
        }
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }

    /// Classify, extract and lay out the plan
    pub fn build_plan(&self, query: &str) -> QueryPlan {
        let intent = self.classifier.classify(query);
        let parameters = self.extractor.extract(query, intent);
        let steps = describe_steps(intent, &parameters.target);

        QueryPlan {
            query: query.to_string(),
            steps,
            use_graph: intent.uses_graph(),
            use_vector: intent.uses_vector(),
            intent,
            parameters,
        }
    }
}

fn describe_steps(intent: QueryIntent, target: &IntentParameters) -> Vec<String> {
    let (product1, product2) = match target {
        IntentParameters::Comparison { product1, product2 } => (product1.as_str(), product2.as_str()),
        _ => ("", ""),
    };
    let reference = target.reference_product().unwrap_or("");
    let use_case = match target {
        IntentParameters::Recommendation { use_case } => use_case.as_str(),
        _ => "",
    };

    let steps: Vec<String> = match intent {
        QueryIntent::Simple => vec![
            "1. Search the vector store for relevant products (in-stock only)".to_string(),
            "2. Return the top results".to_string(),
        ],
        QueryIntent::Comparison => vec![
            format!("1. Look up '{}' and '{}' in the product graph", product1, product2),
            "2. Collect comparable attributes (price, categories, stock)".to_string(),
            "3. Build a structured comparison".to_string(),
            "4. Supplement with semantic matches from the vector store".to_string(),
        ],
        QueryIntent::Similarity => vec![
            format!("1. Identify the reference product: '{}'", reference),
            "2. Query the product graph for similar-to neighbours".to_string(),
            "3. Keep in-stock products only".to_string(),
            "4. Return the deduplicated neighbours".to_string(),
        ],
        QueryIntent::PriceComparison => vec![
            format!("1. Identify the reference product: '{}'", reference),
            "2. Query the product graph for lower-priced products".to_string(),
            "3. Keep in-stock products only".to_string(),
            "4. Return the cheaper alternatives, lowest price first".to_string(),
        ],
        QueryIntent::Recommendation => vec![
            format!("1. Analyse the use case: '{}'", use_case),
            "2. Find products in matching categories in the product graph".to_string(),
            "3. Complement with semantic search in the vector store".to_string(),
            "4. Consolidate the recommendations".to_string(),
        ],
    };

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cheaper_alternatives_plan() {
        let plan = PlanBuilder::default().build_plan("cheaper alternatives to bracelet 9");

        assert_eq!(plan.intent(), QueryIntent::PriceComparison);
        assert!(plan.use_graph());
        assert!(!plan.use_vector());
        assert_eq!(plan.parameters().target.reference_product(), Some("bracelet 9"));
        assert_eq!(plan.query(), "cheaper alternatives to bracelet 9");
    }

    #[test]
    fn test_backend_flags_follow_intent() {
        let builder = PlanBuilder::default();
        let queries = [
            "leather bracelets",
            "compare sneakera vs sneakerb",
            "similar to the leather bracelet",
            "cheaper than the runner pro",
            "best for running",
        ];

        for query in queries {
            let plan = builder.build_plan(query);
            assert_eq!(plan.use_graph(), plan.intent() != QueryIntent::Simple, "{}", query);
            assert_eq!(plan.use_vector(), plan.intent().uses_vector(), "{}", query);
        }
    }

    #[test]
    fn test_steps_name_the_extracted_arguments() {
        let builder = PlanBuilder::default();

        let plan = builder.build_plan("compare SneakerA vs SneakerB");
        assert_eq!(plan.steps().len(), 4);
        assert!(plan.steps()[0].contains("'sneakera' and 'sneakerb'"));

        let plan = builder.build_plan("leather bracelets");
        assert_eq!(plan.steps().len(), 2);
    }

    #[test]
    fn test_plan_serializes_for_api_callers() {
        let plan = PlanBuilder::default().build_plan("best for running under 100");
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["intent"], "recommendation");
        assert_eq!(json["use_graph"], true);
        assert_eq!(json["parameters"]["use_case"], "running under 100");
        assert_eq!(json["parameters"]["max_price"], 100.0);
    }
}

//! Intent classification over the pattern catalog

use super::patterns::PatternCatalog;
use super::QueryIntent;

/// Decides the intent of a free-text query
#[derive(Clone, Copy)]
pub struct QueryClassifier {
    catalog: &'static PatternCatalog,
}

impl QueryClassifier {
    pub fn new(catalog: &'static PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Intent of the first matching rule, `Simple` when nothing matches
    pub fn classify(&self, query: &str) -> QueryIntent {
        let normalized = PatternCatalog::normalize(query);

        let intent = self
            .catalog
            .first_match(&normalized)
            .map(|m| m.intent)
            .unwrap_or(QueryIntent::Simple);

        tracing::debug!(intent = %intent, "Query classified");
        intent
    }

    /// True when the query needs more than a plain semantic lookup
    pub fn should_activate_deep_reasoning(&self, query: &str) -> bool {
        self.classify(query) != QueryIntent::Simple
    }
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(PatternCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &[(&str, QueryIntent)] = &[
        ("compare SneakerA vs SneakerB", QueryIntent::Comparison),
        ("Compare the Runner Pro with the City Walker", QueryIntent::Comparison),
        ("differences between model x and model y", QueryIntent::Comparison),
        ("Which is better: trail boots or hiking sandals?", QueryIntent::Comparison),
        ("similar to the leather bracelet", QueryIntent::Similarity),
        ("show me something like the Runner Pro", QueryIntent::Similarity),
        ("alternatives to the silver ring", QueryIntent::Similarity),
        ("products like the runner pro but cheaper", QueryIntent::Similarity),
        ("what are the alternatives to the silver ring", QueryIntent::Similarity),
        ("show alternatives to the silver ring", QueryIntent::Similarity),
        ("are there alternatives to bracelet 9?", QueryIntent::Similarity),
        ("boots like the Runner Pro", QueryIntent::Similarity),
        ("sandals like the City Walker but cheaper", QueryIntent::Similarity),
        ("I want a bag like the leather tote", QueryIntent::Similarity),
        ("I'd like something like the Runner Pro", QueryIntent::Similarity),
        ("cheaper than the Runner Pro", QueryIntent::PriceComparison),
        ("anything less expensive than bracelet 9", QueryIntent::PriceComparison),
        ("better price than the city walker", QueryIntent::PriceComparison),
        ("cheaper alternatives to bracelet 9", QueryIntent::PriceComparison),
        ("are there any rings cheaper than the silver ring?", QueryIntent::PriceComparison),
        ("do you have cheaper alternatives to the Runner Pro", QueryIntent::PriceComparison),
        ("best for running", QueryIntent::Recommendation),
        ("shoes recommended for hiking", QueryIntent::Recommendation),
        ("ideal for a beach wedding", QueryIntent::Recommendation),
        ("leather bracelets", QueryIntent::Simple),
        ("red sneakers size 42 under $80", QueryIntent::Simple),
        ("I'd like a gift", QueryIntent::Simple),
        ("we would like running shoes", QueryIntent::Simple),
        ("unlike anything else", QueryIntent::Simple),
        ("", QueryIntent::Simple),
    ];

    #[test]
    fn test_classify_corpus() {
        let classifier = QueryClassifier::default();
        for (query, expected) in CORPUS {
            assert_eq!(classifier.classify(query), *expected, "query: {:?}", query);
        }
    }

    #[test]
    fn test_deep_reasoning_follows_classification() {
        let classifier = QueryClassifier::default();
        for (query, _) in CORPUS {
            assert_eq!(
                classifier.should_activate_deep_reasoning(query),
                classifier.classify(query) != QueryIntent::Simple,
                "query: {:?}",
                query
            );
        }
    }

    #[test]
    fn test_classification_ignores_case() {
        let classifier = QueryClassifier::default();
        assert_eq!(
            classifier.classify("COMPARE SNEAKERA VS SNEAKERB"),
            QueryIntent::Comparison
        );
        assert_eq!(classifier.classify("  Best For Running  "), QueryIntent::Recommendation);
    }
}

//! Parameter Extraction
//!
//! Turns a classified query into typed arguments:
//! - Per-intent targets taken from the rule that matched the intent
//! - Leading determiners stripped from reference products
//! - Size and price ceiling picked up from any query

use super::patterns::{CaptureRole, PatternCatalog, RuleMatch};
use super::QueryIntent;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DETERMINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:the|a|an|some|any|this|that|these|those|my)\s+")
        .expect("determiner pattern is valid")
});

static SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bsize\s+(\d+(?:\.\d+)?)").expect("size pattern is valid")
});

static PRICE_CEILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:under|below|less\s+than|up\s+to)\s+(?:usd\s*|\$\s*)?(\d+)")
        .expect("price ceiling pattern is valid")
});

/// Intent-specific arguments, one variant per intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum IntentParameters {
    Simple,
    Comparison { product1: String, product2: String },
    Similarity { reference_product: String },
    PriceComparison { reference_product: String },
    Recommendation { use_case: String },
}

impl IntentParameters {
    /// Intent these parameters were extracted for
    pub fn intent(&self) -> QueryIntent {
        match self {
            IntentParameters::Simple => QueryIntent::Simple,
            IntentParameters::Comparison { .. } => QueryIntent::Comparison,
            IntentParameters::Similarity { .. } => QueryIntent::Similarity,
            IntentParameters::PriceComparison { .. } => QueryIntent::PriceComparison,
            IntentParameters::Recommendation { .. } => QueryIntent::Recommendation,
        }
    }

    pub fn reference_product(&self) -> Option<&str> {
        match self {
            IntentParameters::Similarity { reference_product }
            | IntentParameters::PriceComparison { reference_product } => {
                Some(reference_product)
            }
            _ => None,
        }
    }

    fn from_match(m: &RuleMatch) -> Option<Self> {
        let take = |role| m.capture(role).map(str::to_string);

        let params = match m.intent {
            QueryIntent::Simple => IntentParameters::Simple,
            QueryIntent::Comparison => IntentParameters::Comparison {
                product1: take(CaptureRole::Product1)?,
                product2: take(CaptureRole::Product2)?,
            },
            QueryIntent::Similarity => IntentParameters::Similarity {
                reference_product: strip_determiner(m.capture(CaptureRole::ReferenceProduct)?),
            },
            QueryIntent::PriceComparison => IntentParameters::PriceComparison {
                reference_product: strip_determiner(m.capture(CaptureRole::ReferenceProduct)?),
            },
            QueryIntent::Recommendation => IntentParameters::Recommendation {
                use_case: take(CaptureRole::UseCase)?,
            },
        };

        Some(params)
    }
}

/// Everything pulled out of one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedParameters {
    #[serde(flatten)]
    pub target: IntentParameters,

    /// Requested size, kept as written ("42", "9.5")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Price ceiling in store currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl ExtractedParameters {
    pub fn empty() -> Self {
        Self {
            target: IntentParameters::Simple,
            size: None,
            max_price: None,
        }
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }
}

/// Extracts typed arguments with the same rules the classifier used
#[derive(Clone, Copy)]
pub struct ParameterExtractor {
    catalog: &'static PatternCatalog,
}

impl ParameterExtractor {
    pub fn new(catalog: &'static PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Extract parameters for `intent`.
    ///
    /// The target comes from the first rule of the intent's own group. When
    /// that group has no match the target stays `Simple`. Size and price
    /// ceiling are scanned for regardless of intent.
    pub fn extract(&self, query: &str, intent: QueryIntent) -> ExtractedParameters {
        let normalized = PatternCatalog::normalize(query);

        let target = match intent {
            QueryIntent::Simple => IntentParameters::Simple,
            _ => self
                .catalog
                .first_match_in(intent, &normalized)
                .and_then(|m| IntentParameters::from_match(&m))
                .unwrap_or(IntentParameters::Simple),
        };

        let size = SIZE
            .captures(&normalized)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let max_price = PRICE_CEILING
            .captures(&normalized)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());

        ExtractedParameters {
            target,
            size,
            max_price,
        }
    }
}

impl Default for ParameterExtractor {
    fn default() -> Self {
        Self::new(PatternCatalog::builtin())
    }
}

/// Drop one leading article or quantifier
fn strip_determiner(product: &str) -> String {
    match DETERMINER.find(product) {
        Some(m) => product[m.end()..].to_string(),
        None => product.to_string(),
    }
}

//! Pattern Catalog - Declarative intent rules
//!
//! Each rule binds a regular pattern to an intent and names the role of every
//! capture group. Classification and extraction both walk this one catalog, so
//! the rule that decided an intent is the same rule that yields its arguments.

use super::QueryIntent;
use crate::errors::{AppError, Result};
use regex_lite::Regex;
use std::sync::LazyLock;

/// What a capture group holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRole {
    /// Left-hand product of a comparison
    Product1,
    /// Right-hand product of a comparison
    Product2,
    /// Product a similarity or price query is anchored on
    ReferenceProduct,
    /// Free-text use case of a recommendation
    UseCase,
}

/// Declarative rule: pattern text plus capture roles
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub intent: QueryIntent,
    pub pattern: &'static str,
    pub roles: &'static [CaptureRole],

    /// Rejects a match when it matches the text right before it. The rule
    /// is then retried further along the query.
    pub veto: Option<&'static str>,
}

const PAIR: &[CaptureRole] = &[CaptureRole::Product1, CaptureRole::Product2];
const REFERENCE: &[CaptureRole] = &[CaptureRole::ReferenceProduct];
const USE_CASE: &[CaptureRole] = &[CaptureRole::UseCase];

/// "cheaper alternatives to x" belongs to the price group
const CHEAPER_BEFORE: &str = r"\bcheaper\s+$";

/// "i'd like x" is a request, not a resemblance
const WANTING_BEFORE: &str = r"(?:\b(?:i|we|you|they)(?:'d|’d)?|\bwould)\s+$";

// Captures start on a non-space, non-terminal character so a trimmed capture
// is never empty.
/// Shipped English rules, in declaration order within each intent
pub const BUILTIN_RULES: &[PatternRule] = &[
    // Comparison
    PatternRule {
        intent: QueryIntent::Comparison,
        pattern: r"compar(?:e|ing)?\s+([^\s?!.].*?)\s+(?:vs\.?|versus|with|and)\s+([^\s?!.].*)",
        roles: PAIR,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::Comparison,
        pattern: r"differences?\s+between\s+([^\s?!.].*?)\s+and\s+([^\s?!.].*)",
        roles: PAIR,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::Comparison,
        pattern: r"which\s+is\s+better[,:]?\s+([^\s?!.].*?)\s+or\s+([^\s?!.].*)",
        roles: PAIR,
        veto: None,
    },
    // Similarity
    PatternRule {
        intent: QueryIntent::Similarity,
        pattern: r"similar\s+to\s+([^\s?!.].*)",
        roles: REFERENCE,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::Similarity,
        pattern: r"\balternatives?\s+(?:to|for)\s+([^\s?!.].*)",
        roles: REFERENCE,
        veto: Some(CHEAPER_BEFORE),
    },
    PatternRule {
        intent: QueryIntent::Similarity,
        pattern: r"\blike\s+([^\s?!.].*?)\s+but\b",
        roles: REFERENCE,
        veto: Some(WANTING_BEFORE),
    },
    PatternRule {
        intent: QueryIntent::Similarity,
        pattern: r"\blike\s+([^\s?!.].*)",
        roles: REFERENCE,
        veto: Some(WANTING_BEFORE),
    },
    // Price comparison
    PatternRule {
        intent: QueryIntent::PriceComparison,
        pattern: r"cheaper\s+than\s+([^\s?!.].*)",
        roles: REFERENCE,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::PriceComparison,
        pattern: r"less\s+expensive\s+than\s+([^\s?!.].*)",
        roles: REFERENCE,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::PriceComparison,
        pattern: r"more\s+affordable\s+than\s+([^\s?!.].*)",
        roles: REFERENCE,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::PriceComparison,
        pattern: r"better\s+price\s+than\s+([^\s?!.].*)",
        roles: REFERENCE,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::PriceComparison,
        pattern: r"cheaper\s+(?:alternatives?|options?|versions?)\s+(?:to|than|for|of)\s+([^\s?!.].*)",
        roles: REFERENCE,
        veto: None,
    },
    // Recommendation
    PatternRule {
        intent: QueryIntent::Recommendation,
        pattern: r"best\s+for\s+([^\s?!.].*)",
        roles: USE_CASE,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::Recommendation,
        pattern: r"recommend(?:ed|ations?)?\s+for\s+([^\s?!.].*)",
        roles: USE_CASE,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::Recommendation,
        pattern: r"ideal\s+for\s+([^\s?!.].*)",
        roles: USE_CASE,
        veto: None,
    },
    PatternRule {
        intent: QueryIntent::Recommendation,
        pattern: r"perfect\s+for\s+([^\s?!.].*)",
        roles: USE_CASE,
        veto: None,
    },
];

static BUILTIN: LazyLock<PatternCatalog> = LazyLock::new(|| {
    PatternCatalog::compile(BUILTIN_RULES).expect("builtin pattern catalog is valid")
});

struct CompiledRule {
    regex: Regex,
    roles: &'static [CaptureRole],
    veto: Option<Regex>,
}

impl CompiledRule {
    /// Leftmost match whose preceding text the veto leaves alone
    fn captures<'t>(&self, text: &'t str) -> Option<regex_lite::Captures<'t>> {
        let mut start = 0;
        loop {
            let caps = self.regex.captures_at(text, start)?;
            let whole = caps.get(0)?;

            match &self.veto {
                Some(veto) if veto.is_match(&text[..whole.start()]) => {
                    let step = text[whole.start()..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    start = whole.start() + step;
                }
                _ => return Some(caps),
            }
        }
    }
}

/// A successful rule match with its cleaned captures
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub intent: QueryIntent,

    /// Position of the rule within its intent group
    pub rule_index: usize,

    pub captures: Vec<(CaptureRole, String)>,
}

impl RuleMatch {
    pub fn capture(&self, role: CaptureRole) -> Option<&str> {
        self.captures
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, text)| text.as_str())
    }
}

/// Compiled rules grouped by intent, groups kept in priority order
pub struct PatternCatalog {
    groups: Vec<(QueryIntent, Vec<CompiledRule>)>,
}

impl PatternCatalog {
    /// Compile a rule list; groups follow `QueryIntent::PRIORITY`
    pub fn compile(rules: &[PatternRule]) -> Result<Self> {
        let mut groups: Vec<(QueryIntent, Vec<CompiledRule>)> = QueryIntent::PRIORITY
            .iter()
            .map(|intent| (*intent, Vec::new()))
            .collect();

        for rule in rules {
            let regex = compile_pattern(rule.pattern)?;
            let veto = rule.veto.map(compile_pattern).transpose()?;

            let groups_in_pattern = regex.captures_len() - 1;
            if groups_in_pattern != rule.roles.len() {
                return Err(AppError::Configuration {
                    message: format!(
                        "pattern {:?} has {} capture groups but {} roles",
                        rule.pattern,
                        groups_in_pattern,
                        rule.roles.len()
                    ),
                });
            }

            let group = groups
                .iter_mut()
                .find(|(intent, _)| *intent == rule.intent)
                .ok_or_else(|| AppError::Configuration {
                    message: format!("no pattern group for intent {}", rule.intent),
                })?;

            group.1.push(CompiledRule {
                regex,
                roles: rule.roles,
                veto,
            });
        }

        Ok(Self { groups })
    }

    /// The shipped catalog, compiled once per process
    pub fn builtin() -> &'static PatternCatalog {
        &BUILTIN
    }

    /// Normalization applied before any rule is evaluated
    pub fn normalize(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// First match of the first matching group, in priority order
    pub fn first_match(&self, normalized: &str) -> Option<RuleMatch> {
        self.groups
            .iter()
            .find_map(|(intent, rules)| Self::match_group(*intent, rules, normalized))
    }

    /// First match within one intent's group
    pub fn first_match_in(&self, intent: QueryIntent, normalized: &str) -> Option<RuleMatch> {
        self.groups
            .iter()
            .find(|(group_intent, _)| *group_intent == intent)
            .and_then(|(_, rules)| Self::match_group(intent, rules, normalized))
    }

    /// Number of rules declared for an intent
    pub fn rule_count(&self, intent: QueryIntent) -> usize {
        self.groups
            .iter()
            .find(|(group_intent, _)| *group_intent == intent)
            .map(|(_, rules)| rules.len())
            .unwrap_or(0)
    }

    fn match_group(intent: QueryIntent, rules: &[CompiledRule], text: &str) -> Option<RuleMatch> {
        rules.iter().enumerate().find_map(|(rule_index, rule)| {
            let caps = rule.captures(text)?;
            let captures = rule
                .roles
                .iter()
                .enumerate()
                .filter_map(|(i, role)| {
                    caps.get(i + 1).map(|m| (*role, clean_capture(m.as_str())))
                })
                .collect();

            Some(RuleMatch {
                intent,
                rule_index,
                captures,
            })
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| AppError::Configuration {
        message: format!("invalid pattern {:?}: {}", pattern, e),
    })
}

/// Trim whitespace and sentence punctuation off a capture
fn clean_capture(text: &str) -> String {
    text.trim()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '?' | '!' | '.'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> &'static PatternCatalog {
        PatternCatalog::builtin()
    }

    #[test]
    fn test_builtin_catalog_has_every_group() {
        for intent in QueryIntent::PRIORITY {
            assert!(catalog().rule_count(intent) >= 3, "{} has too few rules", intent);
        }
        assert_eq!(catalog().rule_count(QueryIntent::Simple), 0);
    }

    #[test]
    fn test_comparison_captures_both_sides() {
        let m = catalog().first_match("compare sneakera vs sneakerb").unwrap();
        assert_eq!(m.intent, QueryIntent::Comparison);
        assert_eq!(m.capture(CaptureRole::Product1), Some("sneakera"));
        assert_eq!(m.capture(CaptureRole::Product2), Some("sneakerb"));
    }

    #[test]
    fn test_trailing_question_mark_is_dropped() {
        let m = catalog()
            .first_match("which is better the runner or the walker?")
            .unwrap();
        assert_eq!(m.intent, QueryIntent::Comparison);
        assert_eq!(m.rule_index, 2);
        assert_eq!(m.capture(CaptureRole::Product2), Some("the walker"));
    }

    #[test]
    fn test_group_priority_beats_declaration_order() {
        // "better" reads as comparison before it can read as price
        let m = catalog()
            .first_match("which is better price than x or y")
            .unwrap();
        assert_eq!(m.intent, QueryIntent::Comparison);
    }

    #[test]
    fn test_cheaper_alternatives_is_a_price_query() {
        let m = catalog()
            .first_match("cheaper alternatives to bracelet 9")
            .unwrap();
        assert_eq!(m.intent, QueryIntent::PriceComparison);
        assert_eq!(m.capture(CaptureRole::ReferenceProduct), Some("bracelet 9"));
    }

    #[test]
    fn test_like_but_prefers_the_shorter_capture() {
        let m = catalog()
            .first_match("something like the runner pro but in blue")
            .unwrap();
        assert_eq!(m.intent, QueryIntent::Similarity);
        assert_eq!(m.capture(CaptureRole::ReferenceProduct), Some("the runner pro"));
    }

    #[test]
    fn test_similarity_anywhere_in_the_sentence() {
        let cases = [
            ("what are the alternatives to the silver ring", "the silver ring"),
            ("are there alternatives to bracelet 9?", "bracelet 9"),
            ("boots like the runner pro", "the runner pro"),
            ("sandals like the city walker but cheaper", "the city walker"),
            ("i want a bag like the leather tote", "the leather tote"),
        ];
        for (text, reference) in cases {
            let m = catalog().first_match(text).unwrap();
            assert_eq!(m.intent, QueryIntent::Similarity, "query: {:?}", text);
            assert_eq!(m.capture(CaptureRole::ReferenceProduct), Some(reference));
        }
    }

    #[test]
    fn test_veto_moves_on_to_a_later_match() {
        let m = catalog()
            .first_match("i'd like something like the runner pro")
            .unwrap();
        assert_eq!(m.intent, QueryIntent::Similarity);
        assert_eq!(m.capture(CaptureRole::ReferenceProduct), Some("the runner pro"));
    }

    #[test]
    fn test_vetoed_rule_falls_through_to_price_group() {
        let m = catalog()
            .first_match("are there any cheaper alternatives to the runner pro")
            .unwrap();
        assert_eq!(m.intent, QueryIntent::PriceComparison);
        assert_eq!(m.capture(CaptureRole::ReferenceProduct), Some("the runner pro"));
    }

    #[test]
    fn test_compile_rejects_bad_veto() {
        let rules = [PatternRule {
            intent: QueryIntent::Similarity,
            pattern: r"similar\s+to\s+(.+)",
            roles: REFERENCE,
            veto: Some(r"(unclosed"),
        }];
        assert!(PatternCatalog::compile(&rules).is_err());
    }

    #[test]
    fn test_first_match_in_restricts_to_one_group() {
        let text = "compare sneakera vs sneakerb";
        assert!(catalog().first_match_in(QueryIntent::Similarity, text).is_none());
        assert!(catalog().first_match_in(QueryIntent::Comparison, text).is_some());
    }

    #[test]
    fn test_no_match_for_plain_lookup() {
        assert!(catalog().first_match("leather bracelets").is_none());
        assert!(catalog().first_match("i'd like leather bracelets").is_none());
    }

    #[test]
    fn test_compile_rejects_role_mismatch() {
        let rules = [PatternRule {
            intent: QueryIntent::Similarity,
            pattern: r"similar\s+to\s+(.+)",
            roles: PAIR,
            veto: None,
        }];
        let err = PatternCatalog::compile(&rules).err().unwrap();
        assert!(err.to_string().contains("capture groups"));
    }

    #[test]
    fn test_compile_rejects_simple_intent_rules() {
        let rules = [PatternRule {
            intent: QueryIntent::Simple,
            pattern: r"(.+)",
            roles: USE_CASE,
            veto: None,
        }];
        assert!(PatternCatalog::compile(&rules).is_err());
    }
}

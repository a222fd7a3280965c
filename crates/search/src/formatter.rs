//! Text rendering of query outcomes
//!
//! Both templates are read verbatim by callers, so their layout is fixed.

use crate::combiner::QueryOutcome;
use shopscout_common::catalog::{ComparisonResult, ProductComparison, ProductView};
use shopscout_common::planner::QueryIntent;

/// Rendered when there is nothing to show
pub const NO_RESULTS_MESSAGE: &str = "No products were found matching the criteria.";

const MAX_LINES: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct ResultFormatter;

impl ResultFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Render an outcome; always yields a displayable string
    pub fn format(&self, outcome: &QueryOutcome, intent: QueryIntent) -> String {
        match outcome {
            QueryOutcome::Products { products } if products.is_empty() => {
                NO_RESULTS_MESSAGE.to_string()
            }
            QueryOutcome::Products { products } => Self::numbered(
                products
                    .iter()
                    .map(|p| (p.name.as_str(), p.price, p.stock_status.as_str())),
            ),
            QueryOutcome::Comparison { result, .. } => self.format_comparison(result, intent),
        }
    }

    pub fn format_comparison(&self, result: &ComparisonResult, intent: QueryIntent) -> String {
        match result {
            ComparisonResult::Unresolved { message } => message.clone(),
            ComparisonResult::Compared(cmp) if intent == QueryIntent::Comparison => {
                Self::comparison_block(cmp)
            }
            ComparisonResult::Compared(cmp) => Self::numbered(
                [&cmp.product1, &cmp.product2]
                    .into_iter()
                    .map(|v| (v.name.as_str(), v.price, v.stock_status.as_str())),
            ),
        }
    }

    fn numbered<'a>(lines: impl Iterator<Item = (&'a str, f64, &'a str)>) -> String {
        lines
            .take(MAX_LINES)
            .enumerate()
            .map(|(i, (name, price, stock))| {
                format!("{}. **{}** - USD {:.2} (Stock: {})", i + 1, name, price, stock)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn comparison_block(cmp: &ProductComparison) -> String {
        format!(
            "**Product comparison:**\n\n{}\n{}\n**Price difference:** USD {:.2}\n**Cheaper option:** {}",
            Self::view_block(&cmp.product1),
            Self::view_block(&cmp.product2),
            cmp.price_difference,
            cmp.cheaper
        )
    }

    fn view_block(view: &ProductView) -> String {
        format!(
            "**{}**\n- Price: USD {:.2}\n- Categories: {}\n- Stock: {}\n",
            view.name,
            view.price,
            view.categories.join(", "),
            view.stock_status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopscout_common::catalog::ProductRecord;

    fn products(products: Vec<ProductRecord>) -> QueryOutcome {
        QueryOutcome::Products { products }
    }

    #[test]
    fn test_empty_list_message() {
        let formatter = ResultFormatter::new();
        for intent in [QueryIntent::Simple, QueryIntent::Comparison, QueryIntent::Recommendation] {
            assert_eq!(
                formatter.format(&products(Vec::new()), intent),
                "No products were found matching the criteria."
            );
        }
    }

    #[test]
    fn test_numbered_list() {
        let text = ResultFormatter::new().format(
            &products(vec![
                ProductRecord::new("1", "Runner Pro", 100.0),
                ProductRecord::new("2", "City Walker", 79.5).with_stock_status("onbackorder"),
            ]),
            QueryIntent::Simple,
        );

        assert_eq!(
            text,
            "1. **Runner Pro** - USD 100.00 (Stock: instock)\n\
             2. **City Walker** - USD 79.50 (Stock: onbackorder)"
        );
    }

    #[test]
    fn test_list_is_capped() {
        let many = (0..15)
            .map(|i| ProductRecord::new(i.to_string(), format!("P{}", i), 1.0))
            .collect();
        let text = ResultFormatter::new().format(&products(many), QueryIntent::Simple);

        assert_eq!(text.lines().count(), 10);
        assert!(text.lines().last().unwrap().starts_with("10. "));
    }

    #[test]
    fn test_unresolved_comparison_is_verbatim() {
        let result = ComparisonResult::unresolved("sneakera", "sneakerb");
        let ComparisonResult::Unresolved { message } = &result else {
            unreachable!()
        };

        let outcome = QueryOutcome::Comparison {
            result: result.clone(),
            supplement: Vec::new(),
        };
        assert_eq!(
            &ResultFormatter::new().format(&outcome, QueryIntent::Comparison),
            message
        );
    }

    #[test]
    fn test_comparison_template() {
        let result = ComparisonResult::between(
            ProductRecord::new("1", "Runner Pro", 100.0)
                .with_categories(["Running", "Shoes"])
                .view(),
            ProductRecord::new("2", "City Walker", 80.0)
                .with_categories(["Shoes"])
                .view(),
        );

        let text = ResultFormatter::new().format_comparison(&result, QueryIntent::Comparison);
        let expected = "**Product comparison:**\n\n\
                        **Runner Pro**\n\
                        - Price: USD 100.00\n\
                        - Categories: Running, Shoes\n\
                        - Stock: instock\n\n\
                        **City Walker**\n\
                        - Price: USD 80.00\n\
                        - Categories: Shoes\n\
                        - Stock: instock\n\n\
                        **Price difference:** USD 20.00\n\
                        **Cheaper option:** City Walker";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_comparison_outside_comparison_intent_is_listed() {
        let result = ComparisonResult::between(
            ProductRecord::new("1", "Alpha", 10.0).view(),
            ProductRecord::new("2", "Beta", 12.0).view(),
        );

        let text = ResultFormatter::new().format_comparison(&result, QueryIntent::Simple);
        assert!(text.starts_with("1. **Alpha**"));
        assert_eq!(text.lines().count(), 2);
    }
}

//! Order tests
//!
//! Tests for order input handling:
//! - Totals and validation before any write
//! - Product name matching and item summaries

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    item_summary, order_total, product_name_key, validate_order_item, validate_order_total,
    OrderItemInput,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(name: &str, quantity: i32, price: &str) -> OrderItemInput {
    OrderItemInput {
        name: name.to_string(),
        quantity,
        price: dec(price),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Order payload as posted by the frontend
    #[test]
    fn test_order_items_deserialize() {
        let items: Vec<OrderItemInput> = serde_json::from_str(
            r#"[{"name":"Croissant","quantity":3,"price":2.5},{"name":"Baguette","quantity":1,"price":"3.00"}]"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(order_total(&items), Some(dec("10.50")));
    }

    /// Validation failures
    #[test]
    fn test_item_validation() {
        assert!(validate_order_item(&item("Croissant", 1, "2.50")).is_ok());
        assert!(validate_order_item(&item("  ", 1, "2.50")).is_err());
        assert!(validate_order_item(&item("Croissant", 0, "2.50")).is_err());
        assert!(validate_order_item(&item("Croissant", 1, "-1")).is_err());
        assert!(validate_order_total(dec("-0.01")).is_err());
        assert!(validate_order_total(Decimal::ZERO).is_ok());
    }

    /// Item summary used in order listings
    #[test]
    fn test_item_summary() {
        let lines = [item_summary("Croissant", 3), item_summary("Baguette", 1)];
        assert_eq!(lines.join(", "), "3x Croissant, 1x Baguette");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Name matching ignores case and surrounding whitespace
        #[test]
        fn prop_name_key_case_insensitive(
            name in name_strategy(),
            left in " {0,3}",
            right in " {0,3}"
        ) {
            let padded = format!("{}{}{}", left, name.to_uppercase(), right);
            prop_assert_eq!(product_name_key(&padded), product_name_key(&name));
        }

        /// Order total is the sum of line totals
        #[test]
        fn prop_order_total_sums_lines(
            lines in prop::collection::vec((1i32..50, 1i64..10000), 1..10)
        ) {
            let items: Vec<OrderItemInput> = lines
                .iter()
                .map(|(q, p)| OrderItemInput {
                    name: "Bread".to_string(),
                    quantity: *q,
                    price: Decimal::new(*p, 2),
                })
                .collect();

            let expected: Decimal = lines
                .iter()
                .map(|(q, p)| Decimal::new(*p, 2) * Decimal::from(*q))
                .sum();

            prop_assert_eq!(order_total(&items), Some(expected));
        }
    }
}

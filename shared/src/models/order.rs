//! Customer order models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product line on a submitted order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemInput {
    /// Product name, matched case-insensitively after trimming
    pub name: String,
    pub quantity: i32,
    /// Price per unit of product
    pub price: Decimal,
}

impl OrderItemInput {
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sum of `quantity × price` over the items; `None` on overflow
pub fn order_total(items: &[OrderItemInput]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.line_total()?))
}

/// Grams of an ingredient consumed by `ordered` units of a product; `None` on overflow
pub fn stock_deduction(quantity_needed: Decimal, ordered: i32) -> Option<Decimal> {
    quantity_needed.checked_mul(Decimal::from(ordered))
}

/// Lookup key for product names: trimmed and lowercased
pub fn product_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Human-readable line used in order listings, e.g. `3x Croissant`
pub fn item_summary(product_name: &str, quantity: i32) -> String {
    format!("{}x {}", quantity, product_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total() {
        let items = vec![
            OrderItemInput {
                name: "Croissant".to_string(),
                quantity: 3,
                price: Decimal::new(250, 2),
            },
            OrderItemInput {
                name: "Baguette".to_string(),
                quantity: 2,
                price: Decimal::new(400, 2),
            },
        ];
        assert_eq!(order_total(&items), Some(Decimal::new(1550, 2)));
        assert_eq!(order_total(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_order_total_overflow_is_none() {
        let item = OrderItemInput {
            name: "Wedding Cake".to_string(),
            quantity: 1000,
            price: Decimal::MAX,
        };
        assert_eq!(item.line_total(), None);
        assert_eq!(order_total(&[item]), None);
    }

    #[test]
    fn test_stock_deduction() {
        assert_eq!(stock_deduction(Decimal::from(50), 3), Some(Decimal::from(150)));
        assert_eq!(stock_deduction(Decimal::MAX, 2), None);
    }

    #[test]
    fn test_product_name_key() {
        assert_eq!(product_name_key("  Sourdough Loaf "), "sourdough loaf");
    }

    #[test]
    fn test_item_summary() {
        assert_eq!(item_summary("Croissant", 3), "3x Croissant");
    }
}

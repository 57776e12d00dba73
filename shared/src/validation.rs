//! Validation utilities for the Bakery Management Platform

use rust_decimal::Decimal;

use crate::models::OrderItemInput;

// ============================================================================
// Order Validations
// ============================================================================

/// Validate a single order line before any write happens
pub fn validate_order_item(item: &OrderItemInput) -> Result<(), &'static str> {
    if item.name.trim().is_empty() {
        return Err("Product name cannot be empty");
    }
    if item.quantity <= 0 {
        return Err("Quantity must be positive");
    }
    if item.price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate that a caller-supplied order total is usable
pub fn validate_order_total(total: Decimal) -> Result<(), &'static str> {
    if total < Decimal::ZERO {
        return Err("Total amount cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate a recipe line: grams of ingredient per unit of product
pub fn validate_recipe_quantity(quantity_needed: Decimal) -> Result<(), &'static str> {
    if quantity_needed <= Decimal::ZERO {
        return Err("Recipe quantity must be positive");
    }
    Ok(())
}

/// Validate a phone number: 7 to 15 digits, optional leading `+`, common separators
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let trimmed = phone.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
    {
        return Err("Phone number contains invalid characters");
    }
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();
    if !(7..=15).contains(&digits) {
        return Err("Phone number must have 7 to 15 digits");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i32, price: i64) -> OrderItemInput {
        OrderItemInput {
            name: name.to_string(),
            quantity,
            price: Decimal::from(price),
        }
    }

    #[test]
    fn test_order_item_validation() {
        assert!(validate_order_item(&item("Croissant", 2, 3)).is_ok());
        assert!(validate_order_item(&item("  ", 2, 3)).is_err());
        assert!(validate_order_item(&item("Croissant", 0, 3)).is_err());
        assert!(validate_order_item(&item("Croissant", 1, -1)).is_err());
    }

    #[test]
    fn test_recipe_quantity() {
        assert!(validate_recipe_quantity(Decimal::from(50)).is_ok());
        assert!(validate_recipe_quantity(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone("+1 (555) 123-4567").is_ok());
        assert!(validate_phone("0812345678").is_ok());
        assert!(validate_phone("12ab").is_err());
        assert!(validate_phone("123").is_err());
    }

    #[test]
    fn test_order_total_validation() {
        assert!(validate_order_total(Decimal::ZERO).is_ok());
        assert!(validate_order_total(Decimal::from(-1)).is_err());
    }

    mod properties {
        use crate::models::OrderItemInput;
        use crate::validation::{validate_order_item, validate_phone};
        use proptest::prelude::*;
        use rust_decimal::Decimal;

        proptest! {
            #[test]
            fn prop_digit_strings_of_valid_length_pass(digits in "[0-9]{7,15}") {
                prop_assert!(validate_phone(&digits).is_ok());
                let international = format!("+{}", digits);
                prop_assert!(validate_phone(&international).is_ok());
            }

            #[test]
            fn prop_letters_always_rejected(prefix in "[0-9]{7,10}", letter in "[a-zA-Z]") {
                let phone = format!("{}{}", prefix, letter);
                prop_assert!(validate_phone(&phone).is_err());
            }

            #[test]
            fn prop_positive_quantities_are_valid_items(quantity in 1i32..10_000, cents in 0i64..1_000_000) {
                let item = OrderItemInput {
                    name: "Sourdough".to_string(),
                    quantity,
                    price: Decimal::new(cents, 2),
                };
                prop_assert!(validate_order_item(&item).is_ok());
            }
        }
    }
}

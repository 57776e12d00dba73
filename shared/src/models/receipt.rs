//! Purchase receipt models

use rust_decimal::{Decimal, RoundingStrategy};

use crate::conversion::NormalizedLine;

/// Default supplier recorded when a batch names none
pub const UNKNOWN_SUPPLIER: &str = "Unknown Supplier";

/// Contribution of an accepted line to the receipt total: price × submitted quantity.
///
/// `None` when the product does not fit in a `Decimal`.
pub fn receipt_line_cost(line: &NormalizedLine) -> Option<Decimal> {
    line.price.checked_mul(line.submitted_quantity)
}

/// Sum of line costs over the accepted lines of a batch; `None` on overflow
pub fn receipt_total<'a, I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a NormalizedLine>,
{
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |total, line| total.checked_add(receipt_line_cost(line)?))
}

/// Render money with exactly two decimals, e.g. `200.00`
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{normalize_line, DEFAULT_LOW_STOCK_THRESHOLD};
    use crate::models::RawPurchaseLine;

    fn line(unit: &str, price: i64, quantity: i64) -> NormalizedLine {
        let raw = RawPurchaseLine {
            name: Some("Flour".to_string()),
            category: Some("Dry".to_string()),
            unit: Some(unit.to_string()),
            price: Some(Decimal::from(price)),
            quantity: Some(Decimal::from(quantity)),
            ..Default::default()
        };
        normalize_line(&raw, DEFAULT_LOW_STOCK_THRESHOLD).unwrap()
    }

    #[test]
    fn test_total_uses_submitted_quantity() {
        let lines = [line("kg", 100, 2), line("g", 3, 10)];
        assert_eq!(receipt_total(&lines), Some(Decimal::from(230)));
        assert_eq!(format_money(receipt_total(&lines).unwrap()), "230.00");
    }

    #[test]
    fn test_total_overflow_is_none() {
        let big = line("g", 1, 1);
        let huge = NormalizedLine {
            price: Decimal::MAX,
            ..big.clone()
        };
        assert_eq!(receipt_line_cost(&big), Some(Decimal::ONE));
        assert_eq!(receipt_total([&huge, &huge]), None);
    }

    #[test]
    fn test_format_money_rounds() {
        assert_eq!(format_money(Decimal::new(200, 0)), "200.00");
        assert_eq!(format_money(Decimal::new(12345, 3)), "12.35");
        assert_eq!(format_money(Decimal::ZERO), "0.00");
    }
}

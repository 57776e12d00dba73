//! Common types used across the platform

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Resolve optional query bounds; an open side spans all recorded history
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, &'static str> {
        let start = start
            .or_else(|| NaiveDate::from_ymd_opt(1900, 1, 1))
            .unwrap_or_default();
        let end = end
            .or_else(|| NaiveDate::from_ymd_opt(9999, 12, 31))
            .unwrap_or_default();
        if start > end {
            return Err("start_date must not be after end_date");
        }
        Ok(Self { start, end })
    }
}

/// Bucket size for sales aggregation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SalesPeriod {
    #[default]
    Weekly,
    Monthly,
    Yearly,
}

impl SalesPeriod {
    /// Unit understood by PostgreSQL `DATE_TRUNC`
    pub fn date_trunc_unit(&self) -> &'static str {
        match self {
            SalesPeriod::Weekly => "week",
            SalesPeriod::Monthly => "month",
            SalesPeriod::Yearly => "year",
        }
    }

    /// `TO_CHAR` pattern used to label a bucket
    pub fn label_format(&self) -> &'static str {
        match self {
            SalesPeriod::Weekly => "IYYY-\"W\"IW",
            SalesPeriod::Monthly => "YYYY-MM",
            SalesPeriod::Yearly => "YYYY",
        }
    }
}

/// Parse a decimal from a JSON number or a numeric string.
///
/// Frontends post form values as strings as often as numbers; anything that is
/// neither (booleans, objects, unparseable text) is treated as absent.
pub fn decimal_from_json(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    }
}

/// Serde adapter for optional decimals that may arrive as numbers or strings
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_from_number_and_string() {
        assert_eq!(decimal_from_json(&json!(2)), Some(Decimal::from(2)));
        assert_eq!(decimal_from_json(&json!("2.50")), Some(Decimal::new(250, 2)));
        assert_eq!(decimal_from_json(&json!(" 7 ")), Some(Decimal::from(7)));
    }

    #[test]
    fn test_decimal_from_garbage_is_none() {
        assert_eq!(decimal_from_json(&json!("abc")), None);
        assert_eq!(decimal_from_json(&json!("")), None);
        assert_eq!(decimal_from_json(&json!(true)), None);
        assert_eq!(decimal_from_json(&json!(null)), None);
    }

    #[test]
    fn test_sales_period_units() {
        assert_eq!(SalesPeriod::Weekly.date_trunc_unit(), "week");
        assert_eq!(SalesPeriod::Monthly.date_trunc_unit(), "month");
        assert_eq!(SalesPeriod::Yearly.date_trunc_unit(), "year");
        assert_eq!(SalesPeriod::default(), SalesPeriod::Weekly);
    }

    #[test]
    fn test_date_range_bounds() {
        let jan = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();

        let open = DateRange::from_bounds(None, Some(feb)).unwrap();
        assert!(open.start < jan);
        assert_eq!(open.end, feb);

        assert!(DateRange::from_bounds(Some(feb), Some(jan)).is_err());
        assert!(DateRange::from_bounds(Some(jan), Some(jan)).is_ok());
    }
}

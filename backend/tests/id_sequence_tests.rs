//! Sequential identifier tests
//!
//! Tests for `<PREFIX>-<year>-<seq>` identifiers including:
//! - N new rows in an empty year receive 001..N in order

use proptest::prelude::*;
use shared::{format_entity_id, next_sequence, parse_sequence, EntityKind};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Prefixes per entity
    #[test]
    fn test_prefixes() {
        assert_eq!(format_entity_id(EntityKind::Ingredient, 2025, 1), "ING-2025-001");
        assert_eq!(format_entity_id(EntityKind::Receipt, 2025, 1), "REC-2025-001");
        assert_eq!(format_entity_id(EntityKind::ReceiptItem, 2025, 1), "RCP-IT-2025-001");
        assert_eq!(format_entity_id(EntityKind::Order, 2025, 1), "ORD-2025-001");
        assert_eq!(format_entity_id(EntityKind::OrderItem, 2025, 1), "OI-2025-001");
    }

    /// Other years and other prefixes are ignored when seeding
    #[test]
    fn test_next_sequence_scoped_to_year_and_prefix() {
        let existing = ["ING-2024-050", "ING-2025-003", "ORD-2025-900", "ING-2025-010"];
        assert_eq!(next_sequence(EntityKind::Ingredient, 2025, existing), 11);
        assert_eq!(next_sequence(EntityKind::Ingredient, 2026, existing), 1);
    }

    /// RCP-IT must not be mistaken for another prefix
    #[test]
    fn test_parse_rejects_foreign_ids() {
        assert_eq!(parse_sequence(EntityKind::Receipt, 2025, "RCP-IT-2025-004"), None);
        assert_eq!(parse_sequence(EntityKind::ReceiptItem, 2025, "RCP-IT-2025-004"), Some(4));
        assert_eq!(parse_sequence(EntityKind::Order, 2025, "ORD-2025-"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// allocating N ids from nothing yields 001..N in order
        #[test]
        fn prop_batch_ids_consecutive(n in 1usize..60, year in 2000i32..2100) {
            let mut issued: Vec<String> = Vec::new();
            for _ in 0..n {
                let seq = next_sequence(EntityKind::Ingredient, year, issued.iter().map(String::as_str));
                issued.push(format_entity_id(EntityKind::Ingredient, year, seq));
            }

            for (i, id) in issued.iter().enumerate() {
                prop_assert_eq!(id, &format!("ING-{}-{:03}", year, i + 1));
            }
        }

        /// Formatting and parsing agree for any sequence
        #[test]
        fn prop_parse_inverts_format(seq in 1i32..100000, year in 2000i32..2100) {
            let id = format_entity_id(EntityKind::OrderItem, year, seq);
            prop_assert_eq!(parse_sequence(EntityKind::OrderItem, year, &id), Some(seq));
        }
    }
}

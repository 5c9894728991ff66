//! Stock classification tests
//!
//! Covers the status classifier and its boundary behavior:
//! - out_of_stock wins at zero regardless of thresholds
//! - low_stock at or below the minimum
//! - overstock strictly above the maximum, only when a maximum is set

use proptest::prelude::*;

use shared::models::StockStatus;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_zero_is_out_of_stock() {
        assert_eq!(StockStatus::classify(0, 10, Some(100)), StockStatus::OutOfStock);
    }

    /// Zero wins even when the minimum is zero
    #[test]
    fn test_zero_beats_zero_minimum() {
        assert_eq!(StockStatus::classify(0, 0, None), StockStatus::OutOfStock);
    }

    #[test]
    fn test_at_minimum_is_low_stock() {
        assert_eq!(StockStatus::classify(10, 10, Some(100)), StockStatus::LowStock);
    }

    #[test]
    fn test_below_minimum_is_low_stock() {
        assert_eq!(StockStatus::classify(3, 10, None), StockStatus::LowStock);
    }

    #[test]
    fn test_just_above_minimum_is_in_stock() {
        assert_eq!(StockStatus::classify(11, 10, Some(100)), StockStatus::InStock);
    }

    /// The maximum boundary itself is still in stock
    #[test]
    fn test_at_maximum_is_in_stock() {
        assert_eq!(StockStatus::classify(100, 10, Some(100)), StockStatus::InStock);
    }

    #[test]
    fn test_above_maximum_is_overstock() {
        assert_eq!(StockStatus::classify(101, 10, Some(100)), StockStatus::Overstock);
    }

    /// Without a maximum there is no overstock, no matter how large
    #[test]
    fn test_no_maximum_never_overstocks() {
        assert_eq!(StockStatus::classify(1_000_000, 10, None), StockStatus::InStock);
    }

    /// When minimum >= maximum, low_stock takes priority over overstock
    #[test]
    fn test_low_stock_wins_over_overstock() {
        assert_eq!(StockStatus::classify(5, 10, Some(3)), StockStatus::LowStock);
    }

    #[test]
    fn test_string_round_trip() {
        for status in [
            StockStatus::InStock,
            StockStatus::LowStock,
            StockStatus::OutOfStock,
            StockStatus::Overstock,
        ] {
            assert_eq!(StockStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_unknown_status_string() {
        assert_eq!(StockStatus::from_str("backordered"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&StockStatus::LowStock).unwrap();
        assert_eq!(json, "\"low_stock\"");

        let parsed: StockStatus = serde_json::from_str("\"out_of_stock\"").unwrap();
        assert_eq!(parsed, StockStatus::OutOfStock);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn on_hand_strategy() -> impl Strategy<Value = i64> {
        0i64..=100_000
    }

    fn minimum_strategy() -> impl Strategy<Value = i64> {
        0i64..=1_000
    }

    fn maximum_strategy() -> impl Strategy<Value = Option<i64>> {
        prop_oneof![Just(None), (0i64..=10_000).prop_map(Some)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Zero on hand is always out_of_stock
        #[test]
        fn prop_zero_always_out_of_stock(
            minimum in minimum_strategy(),
            maximum in maximum_strategy()
        ) {
            prop_assert_eq!(
                StockStatus::classify(0, minimum, maximum),
                StockStatus::OutOfStock
            );
        }

        /// Classification is total: every input maps to exactly one status
        #[test]
        fn prop_classification_total(
            on_hand in on_hand_strategy(),
            minimum in minimum_strategy(),
            maximum in maximum_strategy()
        ) {
            let status = StockStatus::classify(on_hand, minimum, maximum);
            prop_assert!(matches!(
                status,
                StockStatus::InStock
                    | StockStatus::LowStock
                    | StockStatus::OutOfStock
                    | StockStatus::Overstock
            ));
        }

        /// Positive quantities at or below the minimum are low_stock
        #[test]
        fn prop_at_or_below_minimum_low(
            minimum in 1i64..=1_000,
            maximum in maximum_strategy()
        ) {
            for on_hand in [1, minimum / 2 + 1, minimum] {
                if on_hand > 0 {
                    prop_assert_eq!(
                        StockStatus::classify(on_hand, minimum, maximum),
                        StockStatus::LowStock
                    );
                }
            }
        }

        /// overstock never appears without a configured maximum
        #[test]
        fn prop_no_overstock_without_maximum(
            on_hand in on_hand_strategy(),
            minimum in minimum_strategy()
        ) {
            let status = StockStatus::classify(on_hand, minimum, None);
            prop_assert_ne!(status, StockStatus::Overstock);
        }

        /// Quantities strictly between minimum and maximum are in_stock
        #[test]
        fn prop_between_thresholds_in_stock(
            minimum in 0i64..=100,
            headroom in 2i64..=100
        ) {
            let maximum = minimum + headroom;
            let on_hand = minimum + 1;
            prop_assert_eq!(
                StockStatus::classify(on_hand, minimum, Some(maximum)),
                StockStatus::InStock
            );
        }

        /// Status is monotone through the bands as on-hand grows
        #[test]
        fn prop_band_ordering(
            minimum in 1i64..=100,
            headroom in 1i64..=100
        ) {
            let maximum = minimum + headroom;
            let low = StockStatus::classify(minimum, minimum, Some(maximum));
            let mid = StockStatus::classify(minimum + 1, minimum, Some(maximum));
            let high = StockStatus::classify(maximum + 1, minimum, Some(maximum));

            prop_assert_eq!(low, StockStatus::LowStock);
            if minimum + 1 <= maximum {
                prop_assert_eq!(mid, StockStatus::InStock);
            }
            prop_assert_eq!(high, StockStatus::Overstock);
        }
    }
}

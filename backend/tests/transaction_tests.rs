//! Transaction processing tests
//!
//! Exercises the movement semantics against an in-memory ledger model that
//! mirrors the processor: validated requests mutate per-(item, location)
//! quantities, quantities never go negative, and the item status always
//! equals the classifier applied to the aggregate on-hand quantity.

use std::collections::HashMap;

use proptest::prelude::*;
use uuid::Uuid;

use shared::models::{RequestError, StockStatus, TransactionRequest};

fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Errors the processor can raise after a request passes shape validation
#[derive(Debug, Clone, PartialEq, Eq)]
enum ApplyError {
    Request(RequestError),
    InsufficientStock { available: i64, requested: i64 },
}

/// In-memory ledger mirroring the stored stock_levels semantics
#[derive(Debug, Default, Clone)]
struct LedgerModel {
    levels: HashMap<(Uuid, Uuid), i64>,
}

impl LedgerModel {
    fn quantity(&self, item_id: Uuid, location_id: Uuid) -> i64 {
        self.levels.get(&(item_id, location_id)).copied().unwrap_or(0)
    }

    fn total_on_hand(&self, item_id: Uuid) -> i64 {
        self.levels
            .iter()
            .filter(|((item, _), _)| *item == item_id)
            .map(|(_, quantity)| quantity)
            .sum()
    }

    /// Apply a request the way the processor does: validate first, then
    /// check availability on the outgoing side, then mutate.
    fn apply(&mut self, request: &TransactionRequest) -> Result<(), ApplyError> {
        request.validate().map_err(ApplyError::Request)?;

        match request {
            TransactionRequest::Receive {
                item_id,
                to_location_id,
                quantity,
                ..
            } => {
                let current = self.quantity(*item_id, *to_location_id);
                self.levels.insert((*item_id, *to_location_id), current + quantity);
            }
            TransactionRequest::Transfer {
                item_id,
                from_location_id,
                to_location_id,
                quantity,
                ..
            } => {
                let available = self.quantity(*item_id, *from_location_id);
                if available < *quantity {
                    return Err(ApplyError::InsufficientStock {
                        available,
                        requested: *quantity,
                    });
                }
                let destination = self.quantity(*item_id, *to_location_id);
                self.levels
                    .insert((*item_id, *from_location_id), available - quantity);
                self.levels
                    .insert((*item_id, *to_location_id), destination + quantity);
            }
            TransactionRequest::Withdraw {
                item_id,
                from_location_id,
                quantity,
                ..
            }
            | TransactionRequest::Dispose {
                item_id,
                from_location_id,
                quantity,
                ..
            } => {
                let available = self.quantity(*item_id, *from_location_id);
                if available < *quantity {
                    return Err(ApplyError::InsufficientStock {
                        available,
                        requested: *quantity,
                    });
                }
                self.levels
                    .insert((*item_id, *from_location_id), available - quantity);
            }
            TransactionRequest::Adjust {
                item_id,
                location_id,
                quantity,
                ..
            } => {
                self.levels.insert((*item_id, *location_id), *quantity);
            }
        }
        Ok(())
    }
}

fn receive(item: Uuid, to: Uuid, quantity: i64) -> TransactionRequest {
    TransactionRequest::Receive {
        item_id: item,
        to_location_id: to,
        quantity,
        reference: None,
        notes: None,
    }
}

fn transfer(item: Uuid, from: Uuid, to: Uuid, quantity: i64) -> TransactionRequest {
    TransactionRequest::Transfer {
        item_id: item,
        from_location_id: from,
        to_location_id: to,
        quantity,
        notes: None,
    }
}

fn withdraw(item: Uuid, from: Uuid, quantity: i64) -> TransactionRequest {
    TransactionRequest::Withdraw {
        item_id: item,
        from_location_id: from,
        quantity,
        purpose: None,
        notes: None,
    }
}

fn dispose(item: Uuid, from: Uuid, quantity: i64) -> TransactionRequest {
    TransactionRequest::Dispose {
        item_id: item,
        from_location_id: from,
        quantity,
        purpose: None,
        notes: None,
    }
}

fn adjust(item: Uuid, location: Uuid, quantity: i64) -> TransactionRequest {
    TransactionRequest::Adjust {
        item_id: item,
        location_id: location,
        quantity,
        purpose: None,
        notes: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_receive_accumulates() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 100)).unwrap();
        ledger.apply(&receive(id(1), id(10), 50)).unwrap();

        assert_eq!(ledger.quantity(id(1), id(10)), 150);
        assert_eq!(ledger.total_on_hand(id(1)), 150);
    }

    #[test]
    fn test_receive_is_per_location() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 100)).unwrap();
        ledger.apply(&receive(id(1), id(11), 30)).unwrap();

        assert_eq!(ledger.quantity(id(1), id(10)), 100);
        assert_eq!(ledger.quantity(id(1), id(11)), 30);
        assert_eq!(ledger.total_on_hand(id(1)), 130);
    }

    #[test]
    fn test_transfer_moves_stock() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 100)).unwrap();
        ledger.apply(&transfer(id(1), id(10), id(11), 40)).unwrap();

        assert_eq!(ledger.quantity(id(1), id(10)), 60);
        assert_eq!(ledger.quantity(id(1), id(11)), 40);
    }

    /// A transfer never changes the item's aggregate on-hand quantity
    #[test]
    fn test_transfer_preserves_total() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 100)).unwrap();
        let before = ledger.total_on_hand(id(1));
        ledger.apply(&transfer(id(1), id(10), id(11), 70)).unwrap();

        assert_eq!(ledger.total_on_hand(id(1)), before);
    }

    #[test]
    fn test_transfer_insufficient_stock_rejected() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 20)).unwrap();
        let err = ledger.apply(&transfer(id(1), id(10), id(11), 30)).unwrap_err();

        assert_eq!(
            err,
            ApplyError::InsufficientStock {
                available: 20,
                requested: 30,
            }
        );
        // Rejected transactions leave the ledger untouched
        assert_eq!(ledger.quantity(id(1), id(10)), 20);
        assert_eq!(ledger.quantity(id(1), id(11)), 0);
    }

    #[test]
    fn test_transfer_from_empty_location_rejected() {
        let mut ledger = LedgerModel::default();
        let err = ledger.apply(&transfer(id(1), id(10), id(11), 1)).unwrap_err();

        assert_eq!(
            err,
            ApplyError::InsufficientStock {
                available: 0,
                requested: 1,
            }
        );
    }

    #[test]
    fn test_withdraw_to_exactly_zero() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 25)).unwrap();
        ledger.apply(&withdraw(id(1), id(10), 25)).unwrap();

        assert_eq!(ledger.quantity(id(1), id(10)), 0);
    }

    #[test]
    fn test_withdraw_more_than_held_rejected() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 10)).unwrap();
        let err = ledger.apply(&withdraw(id(1), id(10), 11)).unwrap_err();

        assert_eq!(
            err,
            ApplyError::InsufficientStock {
                available: 10,
                requested: 11,
            }
        );
    }

    /// Dispose carries the same ledger effect as withdraw
    #[test]
    fn test_dispose_matches_withdraw_effect() {
        let mut withdrawn = LedgerModel::default();
        withdrawn.apply(&receive(id(1), id(10), 50)).unwrap();
        withdrawn.apply(&withdraw(id(1), id(10), 20)).unwrap();

        let mut disposed = LedgerModel::default();
        disposed.apply(&receive(id(1), id(10), 50)).unwrap();
        disposed.apply(&dispose(id(1), id(10), 20)).unwrap();

        assert_eq!(
            withdrawn.quantity(id(1), id(10)),
            disposed.quantity(id(1), id(10))
        );
    }

    #[test]
    fn test_adjust_sets_absolute_quantity() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 100)).unwrap();
        ledger.apply(&adjust(id(1), id(10), 42)).unwrap();

        assert_eq!(ledger.quantity(id(1), id(10)), 42);
    }

    /// Adjust can both shrink and grow the held quantity
    #[test]
    fn test_adjust_up_and_down() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&adjust(id(1), id(10), 7)).unwrap();
        assert_eq!(ledger.quantity(id(1), id(10)), 7);

        ledger.apply(&adjust(id(1), id(10), 3)).unwrap();
        assert_eq!(ledger.quantity(id(1), id(10)), 3);
    }

    #[test]
    fn test_adjust_to_zero_allowed() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 100)).unwrap();
        ledger.apply(&adjust(id(1), id(10), 0)).unwrap();

        assert_eq!(ledger.quantity(id(1), id(10)), 0);
    }

    #[test]
    fn test_invalid_requests_leave_ledger_untouched() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 10)).unwrap();
        let snapshot = ledger.clone();

        assert!(ledger.apply(&receive(id(1), id(10), 0)).is_err());
        assert!(ledger.apply(&withdraw(id(1), id(10), -5)).is_err());
        assert!(ledger.apply(&transfer(id(1), id(10), id(10), 5)).is_err());
        assert!(ledger.apply(&adjust(id(1), id(10), -1)).is_err());

        assert_eq!(ledger.levels, snapshot.levels);
    }

    #[test]
    fn test_status_tracks_ledger() {
        let mut ledger = LedgerModel::default();
        let status = |ledger: &LedgerModel| {
            StockStatus::classify(ledger.total_on_hand(id(1)), 10, Some(100))
        };

        assert_eq!(status(&ledger), StockStatus::OutOfStock);

        ledger.apply(&receive(id(1), id(10), 5)).unwrap();
        assert_eq!(status(&ledger), StockStatus::LowStock);

        ledger.apply(&receive(id(1), id(10), 45)).unwrap();
        assert_eq!(status(&ledger), StockStatus::InStock);

        ledger.apply(&receive(id(1), id(11), 60)).unwrap();
        assert_eq!(status(&ledger), StockStatus::Overstock);

        ledger.apply(&withdraw(id(1), id(11), 60)).unwrap();
        ledger.apply(&withdraw(id(1), id(10), 50)).unwrap();
        assert_eq!(status(&ledger), StockStatus::OutOfStock);
    }

    /// A transfer moves location quantities but never changes the item status
    #[test]
    fn test_transfer_does_not_change_status() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 50)).unwrap();

        let before = StockStatus::classify(ledger.total_on_hand(id(1)), 10, Some(100));
        ledger.apply(&transfer(id(1), id(10), id(11), 30)).unwrap();
        let after = StockStatus::classify(ledger.total_on_hand(id(1)), 10, Some(100));

        assert_eq!(before, after);
    }

    /// A full receive/transfer/withdraw/adjust flow with status checks at
    /// each step
    #[test]
    fn test_movement_flow_with_status() {
        let minimum = 80;
        let mut ledger = LedgerModel::default();
        let status =
            |ledger: &LedgerModel| StockStatus::classify(ledger.total_on_hand(id(1)), minimum, None);

        ledger.apply(&receive(id(1), id(10), 100)).unwrap();
        assert_eq!(ledger.quantity(id(1), id(10)), 100);
        assert_eq!(status(&ledger), StockStatus::InStock);

        ledger.apply(&transfer(id(1), id(10), id(11), 30)).unwrap();
        assert_eq!(ledger.quantity(id(1), id(10)), 70);
        assert_eq!(ledger.quantity(id(1), id(11)), 30);

        ledger.apply(&withdraw(id(1), id(11), 30)).unwrap();
        assert_eq!(ledger.quantity(id(1), id(11)), 0);
        assert_eq!(ledger.total_on_hand(id(1)), 70);
        assert_eq!(status(&ledger), StockStatus::LowStock);

        ledger.apply(&adjust(id(1), id(10), 0)).unwrap();
        assert_eq!(ledger.total_on_hand(id(1)), 0);
        assert_eq!(status(&ledger), StockStatus::OutOfStock);
    }

    /// Items are independent: movements for one never touch another
    #[test]
    fn test_item_isolation() {
        let mut ledger = LedgerModel::default();
        ledger.apply(&receive(id(1), id(10), 100)).unwrap();
        ledger.apply(&receive(id(2), id(10), 5)).unwrap();

        ledger.apply(&withdraw(id(1), id(10), 100)).unwrap();

        assert_eq!(ledger.total_on_hand(id(1)), 0);
        assert_eq!(ledger.total_on_hand(id(2)), 5);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    const ITEM: u128 = 1;

    fn location_strategy() -> impl Strategy<Value = Uuid> {
        (10u128..=13).prop_map(id)
    }

    fn request_strategy() -> impl Strategy<Value = TransactionRequest> {
        let quantity = 1i64..=100;
        prop_oneof![
            (location_strategy(), quantity.clone())
                .prop_map(|(to, q)| receive(id(ITEM), to, q)),
            (location_strategy(), location_strategy(), quantity.clone())
                .prop_map(|(from, to, q)| transfer(id(ITEM), from, to, q)),
            (location_strategy(), quantity.clone())
                .prop_map(|(from, q)| withdraw(id(ITEM), from, q)),
            (location_strategy(), quantity)
                .prop_map(|(from, q)| dispose(id(ITEM), from, q)),
            (location_strategy(), 0i64..=100)
                .prop_map(|(loc, q)| adjust(id(ITEM), loc, q)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// No sequence of requests, accepted or rejected, can drive any
        /// stock level negative
        #[test]
        fn prop_quantities_never_negative(
            requests in prop::collection::vec(request_strategy(), 1..40)
        ) {
            let mut ledger = LedgerModel::default();
            for request in &requests {
                let _ = ledger.apply(request);
                for quantity in ledger.levels.values() {
                    prop_assert!(*quantity >= 0);
                }
            }
        }

        /// Replaying the accepted transactions from scratch reproduces the
        /// same ledger
        #[test]
        fn prop_replay_equivalence(
            requests in prop::collection::vec(request_strategy(), 1..40)
        ) {
            let mut ledger = LedgerModel::default();
            let mut accepted = Vec::new();
            for request in &requests {
                if ledger.apply(request).is_ok() {
                    accepted.push(request.clone());
                }
            }

            let mut replayed = LedgerModel::default();
            for request in &accepted {
                prop_assert!(replayed.apply(request).is_ok());
            }

            prop_assert_eq!(&ledger.levels, &replayed.levels);
        }

        /// Accepted transfers never change the aggregate on-hand quantity
        #[test]
        fn prop_transfer_delta_neutral(
            seed in 1i64..=500,
            from in location_strategy(),
            to in location_strategy(),
            quantity in 1i64..=100
        ) {
            prop_assume!(from != to);
            let mut ledger = LedgerModel::default();
            ledger.apply(&receive(id(ITEM), from, seed)).unwrap();

            let before = ledger.total_on_hand(id(ITEM));
            if ledger.apply(&transfer(id(ITEM), from, to, quantity)).is_ok() {
                prop_assert_eq!(ledger.total_on_hand(id(ITEM)), before);
            } else {
                // A rejected transfer leaves everything untouched too
                prop_assert_eq!(ledger.total_on_hand(id(ITEM)), before);
            }
        }

        /// Applying the same adjust twice is the same as applying it once
        #[test]
        fn prop_adjust_idempotent(
            requests in prop::collection::vec(request_strategy(), 0..20),
            location in location_strategy(),
            target in 0i64..=100
        ) {
            let mut ledger = LedgerModel::default();
            for request in &requests {
                let _ = ledger.apply(request);
            }

            ledger.apply(&adjust(id(ITEM), location, target)).unwrap();
            let once = ledger.clone();
            ledger.apply(&adjust(id(ITEM), location, target)).unwrap();

            prop_assert_eq!(&ledger.levels, &once.levels);
        }

        /// The cached status always agrees with classifying the aggregate
        #[test]
        fn prop_status_matches_classifier(
            requests in prop::collection::vec(request_strategy(), 1..40),
            minimum in 0i64..=50,
            headroom in 0i64..=100
        ) {
            let maximum = Some(minimum + headroom);
            let mut ledger = LedgerModel::default();
            let mut cached = StockStatus::classify(0, minimum, maximum);

            for request in &requests {
                if ledger.apply(request).is_ok() {
                    // Processor recomputes on every accepted transaction
                    cached =
                        StockStatus::classify(ledger.total_on_hand(id(ITEM)), minimum, maximum);
                }
                let expected =
                    StockStatus::classify(ledger.total_on_hand(id(ITEM)), minimum, maximum);
                prop_assert_eq!(cached, expected);
            }
        }

        /// Receives always succeed and always grow the aggregate
        #[test]
        fn prop_receive_monotone(
            to in location_strategy(),
            quantities in prop::collection::vec(1i64..=100, 1..20)
        ) {
            let mut ledger = LedgerModel::default();
            let mut previous = 0;
            for quantity in &quantities {
                ledger.apply(&receive(id(ITEM), to, *quantity)).unwrap();
                let total = ledger.total_on_hand(id(ITEM));
                prop_assert!(total > previous);
                previous = total;
            }
            let expected: i64 = quantities.iter().sum();
            prop_assert_eq!(previous, expected);
        }
    }
}

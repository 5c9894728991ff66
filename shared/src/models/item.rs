//! Stock status classification for catalog items

use serde::{Deserialize, Serialize};

/// Aggregate stock level classification for an item.
///
/// An item's cached `status` column is maintained by the transaction
/// processor and always equals
/// `StockStatus::classify(total_on_hand, minimum_stock, maximum_stock)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
    Overstock,
}

impl StockStatus {
    /// Classify an item's aggregate on-hand quantity against its thresholds.
    ///
    /// Zero on hand is out-of-stock regardless of the minimum. An item with
    /// no maximum configured is never classified as overstock.
    pub fn classify(on_hand: i64, minimum_stock: i64, maximum_stock: Option<i64>) -> Self {
        if on_hand == 0 {
            StockStatus::OutOfStock
        } else if on_hand <= minimum_stock {
            StockStatus::LowStock
        } else if maximum_stock.is_some_and(|max| on_hand > max) {
            StockStatus::Overstock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::Overstock => "overstock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in_stock" => Some(StockStatus::InStock),
            "low_stock" => Some(StockStatus::LowStock),
            "out_of_stock" => Some(StockStatus::OutOfStock),
            "overstock" => Some(StockStatus::Overstock),
            _ => None,
        }
    }
}

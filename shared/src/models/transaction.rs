//! Stock transaction models
//!
//! A transaction request is a tagged enum: each movement type carries
//! exactly the fields its semantics need, and the adjust variant's
//! absolute-quantity meaning is encoded in the variant itself rather than
//! in a sign convention.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Types of stock transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Stock arriving into a location
    Receive,
    /// Stock moved between two locations
    Transfer,
    /// Permanent removal for use (e.g. a project build)
    Withdraw,
    /// Permanent removal as scrap; ledger effect identical to withdraw,
    /// kept as a separate audit category
    Dispose,
    /// Manual stock-count correction; quantity is an absolute target
    Adjust,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Receive => "receive",
            TransactionType::Transfer => "transfer",
            TransactionType::Withdraw => "withdraw",
            TransactionType::Dispose => "dispose",
            TransactionType::Adjust => "adjust",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "receive" => Some(TransactionType::Receive),
            "transfer" => Some(TransactionType::Transfer),
            "withdraw" => Some(TransactionType::Withdraw),
            "dispose" => Some(TransactionType::Dispose),
            "adjust" => Some(TransactionType::Adjust),
            _ => None,
        }
    }
}

/// A requested stock movement, validated and applied by the transaction
/// processor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionRequest {
    Receive {
        item_id: Uuid,
        to_location_id: Uuid,
        quantity: i64,
        reference: Option<String>,
        notes: Option<String>,
    },
    Transfer {
        item_id: Uuid,
        from_location_id: Uuid,
        to_location_id: Uuid,
        quantity: i64,
        notes: Option<String>,
    },
    Withdraw {
        item_id: Uuid,
        from_location_id: Uuid,
        quantity: i64,
        /// What the stock was withdrawn for (project, work order)
        purpose: Option<String>,
        notes: Option<String>,
    },
    Dispose {
        item_id: Uuid,
        from_location_id: Uuid,
        quantity: i64,
        /// Why the stock was scrapped
        purpose: Option<String>,
        notes: Option<String>,
    },
    Adjust {
        item_id: Uuid,
        location_id: Uuid,
        /// Absolute counted quantity, not a delta
        quantity: i64,
        purpose: Option<String>,
        notes: Option<String>,
    },
}

/// Shape-level problems with a transaction request, detected before any
/// storage access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(i64),
    #[error("adjusted quantity must not be negative, got {0}")]
    NegativeQuantity(i64),
    #[error("transfer source and destination must be distinct locations")]
    SameLocationPair,
}

impl TransactionRequest {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionRequest::Receive { .. } => TransactionType::Receive,
            TransactionRequest::Transfer { .. } => TransactionType::Transfer,
            TransactionRequest::Withdraw { .. } => TransactionType::Withdraw,
            TransactionRequest::Dispose { .. } => TransactionType::Dispose,
            TransactionRequest::Adjust { .. } => TransactionType::Adjust,
        }
    }

    pub fn item_id(&self) -> Uuid {
        match self {
            TransactionRequest::Receive { item_id, .. }
            | TransactionRequest::Transfer { item_id, .. }
            | TransactionRequest::Withdraw { item_id, .. }
            | TransactionRequest::Dispose { item_id, .. }
            | TransactionRequest::Adjust { item_id, .. } => *item_id,
        }
    }

    pub fn quantity(&self) -> i64 {
        match self {
            TransactionRequest::Receive { quantity, .. }
            | TransactionRequest::Transfer { quantity, .. }
            | TransactionRequest::Withdraw { quantity, .. }
            | TransactionRequest::Dispose { quantity, .. }
            | TransactionRequest::Adjust { quantity, .. } => *quantity,
        }
    }

    /// Location the transaction removes stock from, if any
    pub fn from_location_id(&self) -> Option<Uuid> {
        match self {
            TransactionRequest::Receive { .. } => None,
            TransactionRequest::Transfer {
                from_location_id, ..
            }
            | TransactionRequest::Withdraw {
                from_location_id, ..
            }
            | TransactionRequest::Dispose {
                from_location_id, ..
            } => Some(*from_location_id),
            TransactionRequest::Adjust { location_id, .. } => Some(*location_id),
        }
    }

    /// Location the transaction adds stock to, if any
    pub fn to_location_id(&self) -> Option<Uuid> {
        match self {
            TransactionRequest::Receive { to_location_id, .. }
            | TransactionRequest::Transfer { to_location_id, .. } => Some(*to_location_id),
            _ => None,
        }
    }

    /// Validate request shape. Runs before any storage access; a request
    /// that fails here never touches the ledger.
    pub fn validate(&self) -> Result<(), RequestError> {
        match self {
            TransactionRequest::Receive { quantity, .. }
            | TransactionRequest::Withdraw { quantity, .. }
            | TransactionRequest::Dispose { quantity, .. } => {
                if *quantity <= 0 {
                    return Err(RequestError::NonPositiveQuantity(*quantity));
                }
            }
            TransactionRequest::Transfer {
                from_location_id,
                to_location_id,
                quantity,
                ..
            } => {
                if *quantity <= 0 {
                    return Err(RequestError::NonPositiveQuantity(*quantity));
                }
                if from_location_id == to_location_id {
                    return Err(RequestError::SameLocationPair);
                }
            }
            TransactionRequest::Adjust { quantity, .. } => {
                if *quantity < 0 {
                    return Err(RequestError::NegativeQuantity(*quantity));
                }
            }
        }
        Ok(())
    }
}

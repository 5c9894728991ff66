//! Transaction processor: the single authorized write path for stock
//!
//! Every stock movement goes through [`TransactionService::apply`], which
//! validates the request, mutates the ledger inside one database
//! transaction with the item row locked, recomputes the item's cached
//! status, and appends the immutable audit record. Any failure rolls the
//! whole operation back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{RequestError, StockStatus, TransactionRequest, TransactionType};
use shared::types::Pagination;

use crate::error::{AppError, AppResult};
use crate::services::stock;

/// Transaction processor service
#[derive(Clone)]
pub struct TransactionService {
    db: PgPool,
}

/// An applied stock transaction: the immutable audit record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockTransaction {
    pub id: Uuid,
    pub transaction_type: String,
    pub item_id: Uuid,
    pub quantity: i64,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub performed_by: Uuid,
    pub performed_at: DateTime<Utc>,
    pub purpose: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Filter for transaction history queries
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    pub item_id: Option<Uuid>,
    /// Matches either side of a movement
    pub location_id: Option<Uuid>,
    pub transaction_type: Option<TransactionType>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Item columns the processor needs while holding the row lock
#[derive(Debug, FromRow)]
struct ItemForUpdate {
    id: Uuid,
    minimum_stock: i64,
    maximum_stock: Option<i64>,
}

impl TransactionService {
    /// Create a new TransactionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply a stock transaction on behalf of an actor.
    ///
    /// Serializable per item: the item row is locked for the duration of
    /// the read-modify-write, so concurrent applies against the same item
    /// observe each other's committed effects. Distinct items proceed in
    /// parallel.
    pub async fn apply(
        &self,
        actor_id: Uuid,
        request: TransactionRequest,
        metadata: Option<serde_json::Value>,
    ) -> AppResult<StockTransaction> {
        // Shape validation happens before any storage access
        request.validate().map_err(|e| match e {
            RequestError::SameLocationPair => AppError::InvalidLocationPair(e.to_string()),
            RequestError::NonPositiveQuantity(_) | RequestError::NegativeQuantity(_) => {
                AppError::InvalidQuantity(e.to_string())
            }
        })?;

        let mut tx = self.db.begin().await?;

        // Lock the item row; this serializes applies per item and pins the
        // thresholds used for the status recompute below
        let item = sqlx::query_as::<_, ItemForUpdate>(
            "SELECT id, minimum_stock, maximum_stock FROM items WHERE id = $1 FOR UPDATE",
        )
        .bind(request.item_id())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::ItemNotFound(request.item_id()))?;

        // Referenced locations must exist
        for location_id in [request.from_location_id(), request.to_location_id()]
            .into_iter()
            .flatten()
        {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM locations WHERE id = $1)")
                    .bind(location_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !exists {
                return Err(AppError::LocationNotFound(location_id));
            }
        }

        self.mutate_ledger(&mut tx, item.id, &request).await?;

        // Recompute the aggregate and the cached status against the
        // post-mutation ledger, inside the same transaction
        let total = stock::total_on_hand_locked(&mut *tx, item.id).await?;
        let status = StockStatus::classify(total, item.minimum_stock, item.maximum_stock);
        sqlx::query("UPDATE items SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(item.id)
            .execute(&mut *tx)
            .await?;

        // Append the immutable audit record as the final step
        let (purpose, reference, notes) = request_annotations(&request);
        let record = sqlx::query_as::<_, StockTransaction>(
            r#"
            INSERT INTO stock_transactions (
                transaction_type, item_id, quantity, from_location_id, to_location_id,
                performed_by, purpose, reference, notes, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, transaction_type, item_id, quantity, from_location_id,
                      to_location_id, performed_by, performed_at, purpose, reference,
                      notes, metadata
            "#,
        )
        .bind(request.transaction_type().as_str())
        .bind(item.id)
        .bind(request.quantity())
        .bind(request.from_location_id())
        .bind(request.to_location_id())
        .bind(actor_id)
        .bind(purpose)
        .bind(reference)
        .bind(notes)
        .bind(metadata)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %record.id,
            transaction_type = %record.transaction_type,
            item_id = %record.item_id,
            total_on_hand = total,
            status = status.as_str(),
            "applied stock transaction"
        );

        Ok(record)
    }

    /// Apply the per-type ledger effect. Rows are read with `FOR UPDATE`
    /// and written through the upsert helper; the caller commits or rolls
    /// back the surrounding transaction.
    async fn mutate_ledger(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        item_id: Uuid,
        request: &TransactionRequest,
    ) -> AppResult<()> {
        match request {
            TransactionRequest::Receive {
                to_location_id,
                quantity,
                ..
            } => {
                let current = stock::level_for_update(&mut **tx, item_id, *to_location_id)
                    .await?
                    .map(|l| l.quantity)
                    .unwrap_or(0);
                stock::upsert_quantity(&mut **tx, item_id, *to_location_id, current + quantity).await?;
            }
            TransactionRequest::Transfer {
                from_location_id,
                to_location_id,
                quantity,
                ..
            } => {
                let from_current = stock::level_for_update(&mut **tx, item_id, *from_location_id)
                    .await?
                    .map(|l| l.quantity)
                    .unwrap_or(0);
                if from_current < *quantity {
                    return Err(AppError::InsufficientStock(format!(
                        "transfer of {} requested with {} on hand",
                        quantity, from_current
                    )));
                }
                let to_current = stock::level_for_update(&mut **tx, item_id, *to_location_id)
                    .await?
                    .map(|l| l.quantity)
                    .unwrap_or(0);
                // Both sides change or neither: same transaction
                stock::upsert_quantity(&mut **tx, item_id, *from_location_id, from_current - quantity)
                    .await?;
                stock::upsert_quantity(&mut **tx, item_id, *to_location_id, to_current + quantity)
                    .await?;
            }
            TransactionRequest::Withdraw {
                from_location_id,
                quantity,
                ..
            }
            | TransactionRequest::Dispose {
                from_location_id,
                quantity,
                ..
            } => {
                let current = stock::level_for_update(&mut **tx, item_id, *from_location_id)
                    .await?
                    .map(|l| l.quantity)
                    .unwrap_or(0);
                if current < *quantity {
                    return Err(AppError::InsufficientStock(format!(
                        "removal of {} requested with {} on hand",
                        quantity, current
                    )));
                }
                stock::upsert_quantity(&mut **tx, item_id, *from_location_id, current - quantity).await?;
            }
            TransactionRequest::Adjust {
                location_id,
                quantity,
                ..
            } => {
                // Absolute set: the counted quantity replaces whatever the
                // ledger held
                stock::level_for_update(&mut **tx, item_id, *location_id).await?;
                stock::upsert_quantity(&mut **tx, item_id, *location_id, *quantity).await?;
            }
        }
        Ok(())
    }

    /// Transaction history, newest first, filterable by item, location,
    /// type and date range
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        pagination: &Pagination,
    ) -> AppResult<Vec<StockTransaction>> {
        let transactions = sqlx::query_as::<_, StockTransaction>(
            r#"
            SELECT id, transaction_type, item_id, quantity, from_location_id,
                   to_location_id, performed_by, performed_at, purpose, reference,
                   notes, metadata
            FROM stock_transactions
            WHERE ($1::uuid IS NULL OR item_id = $1)
              AND ($2::uuid IS NULL OR from_location_id = $2 OR to_location_id = $2)
              AND ($3::varchar IS NULL OR transaction_type = $3)
              AND ($4::timestamptz IS NULL OR performed_at >= $4)
              AND ($5::timestamptz IS NULL OR performed_at <= $5)
            ORDER BY performed_at DESC, id DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.item_id)
        .bind(filter.location_id)
        .bind(filter.transaction_type.map(|t| t.as_str()))
        .bind(filter.start)
        .bind(filter.end)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(transactions)
    }

    /// Total number of transactions matching a filter (for pagination)
    pub async fn count_transactions(&self, filter: &TransactionFilter) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM stock_transactions
            WHERE ($1::uuid IS NULL OR item_id = $1)
              AND ($2::uuid IS NULL OR from_location_id = $2 OR to_location_id = $2)
              AND ($3::varchar IS NULL OR transaction_type = $3)
              AND ($4::timestamptz IS NULL OR performed_at >= $4)
              AND ($5::timestamptz IS NULL OR performed_at <= $5)
            "#,
        )
        .bind(filter.item_id)
        .bind(filter.location_id)
        .bind(filter.transaction_type.map(|t| t.as_str()))
        .bind(filter.start)
        .bind(filter.end)
        .fetch_one(&self.db)
        .await?;

        Ok(count as u64)
    }

    /// Get one transaction by id
    pub async fn get_transaction(&self, id: Uuid) -> AppResult<StockTransaction> {
        let transaction = sqlx::query_as::<_, StockTransaction>(
            r#"
            SELECT id, transaction_type, item_id, quantity, from_location_id,
                   to_location_id, performed_by, performed_at, purpose, reference,
                   notes, metadata
            FROM stock_transactions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".to_string()))?;

        Ok(transaction)
    }
}

/// Pull the free-text annotations out of a request variant
fn request_annotations(
    request: &TransactionRequest,
) -> (Option<String>, Option<String>, Option<String>) {
    match request {
        TransactionRequest::Receive {
            reference, notes, ..
        } => (None, reference.clone(), notes.clone()),
        TransactionRequest::Transfer { notes, .. } => (None, None, notes.clone()),
        TransactionRequest::Withdraw { purpose, notes, .. }
        | TransactionRequest::Dispose { purpose, notes, .. }
        | TransactionRequest::Adjust { purpose, notes, .. } => {
            (purpose.clone(), None, notes.clone())
        }
    }
}

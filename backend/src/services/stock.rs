//! Stock ledger service for on-hand quantities per (item, location)
//!
//! Rows in `stock_levels` are mutated only through the transaction
//! processor; everything here is either a read-side accessor or a
//! lock-and-write helper the processor calls inside its database
//! transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Stock ledger service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Current on-hand quantity for one (item, location) pair.
/// A missing row is equivalent to a quantity of zero.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockLevel {
    pub id: Uuid,
    pub item_id: Uuid,
    pub location_id: Uuid,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the stock level for an (item, location) pair, if a row exists
    pub async fn get_level(
        &self,
        item_id: Uuid,
        location_id: Uuid,
    ) -> AppResult<Option<StockLevel>> {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, item_id, location_id, quantity, updated_at
            FROM stock_levels
            WHERE item_id = $1 AND location_id = $2
            "#,
        )
        .bind(item_id)
        .bind(location_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(level)
    }

    /// Get all stock levels for an item
    pub async fn get_levels_for_item(&self, item_id: Uuid) -> AppResult<Vec<StockLevel>> {
        let levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, item_id, location_id, quantity, updated_at
            FROM stock_levels
            WHERE item_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        Ok(levels)
    }

    /// List stock levels, optionally restricted to one location
    pub async fn list_levels(&self, location_id: Option<Uuid>) -> AppResult<Vec<StockLevel>> {
        let levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, item_id, location_id, quantity, updated_at
            FROM stock_levels
            WHERE ($1::uuid IS NULL OR location_id = $1)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(location_id)
        .fetch_all(&self.db)
        .await?;

        Ok(levels)
    }

    /// Aggregate on-hand quantity for an item across all locations
    pub async fn total_on_hand(&self, item_id: Uuid) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM stock_levels WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }
}

/// Read one stock row with a row lock, inside an open database transaction.
/// Returns `None` when no row exists yet for the pair.
pub(crate) async fn level_for_update(
    conn: &mut PgConnection,
    item_id: Uuid,
    location_id: Uuid,
) -> AppResult<Option<StockLevel>> {
    let level = sqlx::query_as::<_, StockLevel>(
        r#"
        SELECT id, item_id, location_id, quantity, updated_at
        FROM stock_levels
        WHERE item_id = $1 AND location_id = $2
        FOR UPDATE
        "#,
    )
    .bind(item_id)
    .bind(location_id)
    .fetch_optional(conn)
    .await?;

    Ok(level)
}

/// Set the quantity for an (item, location) pair, creating the row on first
/// receipt. Zero targets keep the row (aggregation treats zero and absent
/// rows the same). Negative targets are rejected before touching the table.
pub(crate) async fn upsert_quantity(
    conn: &mut PgConnection,
    item_id: Uuid,
    location_id: Uuid,
    new_quantity: i64,
) -> AppResult<StockLevel> {
    if new_quantity < 0 {
        return Err(AppError::InvalidQuantity(format!(
            "stock level cannot be set to {}",
            new_quantity
        )));
    }

    let level = sqlx::query_as::<_, StockLevel>(
        r#"
        INSERT INTO stock_levels (item_id, location_id, quantity)
        VALUES ($1, $2, $3)
        ON CONFLICT (item_id, location_id)
        DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = NOW()
        RETURNING id, item_id, location_id, quantity, updated_at
        "#,
    )
    .bind(item_id)
    .bind(location_id)
    .bind(new_quantity)
    .fetch_one(conn)
    .await?;

    Ok(level)
}

/// Aggregate on-hand quantity, read inside an open database transaction so
/// the cached status is recomputed against the post-mutation ledger.
pub(crate) async fn total_on_hand_locked(
    conn: &mut PgConnection,
    item_id: Uuid,
) -> AppResult<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM stock_levels WHERE item_id = $1",
    )
    .bind(item_id)
    .fetch_one(conn)
    .await?;

    Ok(total)
}

//! Item catalog service
//!
//! Item definitions are ordinary CRUD; the only subtlety is the cached
//! `status` column, which belongs to the transaction processor. The one
//! write path here that touches it is a threshold change, which recomputes
//! the classification in the same database transaction so the cache never
//! drifts from the ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::StockStatus;
use shared::validation::{validate_name, validate_sku, validate_thresholds, validate_unit_cost};

use crate::error::{AppError, AppResult};
use crate::services::stock;

/// Item catalog service
#[derive(Clone)]
pub struct ItemService {
    db: PgPool,
}

/// A catalog item (part definition), independent of where it is stored
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub manufacturer: Option<String>,
    pub unit_cost: Decimal,
    pub minimum_stock: i64,
    pub maximum_stock: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub manufacturer: Option<String>,
    pub unit_cost: Decimal,
    pub minimum_stock: Option<i64>,
    pub maximum_stock: Option<i64>,
}

/// Input for updating an item; absent fields keep their current values
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub minimum_stock: Option<i64>,
    pub maximum_stock: Option<Option<i64>>,
}

/// Filter for item listings
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub status: Option<StockStatus>,
    /// Substring match against SKU and name
    pub search: Option<String>,
}

impl ItemService {
    /// Create a new ItemService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a catalog item. New items start with no stock anywhere, so
    /// the initial status is the classification of zero.
    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<Item> {
        validate_sku(&input.sku).map_err(|msg| AppError::Validation {
            field: "sku".to_string(),
            message: msg.to_string(),
        })?;
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_unit_cost(input.unit_cost).map_err(|msg| AppError::Validation {
            field: "unit_cost".to_string(),
            message: msg.to_string(),
        })?;
        let minimum_stock = input.minimum_stock.unwrap_or(0);
        validate_thresholds(minimum_stock, input.maximum_stock).map_err(|msg| {
            AppError::Validation {
                field: "minimum_stock/maximum_stock".to_string(),
                message: msg.to_string(),
            }
        })?;

        // SKU uniqueness enforced at write time
        let sku_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE sku = $1)")
                .bind(&input.sku)
                .fetch_one(&self.db)
                .await?;
        if sku_taken {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        let status = StockStatus::classify(0, minimum_stock, input.maximum_stock);

        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (sku, name, category, manufacturer, unit_cost,
                               minimum_stock, maximum_stock, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, sku, name, category, manufacturer, unit_cost,
                      minimum_stock, maximum_stock, status, created_at, updated_at
            "#,
        )
        .bind(&input.sku)
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.manufacturer)
        .bind(input.unit_cost)
        .bind(minimum_stock)
        .bind(input.maximum_stock)
        .bind(status.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Get an item by id
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, sku, name, category, manufacturer, unit_cost,
                   minimum_stock, maximum_stock, status, created_at, updated_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::ItemNotFound(item_id))?;

        Ok(item)
    }

    /// List items, filterable by category, status, and a SKU/name search
    pub async fn list_items(&self, filter: &ItemFilter) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, sku, name, category, manufacturer, unit_cost,
                   minimum_stock, maximum_stock, status, created_at, updated_at
            FROM items
            WHERE ($1::varchar IS NULL OR category = $1)
              AND ($2::varchar IS NULL OR status = $2)
              AND ($3::varchar IS NULL OR sku ILIKE '%' || $3 || '%' OR name ILIKE '%' || $3 || '%')
            ORDER BY sku ASC
            "#,
        )
        .bind(&filter.category)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(&filter.search)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Update an item's definition. Threshold changes recompute the cached
    /// status against the current ledger inside the same transaction.
    pub async fn update_item(&self, item_id: Uuid, input: UpdateItemInput) -> AppResult<Item> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, sku, name, category, manufacturer, unit_cost,
                   minimum_stock, maximum_stock, status, created_at, updated_at
            FROM items
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::ItemNotFound(item_id))?;

        let name = input.name.unwrap_or(existing.name);
        let category = input.category.unwrap_or(existing.category);
        let manufacturer = input.manufacturer.or(existing.manufacturer);
        let unit_cost = input.unit_cost.unwrap_or(existing.unit_cost);
        let minimum_stock = input.minimum_stock.unwrap_or(existing.minimum_stock);
        let maximum_stock = input.maximum_stock.unwrap_or(existing.maximum_stock);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_unit_cost(unit_cost).map_err(|msg| AppError::Validation {
            field: "unit_cost".to_string(),
            message: msg.to_string(),
        })?;
        validate_thresholds(minimum_stock, maximum_stock).map_err(|msg| {
            AppError::Validation {
                field: "minimum_stock/maximum_stock".to_string(),
                message: msg.to_string(),
            }
        })?;

        let thresholds_changed = minimum_stock != existing.minimum_stock
            || maximum_stock != existing.maximum_stock;
        let status = if thresholds_changed {
            let total = stock::total_on_hand_locked(&mut *tx, item_id).await?;
            StockStatus::classify(total, minimum_stock, maximum_stock)
                .as_str()
                .to_string()
        } else {
            existing.status
        };

        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name = $1, category = $2, manufacturer = $3, unit_cost = $4,
                minimum_stock = $5, maximum_stock = $6, status = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING id, sku, name, category, manufacturer, unit_cost,
                      minimum_stock, maximum_stock, status, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&category)
        .bind(&manufacturer)
        .bind(unit_cost)
        .bind(minimum_stock)
        .bind(maximum_stock)
        .bind(&status)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(item)
    }

    /// Delete an item. Rejected while any stock remains; zero-quantity
    /// ledger rows are cleared along with it. The transaction history keeps
    /// its records.
    pub async fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let on_hand: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM stock_levels WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        if on_hand > 0 {
            return Err(AppError::Conflict {
                resource: "item".to_string(),
                message: format!("Item still has {} units on hand", on_hand),
            });
        }

        sqlx::query("DELETE FROM stock_levels WHERE item_id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ItemNotFound(item_id));
        }

        tx.commit().await?;

        Ok(())
    }
}

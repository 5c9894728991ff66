//! Read-side analytics over the catalog, ledger and transaction log
//!
//! Pure aggregations consumed by dashboards and alerts. Nothing here
//! writes stock or status; status filters trust the cached value the
//! transaction processor maintains.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::StockStatus;

use crate::error::AppResult;
use crate::services::items::Item;

/// Analytics service
#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
}

/// Total units and value held at one location
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LocationValuation {
    pub location_id: Uuid,
    pub building: Option<String>,
    pub room: Option<String>,
    pub unit: String,
    pub total_units: i64,
    pub total_value: Decimal,
}

/// Transaction counts per type over a time window
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransactionActivity {
    pub transaction_type: String,
    pub transaction_count: i64,
    pub total_quantity: i64,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_items: i64,
    pub low_stock_items: i64,
    pub out_of_stock_items: i64,
    pub overstock_items: i64,
    pub total_locations: i64,
    pub inventory_value: Decimal,
    pub transactions_last_7_days: i64,
}

impl AnalyticsService {
    /// Create a new AnalyticsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Items currently in a given status bucket (alert feeds filter on
    /// low_stock / out_of_stock)
    pub async fn items_by_status(&self, status: StockStatus) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, sku, name, category, manufacturer, unit_cost,
                   minimum_stock, maximum_stock, status, created_at, updated_at
            FROM items
            WHERE status = $1
            ORDER BY sku ASC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Inventory value per location: sum of quantity * unit cost
    pub async fn location_valuation(&self) -> AppResult<Vec<LocationValuation>> {
        let valuations = sqlx::query_as::<_, LocationValuation>(
            r#"
            SELECT l.id as location_id, l.building, l.room, l.unit,
                   COALESCE(SUM(sl.quantity), 0)::BIGINT as total_units,
                   COALESCE(SUM(sl.quantity * i.unit_cost), 0) as total_value
            FROM locations l
            LEFT JOIN stock_levels sl ON sl.location_id = l.id
            LEFT JOIN items i ON i.id = sl.item_id
            GROUP BY l.id, l.building, l.room, l.unit
            ORDER BY total_value DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(valuations)
    }

    /// Transaction counts and moved quantity per type over a window of the
    /// transaction log; independent of the current ledger
    pub async fn transaction_activity(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<TransactionActivity>> {
        let activity = sqlx::query_as::<_, TransactionActivity>(
            r#"
            SELECT transaction_type,
                   COUNT(*) as transaction_count,
                   COALESCE(SUM(quantity), 0)::BIGINT as total_quantity
            FROM stock_transactions
            WHERE ($1::timestamptz IS NULL OR performed_at >= $1)
              AND ($2::timestamptz IS NULL OR performed_at <= $2)
            GROUP BY transaction_type
            ORDER BY transaction_count DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(activity)
    }

    /// Get dashboard metrics
    pub async fn get_dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let item_counts: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) as total,
                   COUNT(*) FILTER (WHERE status = 'low_stock') as low,
                   COUNT(*) FILTER (WHERE status = 'out_of_stock') as out,
                   COUNT(*) FILTER (WHERE status = 'overstock') as over
            FROM items
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let total_locations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.db)
            .await?;

        let inventory_value: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(sl.quantity * i.unit_cost), 0)
            FROM stock_levels sl
            JOIN items i ON i.id = sl.item_id
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let recent_transactions: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM stock_transactions
            WHERE performed_at >= NOW() - INTERVAL '7 days'
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            total_items: item_counts.0,
            low_stock_items: item_counts.1,
            out_of_stock_items: item_counts.2,
            overstock_items: item_counts.3,
            total_locations,
            inventory_value,
            transactions_last_7_days: recent_transactions,
        })
    }
}

//! Reporting service for transaction history and valuation exports

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Report filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub item_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

/// Transaction history report row, denormalized for export
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TransactionReportRow {
    pub performed_at: DateTime<Utc>,
    pub transaction_type: String,
    pub sku: String,
    pub item_name: String,
    pub quantity: i64,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub performed_by: Uuid,
    pub purpose: Option<String>,
}

/// Inventory valuation report row
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ValuationReportRow {
    pub sku: String,
    pub item_name: String,
    pub location: String,
    pub quantity: i64,
    pub unit_cost: Decimal,
    pub total_value: Decimal,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Transaction history with item and location labels resolved
    pub async fn transaction_history_report(
        &self,
        filter: &ReportFilter,
    ) -> AppResult<Vec<TransactionReportRow>> {
        let rows = sqlx::query_as::<_, TransactionReportRow>(
            r#"
            SELECT t.performed_at, t.transaction_type, i.sku, i.name as item_name,
                   t.quantity, lf.unit as from_location, lt.unit as to_location,
                   t.performed_by, t.purpose
            FROM stock_transactions t
            JOIN items i ON i.id = t.item_id
            LEFT JOIN locations lf ON lf.id = t.from_location_id
            LEFT JOIN locations lt ON lt.id = t.to_location_id
            WHERE ($1::timestamptz IS NULL OR t.performed_at >= $1)
              AND ($2::timestamptz IS NULL OR t.performed_at <= $2)
              AND ($3::uuid IS NULL OR t.item_id = $3)
              AND ($4::uuid IS NULL OR t.from_location_id = $4 OR t.to_location_id = $4)
            ORDER BY t.performed_at DESC
            "#,
        )
        .bind(filter.start)
        .bind(filter.end)
        .bind(filter.item_id)
        .bind(filter.location_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Current inventory valuation, one row per held (item, location) pair
    pub async fn valuation_report(&self) -> AppResult<Vec<ValuationReportRow>> {
        let rows = sqlx::query_as::<_, ValuationReportRow>(
            r#"
            SELECT i.sku, i.name as item_name, l.unit as location,
                   sl.quantity, i.unit_cost,
                   (sl.quantity * i.unit_cost) as total_value
            FROM stock_levels sl
            JOIN items i ON i.id = sl.item_id
            JOIN locations l ON l.id = sl.location_id
            WHERE sl.quantity > 0
            ORDER BY total_value DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

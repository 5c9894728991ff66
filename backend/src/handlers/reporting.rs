//! HTTP handlers for report endpoints with optional CSV export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::services::reporting::{ReportFilter, ReportingService};
use crate::AppState;

/// Query parameters shared by report endpoints
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub item_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    /// "json" (default) or "csv"
    pub format: Option<String>,
}

impl ReportQuery {
    fn filter(&self) -> ReportFilter {
        ReportFilter {
            start: self.start,
            end: self.end,
            item_id: self.item_id,
            location_id: self.location_id,
        }
    }
}

/// Transaction history report
pub async fn get_transaction_history_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<axum::response::Response> {
    check_permission(&current_user.0, "reports", "read")?;
    let service = ReportingService::new(state.db);
    let data = service.transaction_history_report(&query.filter()).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"transaction_history.csv\"",
                ),
            ],
            csv,
        )
            .into_response());
    }

    Ok(Json(data).into_response())
}

/// Inventory valuation report
pub async fn get_valuation_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<axum::response::Response> {
    check_permission(&current_user.0, "reports", "read")?;
    let service = ReportingService::new(state.db);
    let data = service.valuation_report().await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"inventory_valuation.csv\"",
                ),
            ],
            csv,
        )
            .into_response());
    }

    Ok(Json(data).into_response())
}

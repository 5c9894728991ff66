//! HTTP handlers for analytics and dashboard endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use shared::models::StockStatus;

use crate::error::{AppError, AppResult};
use crate::middleware::{check_permission, CurrentUser};
use crate::services::analytics::{
    AnalyticsService, DashboardMetrics, LocationValuation, TransactionActivity,
};
use crate::services::items::Item;
use crate::AppState;

/// Query parameters for the activity report window
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Items currently below their minimum threshold
pub async fn get_low_stock_items(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Item>>> {
    items_by_status(state, current_user, StockStatus::LowStock).await
}

/// Items with no stock anywhere
pub async fn get_out_of_stock_items(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Item>>> {
    items_by_status(state, current_user, StockStatus::OutOfStock).await
}

/// Restricted readers get an empty list rather than an error banner
async fn items_by_status(
    state: AppState,
    current_user: CurrentUser,
    status: StockStatus,
) -> AppResult<Json<Vec<Item>>> {
    if let Err(AppError::InsufficientPermissions) =
        check_permission(&current_user.0, "analytics", "read")
    {
        return Ok(Json(vec![]));
    }
    let service = AnalyticsService::new(state.db);
    let items = service.items_by_status(status).await?;
    Ok(Json(items))
}

/// Inventory value per location
pub async fn get_location_valuation(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<LocationValuation>>> {
    check_permission(&current_user.0, "analytics", "read")?;
    let service = AnalyticsService::new(state.db);
    let valuations = service.location_valuation().await?;
    Ok(Json(valuations))
}

/// Transaction counts per type over a time window
pub async fn get_transaction_activity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<TransactionActivity>>> {
    check_permission(&current_user.0, "analytics", "read")?;
    let service = AnalyticsService::new(state.db);
    let activity = service.transaction_activity(query.start, query.end).await?;
    Ok(Json(activity))
}

/// Dashboard metrics
pub async fn get_dashboard_metrics(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    check_permission(&current_user.0, "analytics", "read")?;
    let service = AnalyticsService::new(state.db);
    let metrics = service.get_dashboard_metrics().await?;
    Ok(Json(metrics))
}

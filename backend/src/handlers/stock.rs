//! HTTP handlers for stock ledger read endpoints
//!
//! All write access to the ledger goes through the transaction endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::stock::{StockLevel, StockService};
use crate::AppState;

/// Query parameters for listing stock levels
#[derive(Debug, Deserialize)]
pub struct LevelsQuery {
    pub location_id: Option<Uuid>,
}

/// Aggregate on-hand response for an item
#[derive(Debug, Serialize)]
pub struct TotalOnHandResponse {
    pub item_id: Uuid,
    pub total_on_hand: i64,
}

/// List stock levels, optionally for one location
pub async fn list_stock_levels(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<LevelsQuery>,
) -> AppResult<Json<Vec<StockLevel>>> {
    let service = StockService::new(state.db);
    let levels = service.list_levels(query.location_id).await?;
    Ok(Json(levels))
}

/// Get all stock levels for an item
pub async fn get_item_stock_levels(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockLevel>>> {
    let service = StockService::new(state.db);
    let levels = service.get_levels_for_item(item_id).await?;
    Ok(Json(levels))
}

/// Get the aggregate on-hand quantity for an item
pub async fn get_item_total_on_hand(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<TotalOnHandResponse>> {
    let service = StockService::new(state.db);
    let total_on_hand = service.total_on_hand(item_id).await?;
    Ok(Json(TotalOnHandResponse {
        item_id,
        total_on_hand,
    }))
}

/// Get the stock level for one (item, location) pair; a missing row reads
/// as quantity zero
pub async fn get_stock_level(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path((item_id, location_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<serde_json::Value>> {
    let service = StockService::new(state.db);
    let level = service.get_level(item_id, location_id).await?;
    let quantity = level.as_ref().map(|l| l.quantity).unwrap_or(0);
    Ok(Json(serde_json::json!({
        "item_id": item_id,
        "location_id": location_id,
        "quantity": quantity,
        "level": level,
    })))
}

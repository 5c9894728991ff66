//! HTTP handlers for item catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::services::items::{CreateItemInput, Item, ItemFilter, ItemService, UpdateItemInput};
use crate::AppState;

/// Create a catalog item
pub async fn create_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<Item>> {
    check_permission(&current_user.0, "items", "create")?;
    let service = ItemService::new(state.db);
    let item = service.create_item(input).await?;
    Ok(Json(item))
}

/// Get an item by id
pub async fn get_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    let service = ItemService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// List items, filterable by category, status and search text
pub async fn list_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<ItemFilter>,
) -> AppResult<Json<Vec<Item>>> {
    let service = ItemService::new(state.db);
    let items = service.list_items(&filter).await?;
    Ok(Json(items))
}

/// Update an item's definition
pub async fn update_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<Item>> {
    check_permission(&current_user.0, "items", "update")?;
    let service = ItemService::new(state.db);
    let item = service.update_item(item_id, input).await?;
    Ok(Json(item))
}

/// Delete an item (rejected while stock remains)
pub async fn delete_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    check_permission(&current_user.0, "items", "delete")?;
    let service = ItemService::new(state.db);
    service.delete_item(item_id).await?;
    Ok(Json(()))
}

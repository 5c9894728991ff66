//! HTTP handlers for storage location endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::services::locations::{
    CreateLocationInput, Location, LocationService, UpdateLocationInput,
};
use crate::AppState;

/// Create a storage location
pub async fn create_location(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateLocationInput>,
) -> AppResult<Json<Location>> {
    check_permission(&current_user.0, "locations", "create")?;
    let service = LocationService::new(state.db);
    let location = service.create_location(input).await?;
    Ok(Json(location))
}

/// Get a location by id
pub async fn get_location(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(location_id): Path<Uuid>,
) -> AppResult<Json<Location>> {
    let service = LocationService::new(state.db);
    let location = service.get_location(location_id).await?;
    Ok(Json(location))
}

/// List all locations
pub async fn list_locations(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Location>>> {
    let service = LocationService::new(state.db);
    let locations = service.list_locations().await?;
    Ok(Json(locations))
}

/// Update a location's labels
pub async fn update_location(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(location_id): Path<Uuid>,
    Json(input): Json<UpdateLocationInput>,
) -> AppResult<Json<Location>> {
    check_permission(&current_user.0, "locations", "update")?;
    let service = LocationService::new(state.db);
    let location = service.update_location(location_id, input).await?;
    Ok(Json(location))
}

/// Delete a location (rejected while it still holds stock)
pub async fn delete_location(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(location_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    check_permission(&current_user.0, "locations", "delete")?;
    let service = LocationService::new(state.db);
    service.delete_location(location_id).await?;
    Ok(Json(()))
}

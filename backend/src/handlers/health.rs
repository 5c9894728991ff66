//! Health check handler

use axum::{extract::State, Json};
use serde_json::json;

use crate::error::AppResult;
use crate::AppState;

/// Health check with a database round-trip
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(json!({
        "status": "ok",
        "database": "connected",
    })))
}

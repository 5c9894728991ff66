//! HTTP handlers for stock transaction endpoints

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use shared::models::{TransactionRequest, TransactionType};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

use crate::error::{AppError, AppResult};
use crate::middleware::{check_permission, CurrentUser};
use crate::services::transactions::{StockTransaction, TransactionFilter, TransactionService};
use crate::AppState;

/// Query parameters for the transaction history listing
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub item_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub transaction_type: Option<TransactionType>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Apply a stock transaction
pub async fn apply_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    headers: HeaderMap,
    Json(request): Json<TransactionRequest>,
) -> AppResult<Json<StockTransaction>> {
    check_permission(&current_user.0, "transactions", "create")?;

    // Client context captured into the audit record
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let metadata = json!({
        "role": current_user.0.role,
        "user_agent": user_agent,
    });

    let service = TransactionService::new(state.db);
    let transaction = service
        .apply(current_user.0.user_id, request, Some(metadata))
        .await?;
    Ok(Json(transaction))
}

/// List transaction history with filters and pagination.
///
/// Restricted readers see an empty page rather than an error banner; the
/// permission failure stays typed inside the service boundary.
pub async fn list_transactions(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<TransactionListQuery>,
) -> AppResult<Json<PaginatedResponse<StockTransaction>>> {
    let pagination = Pagination {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };

    if let Err(AppError::InsufficientPermissions) =
        check_permission(&current_user.0, "transactions", "read")
    {
        return Ok(Json(PaginatedResponse {
            data: vec![],
            pagination: PaginationMeta {
                page: pagination.page,
                per_page: pagination.per_page,
                total: 0,
            },
        }));
    }

    let filter = TransactionFilter {
        item_id: query.item_id,
        location_id: query.location_id,
        transaction_type: query.transaction_type,
        start: query.start,
        end: query.end,
    };

    let service = TransactionService::new(state.db);
    let transactions = service.list_transactions(&filter, &pagination).await?;
    let total = service.count_transactions(&filter).await?;

    Ok(Json(PaginatedResponse {
        data: transactions,
        pagination: PaginationMeta {
            page: pagination.page,
            per_page: pagination.per_page,
            total,
        },
    }))
}

/// Get one transaction by id
pub async fn get_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<StockTransaction>> {
    check_permission(&current_user.0, "transactions", "read")?;
    let service = TransactionService::new(state.db);
    let transaction = service.get_transaction(transaction_id).await?;
    Ok(Json(transaction))
}

//! Route definitions for the Electronics Parts Inventory Platform

use axum::{middleware, routing::get, Router};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - item catalog
        .nest("/items", item_routes())
        // Protected routes - storage locations
        .nest("/locations", location_routes())
        // Protected routes - stock ledger reads
        .nest("/stock", stock_routes())
        // Protected routes - stock transactions
        .nest("/transactions", transaction_routes())
        // Protected routes - analytics and dashboard
        .nest("/analytics", analytics_routes())
        // Protected routes - reports
        .nest("/reports", report_routes())
}

/// Item catalog routes (protected)
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/:item_id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/:item_id/stock", get(handlers::get_item_stock_levels))
        .route("/:item_id/total", get(handlers::get_item_total_on_hand))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Storage location routes (protected)
fn location_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_locations).post(handlers::create_location),
        )
        .route(
            "/:location_id",
            get(handlers::get_location)
                .put(handlers::update_location)
                .delete(handlers::delete_location),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock ledger read routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock_levels))
        .route(
            "/:item_id/:location_id",
            get(handlers::get_stock_level),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock transaction routes (protected)
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_transactions).post(handlers::apply_transaction),
        )
        .route("/:transaction_id", get(handlers::get_transaction))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Analytics routes (protected)
fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard_metrics))
        .route("/low-stock", get(handlers::get_low_stock_items))
        .route("/out-of-stock", get(handlers::get_out_of_stock_items))
        .route("/valuation", get(handlers::get_location_valuation))
        .route("/activity", get(handlers::get_transaction_activity))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Report routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(handlers::get_transaction_history_report),
        )
        .route("/valuation", get(handlers::get_valuation_report))
        .route_layer(middleware::from_fn(auth_middleware))
}

//! Business logic services for the Electronics Parts Inventory Platform

pub mod analytics;
pub mod items;
pub mod locations;
pub mod reporting;
pub mod stock;
pub mod transactions;

pub use analytics::AnalyticsService;
pub use items::ItemService;
pub use locations::LocationService;
pub use reporting::ReportingService;
pub use stock::StockService;
pub use transactions::TransactionService;

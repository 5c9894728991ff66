//! HTTP handlers for the Electronics Parts Inventory Platform

mod analytics;
mod health;
mod items;
mod locations;
mod reporting;
mod stock;
mod transactions;

pub use analytics::*;
pub use health::*;
pub use items::*;
pub use locations::*;
pub use reporting::*;
pub use stock::*;
pub use transactions::*;

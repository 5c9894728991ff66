//! Domain models for the Electronics Parts Inventory Platform

mod item;
mod transaction;

pub use item::*;
pub use transaction::*;

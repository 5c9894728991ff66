//! Shared types and models for the Electronics Parts Inventory Platform
//!
//! This crate contains domain types shared between the backend and any
//! future client-side components: the stock status classifier, transaction
//! request/record types, and validation helpers.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;

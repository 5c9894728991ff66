//! Validation utilities for the Electronics Parts Inventory Platform

use rust_decimal::Decimal;

/// Validate an item SKU: 1-64 characters, alphanumeric plus `-`, `_`, `.`
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() {
        return Err("SKU must not be empty");
    }
    if sku.len() > 64 {
        return Err("SKU must be at most 64 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err("SKU may only contain letters, digits, '-', '_' and '.'");
    }
    Ok(())
}

/// Validate a display name (item, location unit): non-blank, at most 128 chars
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name must not be blank");
    }
    if name.len() > 128 {
        return Err("Name must be at most 128 characters");
    }
    Ok(())
}

/// Validate a unit cost: non-negative
pub fn validate_unit_cost(cost: Decimal) -> Result<(), &'static str> {
    if cost < Decimal::ZERO {
        return Err("Unit cost cannot be negative");
    }
    Ok(())
}

/// Validate stock thresholds: minimum non-negative, maximum (if set) at or
/// above the minimum
pub fn validate_thresholds(minimum: i64, maximum: Option<i64>) -> Result<(), &'static str> {
    if minimum < 0 {
        return Err("Minimum stock cannot be negative");
    }
    if let Some(max) = maximum {
        if max < minimum {
            return Err("Maximum stock must be at or above minimum stock");
        }
    }
    Ok(())
}

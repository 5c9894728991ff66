//! Storage location service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::validation::validate_name;

use crate::error::{AppError, AppResult};

/// Location service for managing physical storage locations
#[derive(Clone)]
pub struct LocationService {
    db: PgPool,
}

/// A physical storage location (building/room/unit triple)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub building: Option<String>,
    pub room: Option<String>,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a location
#[derive(Debug, Deserialize)]
pub struct CreateLocationInput {
    pub building: Option<String>,
    pub room: Option<String>,
    pub unit: String,
}

/// Input for updating a location
#[derive(Debug, Deserialize)]
pub struct UpdateLocationInput {
    pub building: Option<String>,
    pub room: Option<String>,
    pub unit: Option<String>,
}

impl LocationService {
    /// Create a new LocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a storage location
    pub async fn create_location(&self, input: CreateLocationInput) -> AppResult<Location> {
        validate_name(&input.unit).map_err(|msg| AppError::Validation {
            field: "unit".to_string(),
            message: msg.to_string(),
        })?;

        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (building, room, unit)
            VALUES ($1, $2, $3)
            RETURNING id, building, room, unit, created_at, updated_at
            "#,
        )
        .bind(&input.building)
        .bind(&input.room)
        .bind(&input.unit)
        .fetch_one(&self.db)
        .await?;

        Ok(location)
    }

    /// Get a location by id
    pub async fn get_location(&self, location_id: Uuid) -> AppResult<Location> {
        let location = sqlx::query_as::<_, Location>(
            r#"
            SELECT id, building, room, unit, created_at, updated_at
            FROM locations
            WHERE id = $1
            "#,
        )
        .bind(location_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::LocationNotFound(location_id))?;

        Ok(location)
    }

    /// List all locations
    pub async fn list_locations(&self) -> AppResult<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            r#"
            SELECT id, building, room, unit, created_at, updated_at
            FROM locations
            ORDER BY building ASC NULLS LAST, room ASC NULLS LAST, unit ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(locations)
    }

    /// Update a location's labels
    pub async fn update_location(
        &self,
        location_id: Uuid,
        input: UpdateLocationInput,
    ) -> AppResult<Location> {
        let existing = self.get_location(location_id).await?;

        let building = input.building.or(existing.building);
        let room = input.room.or(existing.room);
        let unit = input.unit.unwrap_or(existing.unit);

        validate_name(&unit).map_err(|msg| AppError::Validation {
            field: "unit".to_string(),
            message: msg.to_string(),
        })?;

        let location = sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations
            SET building = $1, room = $2, unit = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, building, room, unit, created_at, updated_at
            "#,
        )
        .bind(&building)
        .bind(&room)
        .bind(&unit)
        .bind(location_id)
        .fetch_one(&self.db)
        .await?;

        Ok(location)
    }

    /// Delete a location. Rejected while any stock row for the location
    /// still holds a nonzero quantity; zero-quantity ledger rows are
    /// cleared along with it.
    pub async fn delete_location(&self, location_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let has_stock: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM stock_levels WHERE location_id = $1 AND quantity > 0)",
        )
        .bind(location_id)
        .fetch_one(&mut *tx)
        .await?;

        if has_stock {
            return Err(AppError::Conflict {
                resource: "location".to_string(),
                message: "Location still holds stock".to_string(),
            });
        }

        sqlx::query("DELETE FROM stock_levels WHERE location_id = $1")
            .bind(location_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(location_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::LocationNotFound(location_id));
        }

        tx.commit().await?;

        Ok(())
    }
}

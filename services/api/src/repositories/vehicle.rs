//! Vehicle repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{
    DriverSummary, GeoPoint, Vehicle, VehicleLocation, VehiclePayload, VehicleResponse,
    VehicleStatus,
};

const VEHICLE_WITH_DRIVER: &str = r#"
    SELECT v.id, v.plate, v.route, v.status, v.driver_id,
           v.schedule_start, v.schedule_end, v.work_days,
           v.location_lat, v.location_lng, v.location_updated_at,
           u.name AS driver_name, u.email AS driver_email
    FROM vehicles v
    LEFT JOIN users u ON u.id = v.driver_id
"#;

/// Vehicle repository
#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    /// Create a new vehicle repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_location(row: &PgRow) -> Option<VehicleLocation> {
        let lat: Option<f64> = row.get("location_lat");
        let lng: Option<f64> = row.get("location_lng");
        let updated_at: Option<DateTime<Utc>> = row.get("location_updated_at");

        match (lat, lng, updated_at) {
            (Some(lat), Some(lng), Some(updated_at)) => Some(VehicleLocation {
                lat,
                lng,
                updated_at,
            }),
            _ => None,
        }
    }

    fn map_response(row: &PgRow) -> Result<VehicleResponse> {
        let status: String = row.get("status");
        let status = VehicleStatus::parse(&status).map_err(|e| anyhow::anyhow!(e))?;

        // The join is guaranteed to match whenever driver_id is set
        let driver = row
            .get::<Option<Uuid>, _>("driver_id")
            .map(|id| DriverSummary {
                id,
                name: row.get("driver_name"),
                email: row.get("driver_email"),
            });

        Ok(VehicleResponse {
            id: row.get("id"),
            plate: row.get("plate"),
            route: row.get("route"),
            status,
            driver,
            schedule_start: row.get("schedule_start"),
            schedule_end: row.get("schedule_end"),
            work_days: row.get("work_days"),
            location: Self::map_location(row),
        })
    }

    fn map_entity(row: &PgRow) -> Result<Vehicle> {
        let status: String = row.get("status");
        let status = VehicleStatus::parse(&status).map_err(|e| anyhow::anyhow!(e))?;

        Ok(Vehicle {
            id: row.get("id"),
            plate: row.get("plate"),
            route: row.get("route"),
            status,
            driver_id: row.get("driver_id"),
            schedule_start: row.get("schedule_start"),
            schedule_end: row.get("schedule_end"),
            work_days: row.get("work_days"),
            location: Self::map_location(row),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Fetch a vehicle with its driver embedded
    pub async fn get_response(&self, id: Uuid) -> Result<Option<VehicleResponse>> {
        let row = sqlx::query(&format!("{VEHICLE_WITH_DRIVER} WHERE v.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::map_response).transpose()
    }

    /// Get all vehicles with their drivers embedded, newest first
    pub async fn get_all(&self) -> Result<Vec<VehicleResponse>> {
        let rows = sqlx::query(&format!("{VEHICLE_WITH_DRIVER} ORDER BY v.created_at DESC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::map_response).collect()
    }

    /// Find a vehicle by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>> {
        let row = sqlx::query(
            r#"
            SELECT id, plate, route, status, driver_id,
                   schedule_start, schedule_end, work_days,
                   location_lat, location_lng, location_updated_at,
                   created_at, updated_at
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::map_entity).transpose()
    }

    /// Check whether a plate is already registered, optionally ignoring one
    /// vehicle (the one being updated)
    pub async fn plate_in_use(&self, plate: &str, exclude_id: Option<Uuid>) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM vehicles
            WHERE plate = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(plate)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    /// Create a new vehicle
    pub async fn create(&self, payload: &VehiclePayload) -> Result<VehicleResponse> {
        info!("Creating new vehicle: {}", payload.plate);

        let row = sqlx::query(
            r#"
            INSERT INTO vehicles (plate, route, status, driver_id, schedule_start, schedule_end, work_days)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&payload.plate)
        .bind(&payload.route)
        .bind(payload.status.as_str())
        .bind(payload.driver_id)
        .bind(&payload.schedule_start)
        .bind(&payload.schedule_end)
        .bind(&payload.work_days)
        .fetch_one(&self.pool)
        .await?;

        let id: Uuid = row.get("id");
        self.get_response(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Created vehicle disappeared: {}", id))
    }

    /// Update a vehicle, including its (nullable) driver assignment
    pub async fn update(
        &self,
        id: Uuid,
        payload: &VehiclePayload,
    ) -> Result<Option<VehicleResponse>> {
        info!("Updating vehicle: {}", id);

        let row = sqlx::query(
            r#"
            UPDATE vehicles
            SET plate = $1,
                route = $2,
                status = $3,
                driver_id = $4,
                schedule_start = $5,
                schedule_end = $6,
                work_days = $7,
                updated_at = now()
            WHERE id = $8
            RETURNING id
            "#,
        )
        .bind(&payload.plate)
        .bind(&payload.route)
        .bind(payload.status.as_str())
        .bind(payload.driver_id)
        .bind(&payload.schedule_start)
        .bind(&payload.schedule_end)
        .bind(&payload.work_days)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(_) => self.get_response(id).await,
            None => Ok(None),
        }
    }

    /// Delete a vehicle
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting vehicle: {}", id);

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record the position a driver reported for a vehicle
    pub async fn update_location(
        &self,
        id: Uuid,
        point: &GeoPoint,
    ) -> Result<Option<VehicleResponse>> {
        let row = sqlx::query(
            r#"
            UPDATE vehicles
            SET location_lat = $1,
                location_lng = $2,
                location_updated_at = now(),
                updated_at = now()
            WHERE id = $3
            RETURNING id
            "#,
        )
        .bind(point.lat)
        .bind(point.lng)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(_) => self.get_response(id).await,
            None => Ok(None),
        }
    }

    /// The active vehicle assigned to a driver, if any
    pub async fn find_active_by_driver(&self, driver_id: Uuid) -> Result<Option<VehicleResponse>> {
        let row = sqlx::query(&format!(
            "{VEHICLE_WITH_DRIVER} WHERE v.driver_id = $1 AND v.status = 'activo'"
        ))
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::map_response).transpose()
    }

    /// Count all vehicles
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM vehicles")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    /// Count vehicles in a given status
    pub async fn count_by_status(&self, status: VehicleStatus) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM vehicles WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }
}

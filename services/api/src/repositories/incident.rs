//! Incident repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{
    CreateIncidentRequest, DriverSummary, IncidentDetail, IncidentResponse, IncidentStatus,
    VehicleSummary,
};

const INCIDENT_WITH_RELATIONS: &str = r#"
    SELECT i.id, i.description, i.vehicle_id, i.driver_id, i.status, i.image_url, i.reported_at,
           v.plate AS vehicle_plate, v.route AS vehicle_route,
           u.name AS driver_name, u.email AS driver_email
    FROM incidents i
    JOIN vehicles v ON v.id = i.vehicle_id
    JOIN users u ON u.id = i.driver_id
"#;

/// Incident repository
#[derive(Clone)]
pub struct IncidentRepository {
    pool: PgPool,
}

impl IncidentRepository {
    /// Create a new incident repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_status(row: &PgRow) -> Result<IncidentStatus> {
        let status: String = row.get("status");
        IncidentStatus::parse(&status).map_err(|e| anyhow::anyhow!(e))
    }

    fn map_response(row: &PgRow) -> Result<IncidentResponse> {
        Ok(IncidentResponse {
            id: row.get("id"),
            description: row.get("description"),
            vehicle_id: row.get("vehicle_id"),
            driver_id: row.get("driver_id"),
            status: Self::map_status(row)?,
            image_url: row.get("image_url"),
            reported_at: row.get("reported_at"),
        })
    }

    fn map_detail(row: &PgRow) -> Result<IncidentDetail> {
        Ok(IncidentDetail {
            id: row.get("id"),
            description: row.get("description"),
            vehicle: VehicleSummary {
                id: row.get("vehicle_id"),
                plate: row.get("vehicle_plate"),
                route: row.get("vehicle_route"),
            },
            driver: DriverSummary {
                id: row.get("driver_id"),
                name: row.get("driver_name"),
                email: row.get("driver_email"),
            },
            status: Self::map_status(row)?,
            image_url: row.get("image_url"),
            reported_at: row.get("reported_at"),
        })
    }

    /// Record a new incident reported by a driver
    pub async fn create(
        &self,
        driver_id: Uuid,
        payload: &CreateIncidentRequest,
    ) -> Result<IncidentResponse> {
        info!(
            "Creating incident for vehicle {} by driver {}",
            payload.vehicle_id, driver_id
        );

        let row = sqlx::query(
            r#"
            INSERT INTO incidents (description, vehicle_id, driver_id, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, description, vehicle_id, driver_id, status, image_url, reported_at
            "#,
        )
        .bind(&payload.description)
        .bind(payload.vehicle_id)
        .bind(driver_id)
        .bind(&payload.image_url)
        .fetch_one(&self.pool)
        .await?;

        Self::map_response(&row)
    }

    /// Fetch one incident with its reporter and vehicle embedded
    pub async fn get_detail(&self, id: Uuid) -> Result<Option<IncidentDetail>> {
        let row = sqlx::query(&format!("{INCIDENT_WITH_RELATIONS} WHERE i.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::map_detail).transpose()
    }

    /// All incidents, newest first, reporter and vehicle embedded
    pub async fn get_all_detailed(&self) -> Result<Vec<IncidentDetail>> {
        let rows = sqlx::query(&format!(
            "{INCIDENT_WITH_RELATIONS} ORDER BY i.reported_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_detail).collect()
    }

    /// Incidents reported for one vehicle, newest first
    pub async fn get_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<IncidentDetail>> {
        let rows = sqlx::query(&format!(
            "{INCIDENT_WITH_RELATIONS} WHERE i.vehicle_id = $1 ORDER BY i.reported_at DESC"
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_detail).collect()
    }

    /// A driver's still-pending incidents, newest first
    pub async fn pending_by_driver(&self, driver_id: Uuid) -> Result<Vec<IncidentResponse>> {
        let rows = sqlx::query(
            r#"
            SELECT id, description, vehicle_id, driver_id, status, image_url, reported_at
            FROM incidents
            WHERE driver_id = $1 AND status = 'pendiente'
            ORDER BY reported_at DESC
            "#,
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_response).collect()
    }

    /// Update an incident's resolution status
    pub async fn update_status(
        &self,
        id: Uuid,
        status: IncidentStatus,
    ) -> Result<Option<IncidentDetail>> {
        info!("Updating incident {} to status {}", id, status.as_str());

        let row = sqlx::query(
            r#"
            UPDATE incidents
            SET status = $1
            WHERE id = $2
            RETURNING id
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(_) => self.get_detail(id).await,
            None => Ok(None),
        }
    }
}

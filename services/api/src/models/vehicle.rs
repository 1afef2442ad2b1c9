//! Vehicle model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{DriverSummary, GeoPoint};

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
}

impl VehicleStatus {
    /// The wire/storage literal for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "activo",
            VehicleStatus::Inactive => "inactivo",
        }
    }

    /// Parse a stored status value
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "activo" => Ok(VehicleStatus::Active),
            "inactivo" => Ok(VehicleStatus::Inactive),
            other => Err(format!("Unknown vehicle status: {}", other)),
        }
    }
}

/// Last reported position of a vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "ultimaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

/// Vehicle entity
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub route: String,
    pub status: VehicleStatus,
    pub driver_id: Option<Uuid>,
    pub schedule_start: String,
    pub schedule_end: String,
    pub work_days: Vec<String>,
    pub location: Option<VehicleLocation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vehicle create/update payload
#[derive(Debug, Clone, Deserialize)]
pub struct VehiclePayload {
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "ruta")]
    pub route: String,
    #[serde(rename = "estado")]
    pub status: VehicleStatus,
    #[serde(rename = "conductor", default)]
    pub driver_id: Option<Uuid>,
    #[serde(rename = "horarioInicio")]
    pub schedule_start: String,
    #[serde(rename = "horarioFin")]
    pub schedule_end: String,
    #[serde(rename = "diasTrabajo")]
    pub work_days: Vec<String>,
}

/// Vehicle representation with the assigned driver embedded
#[derive(Debug, Clone, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "ruta")]
    pub route: String,
    #[serde(rename = "estado")]
    pub status: VehicleStatus,
    #[serde(rename = "conductor")]
    pub driver: Option<DriverSummary>,
    #[serde(rename = "horarioInicio")]
    pub schedule_start: String,
    #[serde(rename = "horarioFin")]
    pub schedule_end: String,
    #[serde(rename = "diasTrabajo")]
    pub work_days: Vec<String>,
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
    pub location: Option<VehicleLocation>,
}

/// Driver location report for an assigned vehicle
#[derive(Debug, Clone, Deserialize)]
pub struct LocationUpdateRequest {
    #[serde(rename = "camionId")]
    pub vehicle_id: Uuid,
    #[serde(rename = "ubicacion")]
    pub location: GeoPoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_literals() {
        assert_eq!(serde_json::to_string(&VehicleStatus::Active).unwrap(), "\"activo\"");
        assert_eq!(serde_json::to_string(&VehicleStatus::Inactive).unwrap(), "\"inactivo\"");
        assert!(serde_json::from_str::<VehicleStatus>("\"retirado\"").is_err());
        assert_eq!(VehicleStatus::parse("inactivo").unwrap(), VehicleStatus::Inactive);
        assert!(VehicleStatus::parse("Active").is_err());
    }

    #[test]
    fn test_vehicle_payload_wire_names() {
        let payload: VehiclePayload = serde_json::from_str(
            r#"{
                "placa": "ABP468B",
                "ruta": "Centro - Norte",
                "estado": "activo",
                "horarioInicio": "05:00",
                "horarioFin": "22:00",
                "diasTrabajo": ["lunes", "martes"]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.plate, "ABP468B");
        assert_eq!(payload.status, VehicleStatus::Active);
        assert!(payload.driver_id.is_none());
        assert_eq!(payload.work_days, vec!["lunes", "martes"]);
    }

    #[test]
    fn test_location_serializes_update_timestamp() {
        let location = VehicleLocation {
            lat: 19.43,
            lng: -99.13,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&location).unwrap();
        assert!(json.get("ultimaActualizacion").is_some());
    }
}

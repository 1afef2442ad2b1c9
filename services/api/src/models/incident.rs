//! Incident model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::DriverSummary;

/// Resolution state of an incident report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_proceso")]
    InProgress,
    #[serde(rename = "resuelta")]
    Resolved,
}

impl IncidentStatus {
    /// The wire/storage literal for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Pending => "pendiente",
            IncidentStatus::InProgress => "en_proceso",
            IncidentStatus::Resolved => "resuelta",
        }
    }

    /// Parse a stored status value
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "pendiente" => Ok(IncidentStatus::Pending),
            "en_proceso" => Ok(IncidentStatus::InProgress),
            "resuelta" => Ok(IncidentStatus::Resolved),
            other => Err(format!("Unknown incident status: {}", other)),
        }
    }
}

/// Incident report payload from a driver
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIncidentRequest {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "camionId")]
    pub vehicle_id: Uuid,
    #[serde(rename = "imagen", default)]
    pub image_url: Option<String>,
}

/// Status update payload for an incident
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIncidentStatusRequest {
    #[serde(rename = "estado")]
    pub status: IncidentStatus,
}

/// Incident representation with foreign keys only, used on driver-facing
/// endpoints
#[derive(Debug, Clone, Serialize)]
pub struct IncidentResponse {
    pub id: Uuid,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "camionId")]
    pub vehicle_id: Uuid,
    #[serde(rename = "conductorId")]
    pub driver_id: Uuid,
    #[serde(rename = "estado")]
    pub status: IncidentStatus,
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "fecha")]
    pub reported_at: DateTime<Utc>,
}

/// Vehicle identity embedded in incident listings
#[derive(Debug, Clone, Serialize)]
pub struct VehicleSummary {
    pub id: Uuid,
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "ruta")]
    pub route: String,
}

/// Incident representation with its reporter and vehicle embedded, used on
/// listings
#[derive(Debug, Clone, Serialize)]
pub struct IncidentDetail {
    pub id: Uuid,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "camionId")]
    pub vehicle: VehicleSummary,
    #[serde(rename = "conductorId")]
    pub driver: DriverSummary,
    #[serde(rename = "estado")]
    pub status: IncidentStatus,
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "fecha")]
    pub reported_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_literals() {
        assert_eq!(serde_json::to_string(&IncidentStatus::Pending).unwrap(), "\"pendiente\"");
        assert_eq!(serde_json::to_string(&IncidentStatus::InProgress).unwrap(), "\"en_proceso\"");
        assert_eq!(serde_json::to_string(&IncidentStatus::Resolved).unwrap(), "\"resuelta\"");
        assert!(serde_json::from_str::<IncidentStatus>("\"cerrada\"").is_err());
        assert_eq!(IncidentStatus::parse("en_proceso").unwrap(), IncidentStatus::InProgress);
        assert!(IncidentStatus::parse("abierta").is_err());
    }

    #[test]
    fn test_create_request_image_optional() {
        let req: CreateIncidentRequest = serde_json::from_str(&format!(
            r#"{{"descripcion":"Llanta ponchada","camionId":"{}"}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        assert!(req.image_url.is_none());
    }
}

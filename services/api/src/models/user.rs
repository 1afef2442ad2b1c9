//! User model and related payloads
//!
//! Field names on the wire keep the Spanish contract of the original
//! fleet application; struct fields and database columns are English.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role, a fixed closed set
///
/// Wire and storage values are the pinned literals `pasajero`, `conductor`
/// and `admin`. Unknown values are rejected at the serde boundary and at
/// row-mapping time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "pasajero")]
    Passenger,
    #[serde(rename = "conductor")]
    Driver,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    /// The wire/storage literal for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Passenger => "pasajero",
            Role::Driver => "conductor",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored role value, rejecting anything outside the closed set
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "pasajero" => Ok(Role::Passenger),
            "conductor" => Ok(Role::Driver),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// User entity
///
/// `route` and `location` are only meaningful for drivers. The password
/// hash never leaves the repository layer in a response.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub route: Option<String>,
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "ubicacion", default)]
    pub location: Option<GeoPoint>,
    #[serde(rename = "ruta", default)]
    pub route: Option<String>,
}

/// User update payload; the password is only re-hashed when supplied
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "ubicacion", default)]
    pub location: Option<GeoPoint>,
    #[serde(rename = "ruta", default)]
    pub route: Option<String>,
}

/// Sanitized user representation, password hash stripped
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(rename = "ruta", skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            location: user.location,
            route: user.route,
        }
    }
}

/// Driver identity embedded in vehicle and incident listings
#[derive(Debug, Clone, Serialize)]
pub struct DriverSummary {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_literals() {
        assert_eq!(serde_json::to_string(&Role::Passenger).unwrap(), "\"pasajero\"");
        assert_eq!(serde_json::to_string(&Role::Driver).unwrap(), "\"conductor\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Passenger, Role::Driver, Role::Admin] {
            let json = serde_json::to_string(&role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_rejects_unknown_values() {
        assert!(serde_json::from_str::<Role>("\"superadmin\"").is_err());
        assert!(Role::parse("root").is_err());
        // Variant identifiers are not valid wire values
        assert!(serde_json::from_str::<Role>("\"Driver\"").is_err());
    }

    #[test]
    fn test_user_response_strips_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: Role::Driver,
            route: Some("Ruta 12".to_string()),
            location: Some(GeoPoint { lat: 19.43, lng: -99.13 }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["rol"], "conductor");
        assert_eq!(json["nombre"], "Ana");
        assert_eq!(json["ruta"], "Ruta 12");
    }

    #[test]
    fn test_create_user_request_optional_fields() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"nombre":"Luis","email":"luis@x.com","password":"secret1","rol":"pasajero"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::Passenger);
        assert!(req.location.is_none());
        assert!(req.route.is_none());
    }
}

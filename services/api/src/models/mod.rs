//! API service models

pub mod incident;
pub mod user;
pub mod vehicle;

// Re-export for convenience
pub use incident::{
    CreateIncidentRequest, IncidentDetail, IncidentResponse, IncidentStatus,
    UpdateIncidentStatusRequest, VehicleSummary,
};
pub use user::{
    CreateUserRequest, DriverSummary, GeoPoint, Role, UpdateUserRequest, User, UserResponse,
};
pub use vehicle::{
    LocationUpdateRequest, Vehicle, VehicleLocation, VehiclePayload, VehicleResponse,
    VehicleStatus,
};

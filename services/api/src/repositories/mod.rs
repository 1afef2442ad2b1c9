//! Repositories for database operations

pub mod incident;
pub mod user;
pub mod vehicle;

// Re-export for convenience
pub use incident::IncidentRepository;
pub use user::UserRepository;
pub use vehicle::VehicleRepository;

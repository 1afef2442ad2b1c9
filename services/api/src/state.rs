//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::TokenService;
use crate::repositories::{IncidentRepository, UserRepository, VehicleRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub vehicle_repository: VehicleRepository,
    pub incident_repository: IncidentRepository,
    pub token_service: TokenService,
}

//! API service routes
//!
//! `/health` and `/api/login` are public; everything else sits behind the
//! authentication middleware, with per-handler role checks where the
//! operation is role-specific.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware, require_role},
    models::{
        CreateIncidentRequest, CreateUserRequest, LocationUpdateRequest, Role,
        UpdateIncidentStatusRequest, UpdateUserRequest, UserResponse, VehiclePayload,
        VehicleResponse, VehicleStatus,
    },
    state::AppState,
    validation,
};

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: UserResponse,
}

/// Response for the admin dashboard counters
#[derive(Serialize)]
pub struct DashboardStats {
    #[serde(rename = "totalUsuarios")]
    pub total_users: i64,
    #[serde(rename = "totalConductores")]
    pub total_drivers: i64,
    #[serde(rename = "totalPasajeros")]
    pub total_passengers: i64,
    #[serde(rename = "totalCamiones")]
    pub total_vehicles: i64,
    #[serde(rename = "camionesActivos")]
    pub active_vehicles: i64,
    #[serde(rename = "camionesInactivos")]
    pub inactive_vehicles: i64,
}

/// Response for a driver's own dashboard
#[derive(Serialize)]
pub struct DriverInfoResponse {
    #[serde(rename = "usuario")]
    pub user: UserResponse,
    #[serde(rename = "camionAsignado")]
    pub vehicle: VehicleResponse,
}

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/usuarios", get(list_users).post(create_user))
        .route("/api/usuarios/:id", put(update_user).delete(delete_user))
        .route("/api/camiones", get(list_vehicles).post(create_vehicle))
        .route("/api/camiones/:id", put(update_vehicle).delete(delete_vehicle))
        .route("/api/camiones/:id/incidencias", get(vehicle_incidents))
        .route("/api/conductores-disponibles", get(available_drivers))
        .route("/api/admin/incidencias", get(list_incidents))
        .route("/api/admin/incidencias/:id", put(update_incident_status))
        .route("/api/admin/:id", get(admin_profile))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .route("/api/conductor/info", get(driver_info))
        .route("/api/conductor/incidencias-pendientes", get(pending_incidents))
        .route("/api/conductor/incidencias", post(report_incident))
        .route("/api/conductor/ubicacion", put(update_location))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/login", post(login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    Json(json!({
        "status": "ok",
        "service": "fleet-api",
        "database": database
    }))
}

/// User login endpoint
///
/// Unknown email and wrong password produce the identical error.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for {}", payload.email);

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::InvalidCredentials)?;

    if !crate::password::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.token_service.issue(&user).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// List all users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    let users = state.user_repository.get_all().await.map_err(|e| {
        error!("Failed to list users: {}", e);
        ApiError::Internal
    })?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

/// Create a new user (admin)
pub async fn create_user(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    validation::validate_name(&payload.name).map_err(ApiError::Validation)?;
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    validation::validate_password(&payload.password).map_err(ApiError::Validation)?;

    let taken = state
        .user_repository
        .email_in_use(&payload.email, None)
        .await
        .map_err(|e| {
            error!("Failed to check email uniqueness: {}", e);
            ApiError::Internal
        })?;
    if taken {
        return Err(ApiError::Validation("Email is already registered".to_string()));
    }

    let user = state.user_repository.create(&payload).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        ApiError::Internal
    })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Update a user (admin); password is only re-hashed when supplied
pub async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    validation::validate_name(&payload.name).map_err(ApiError::Validation)?;
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    if let Some(password) = &payload.password {
        validation::validate_password(password).map_err(ApiError::Validation)?;
    }

    let taken = state
        .user_repository
        .email_in_use(&payload.email, Some(id))
        .await
        .map_err(|e| {
            error!("Failed to check email uniqueness: {}", e);
            ApiError::Internal
        })?;
    if taken {
        return Err(ApiError::Validation("Email is already registered".to_string()));
    }

    let user = state
        .user_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update user: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    let deleted = state.user_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete user: {}", e);
        ApiError::Internal
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("User"))
    }
}

/// List all vehicles with their drivers embedded (any authenticated role)
pub async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicles = state.vehicle_repository.get_all().await.map_err(|e| {
        error!("Failed to list vehicles: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(vehicles))
}

fn validate_vehicle_payload(payload: &VehiclePayload) -> Result<(), ApiError> {
    validation::validate_plate(&payload.plate).map_err(ApiError::Validation)?;
    validation::validate_route(&payload.route).map_err(ApiError::Validation)?;
    validation::validate_schedule_time(&payload.schedule_start).map_err(ApiError::Validation)?;
    validation::validate_schedule_time(&payload.schedule_end).map_err(ApiError::Validation)?;
    validation::validate_work_days(&payload.work_days).map_err(ApiError::Validation)?;
    Ok(())
}

/// Create a new vehicle (admin)
pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Json(mut payload): Json<VehiclePayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    payload.plate = payload.plate.trim().to_uppercase();
    validate_vehicle_payload(&payload)?;

    let taken = state
        .vehicle_repository
        .plate_in_use(&payload.plate, None)
        .await
        .map_err(|e| {
            error!("Failed to check plate uniqueness: {}", e);
            ApiError::Internal
        })?;
    if taken {
        return Err(ApiError::Validation("Plate is already registered".to_string()));
    }

    let vehicle = state
        .vehicle_repository
        .create(&payload)
        .await
        .map_err(|e| {
            error!("Failed to create vehicle: {}", e);
            ApiError::Internal
        })?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Update a vehicle (admin)
pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<VehiclePayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    payload.plate = payload.plate.trim().to_uppercase();
    validate_vehicle_payload(&payload)?;

    let taken = state
        .vehicle_repository
        .plate_in_use(&payload.plate, Some(id))
        .await
        .map_err(|e| {
            error!("Failed to check plate uniqueness: {}", e);
            ApiError::Internal
        })?;
    if taken {
        return Err(ApiError::Validation("Plate is already registered".to_string()));
    }

    let vehicle = state
        .vehicle_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update vehicle: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("Vehicle"))?;

    Ok(Json(vehicle))
}

/// Delete a vehicle (admin)
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    let deleted = state.vehicle_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete vehicle: {}", e);
        ApiError::Internal
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Vehicle"))
    }
}

/// Incidents reported for one vehicle (any authenticated role)
pub async fn vehicle_incidents(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let incidents = state
        .incident_repository
        .get_by_vehicle(id)
        .await
        .map_err(|e| {
            error!("Failed to list vehicle incidents: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(incidents))
}

/// Drivers not assigned to any active vehicle (admin)
pub async fn available_drivers(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    let drivers = state
        .user_repository
        .available_drivers()
        .await
        .map_err(|e| {
            error!("Failed to list available drivers: {}", e);
            ApiError::Internal
        })?;

    let drivers: Vec<UserResponse> = drivers.into_iter().map(UserResponse::from).collect();
    Ok(Json(drivers))
}

/// All incidents with reporter and vehicle embedded (admin)
pub async fn list_incidents(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    let incidents = state
        .incident_repository
        .get_all_detailed()
        .await
        .map_err(|e| {
            error!("Failed to list incidents: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(incidents))
}

/// Update an incident's resolution status (admin)
pub async fn update_incident_status(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIncidentStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    let incident = state
        .incident_repository
        .update_status(id, payload.status)
        .await
        .map_err(|e| {
            error!("Failed to update incident: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("Incident"))?;

    Ok(Json(incident))
}

/// Fetch an administrator's profile (admin)
pub async fn admin_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    let user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to look up administrator: {}", e);
            ApiError::Internal
        })?
        .filter(|user| user.role == Role::Admin)
        .ok_or(ApiError::NotFound("Administrator"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Fleet-wide counters for the admin dashboard (admin)
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Admin)?;

    let internal = |e: anyhow::Error| {
        error!("Failed to compute dashboard stats: {}", e);
        ApiError::Internal
    };

    let total_users = state.user_repository.count().await.map_err(internal)?;
    let total_drivers = state
        .user_repository
        .count_by_role(Role::Driver)
        .await
        .map_err(internal)?;
    let total_passengers = state
        .user_repository
        .count_by_role(Role::Passenger)
        .await
        .map_err(internal)?;
    let total_vehicles = state.vehicle_repository.count().await.map_err(internal)?;
    let active_vehicles = state
        .vehicle_repository
        .count_by_status(VehicleStatus::Active)
        .await
        .map_err(internal)?;

    Ok(Json(DashboardStats {
        total_users,
        total_drivers,
        total_passengers,
        total_vehicles,
        active_vehicles,
        inactive_vehicles: total_vehicles - active_vehicles,
    }))
}

/// A driver's own profile plus the active vehicle assigned to them
/// (conductor)
pub async fn driver_info(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Driver)?;

    let user = state
        .user_repository
        .find_by_id(principal.id)
        .await
        .map_err(|e| {
            error!("Failed to look up driver: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("User"))?;

    let vehicle = state
        .vehicle_repository
        .find_active_by_driver(principal.id)
        .await
        .map_err(|e| {
            error!("Failed to look up assigned vehicle: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("Assigned vehicle"))?;

    Ok(Json(DriverInfoResponse {
        user: UserResponse::from(user),
        vehicle,
    }))
}

/// A driver's pending incidents (conductor)
pub async fn pending_incidents(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Driver)?;

    let incidents = state
        .incident_repository
        .pending_by_driver(principal.id)
        .await
        .map_err(|e| {
            error!("Failed to list pending incidents: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(incidents))
}

/// Report a new incident (conductor)
pub async fn report_incident(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Json(payload): Json<CreateIncidentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Driver)?;

    validation::validate_description(&payload.description).map_err(ApiError::Validation)?;

    state
        .vehicle_repository
        .find_by_id(payload.vehicle_id)
        .await
        .map_err(|e| {
            error!("Failed to look up vehicle: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("Vehicle"))?;

    let incident = state
        .incident_repository
        .create(principal.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create incident: {}", e);
            ApiError::Internal
        })?;

    Ok((StatusCode::CREATED, Json(incident)))
}

/// Record the caller's position for their assigned vehicle (conductor)
///
/// Only the driver currently assigned to the vehicle may update its
/// location.
pub async fn update_location(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Json(payload): Json<LocationUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&principal, Role::Driver)?;

    let vehicle = state
        .vehicle_repository
        .find_by_id(payload.vehicle_id)
        .await
        .map_err(|e| {
            error!("Failed to look up vehicle: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("Vehicle"))?;

    if vehicle.driver_id != Some(principal.id) {
        return Err(ApiError::Forbidden);
    }

    let vehicle = state
        .vehicle_repository
        .update_location(payload.vehicle_id, &payload.location)
        .await
        .map_err(|e| {
            error!("Failed to update vehicle location: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("Vehicle"))?;

    Ok(Json(vehicle))
}

//! User repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{CreateUserRequest, GeoPoint, Role, UpdateUserRequest, User};
use crate::password;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, route, location_lat, location_lng, created_at, updated_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Result<User> {
        let role: String = row.get("role");
        let role = Role::parse(&role).map_err(|e| anyhow::anyhow!(e))?;

        let lat: Option<f64> = row.get("location_lat");
        let lng: Option<f64> = row.get("location_lng");
        let location = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };

        Ok(User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role,
            route: row.get("route"),
            location,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Create a new user with a freshly hashed password
    pub async fn create(&self, payload: &CreateUserRequest) -> Result<User> {
        info!("Creating new user: {}", payload.email);

        let password_hash = password::hash_password(&payload.password)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role, route, location_lat, location_lng)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&password_hash)
        .bind(payload.role.as_str())
        .bind(&payload.route)
        .bind(payload.location.map(|l| l.lat))
        .bind(payload.location.map(|l| l.lng))
        .fetch_one(&self.pool)
        .await?;

        Self::map_row(&row)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
            "#,
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// Get all users, newest first
    pub async fn get_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    /// Check whether an email is already registered, optionally ignoring one
    /// user (the one being updated)
    pub async fn email_in_use(&self, email: &str, exclude_id: Option<Uuid>) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM users
            WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    /// Update a user; the password is only re-hashed when a new one is
    /// supplied
    pub async fn update(&self, id: Uuid, payload: &UpdateUserRequest) -> Result<Option<User>> {
        info!("Updating user: {}", id);

        let password_hash = match &payload.password {
            Some(password) => Some(password::hash_password(password)?),
            None => None,
        };

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET name = $1,
                email = $2,
                role = $3,
                route = $4,
                location_lat = $5,
                location_lng = $6,
                password_hash = COALESCE($7, password_hash),
                updated_at = now()
            WHERE id = $8
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(payload.role.as_str())
        .bind(&payload.route)
        .bind(payload.location.map(|l| l.lat))
        .bind(payload.location.map(|l| l.lng))
        .bind(password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// Delete a user
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all users
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    /// Count users holding a given role
    pub async fn count_by_role(&self, role: Role) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    /// Drivers not currently assigned to any active vehicle
    pub async fn available_drivers(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE role = 'conductor'
              AND id NOT IN (
                  SELECT driver_id FROM vehicles
                  WHERE status = 'activo' AND driver_id IS NOT NULL
              )
            ORDER BY name
            "#,
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }
}

//! Fleet-tracking API service
//!
//! HTTP backend for the fleet application: JWT authentication, role-based
//! access control, and CRUD over users, vehicles, and incidents.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

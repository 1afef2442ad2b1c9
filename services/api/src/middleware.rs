//! Authentication middleware and role guard

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, models::Role, state::AppState};

/// Authenticated identity attached to a request after token verification
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Extract and validate the bearer token from the Authorization header
///
/// On success the decoded principal is inserted into the request extensions
/// for downstream handlers. Verification failures are not distinguished to
/// the caller beyond a generic invalid-token error.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::MissingToken)?;

    let claims = state.token_service.verify(token).map_err(|e| {
        warn!("Token verification failed: {}", e);
        ApiError::InvalidToken
    })?;

    let user = AuthUser {
        id: claims.sub,
        email: claims.email,
        role: claims.rol,
    };

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Deny unless the principal holds the required role
pub fn require_role(user: &AuthUser, role: Role) -> Result<(), ApiError> {
    if user.role == role {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_role_allows_matching_role() {
        assert!(require_role(&principal(Role::Admin), Role::Admin).is_ok());
        assert!(require_role(&principal(Role::Driver), Role::Driver).is_ok());
    }

    #[test]
    fn test_require_role_denies_other_roles() {
        assert!(matches!(
            require_role(&principal(Role::Driver), Role::Admin),
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            require_role(&principal(Role::Passenger), Role::Driver),
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            require_role(&principal(Role::Admin), Role::Driver),
            Err(ApiError::Forbidden)
        ));
    }
}

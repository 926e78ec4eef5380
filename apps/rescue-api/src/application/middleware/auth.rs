use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use core_lib::{Principal, domain::user::UserRole};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::AppState;

/// Caller identity attached to the request once its bearer token checks out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Option<i64>,
    pub email: String,
    pub role: UserRole,
    pub tenant_id: Option<String>,
}

impl Principal for AuthenticatedUser {
    fn username(&self) -> &str {
        &self.email
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authenticates requests with a session token in the Authorization header.
/// Any token failure, expiry included, ends in 401.
pub async fn jwt_auth(
    State(app_state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = bearer_token(&req) else {
        warn!("Token authentication failed: missing, empty, or invalid Authorization header.");
        return Err(StatusCode::UNAUTHORIZED);
    };

    // Signature and expiry are checked once here
    let claims = app_state.tokens.decode_claims(token).map_err(|e| {
        warn!("Rejected token: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    let user = match app_state.users.find_by_email(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Token subject {} no longer exists", claims.sub);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(e) => {
            warn!("User lookup failed during authentication: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    if claims.sub != user.username() {
        warn!("Token subject {} does not match {}", claims.sub, user.email);
        return Err(StatusCode::UNAUTHORIZED);
    }

    debug!("Token authenticated for user: {}", user.email);
    req.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
        tenant_id: user.tenant_id,
    });
    Ok(next.run(req).await)
}

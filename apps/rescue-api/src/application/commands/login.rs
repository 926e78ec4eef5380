use crate::{
    AppState,
    application::{ApplicationError, token::TokenService},
    map_application_error,
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use core_lib::{PasswordEncoder, UserRepository, domain::user::UserRole};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub role: UserRole,
    pub expires_at: DateTime<Utc>,
}

/// Exchanges email and password for a session token.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordEncoder>,
    tokens: Arc<TokenService>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordEncoder>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn handle(&self, request: LoginRequest) -> Result<LoginResponse, ApplicationError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(ApplicationError::Validation(
                "Email and password are required".into(),
            ));
        }

        // Same message for unknown email and wrong password
        let invalid = || ApplicationError::Unauthorized("Invalid credentials".into());

        let user = self
            .users
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(invalid)?;

        if !self.passwords.matches(&request.password, &user.password_hash) {
            warn!("Failed login attempt for {}", user.email);
            return Err(invalid());
        }

        let mut claims = Map::new();
        claims.insert("role".into(), Value::from(user.role.as_str()));
        if let Some(tenant_id) = &user.tenant_id {
            claims.insert("tenant_id".into(), Value::from(tenant_id.as_str()));
        }

        let issued_at = Utc::now();
        let token = self.tokens.generate_token_at(&user, claims, issued_at)?;

        info!("User {} logged in", user.email);
        Ok(LoginResponse {
            token,
            email: user.email,
            role: user.role,
            expires_at: issued_at + self.tokens.ttl(),
        })
    }
}

pub async fn handle_login_request(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    let handler = LoginHandler::new(
        state.users.clone(),
        state.passwords.clone(),
        state.tokens.clone(),
    );
    handler
        .handle(payload)
        .await
        .map(Json)
        .map_err(map_application_error)
}

use axum::{
    Json, Router,
    extract::Extension,
    middleware,
    routing::{get, post},
};
use core_lib::{
    AdoptionRepository, BreedRepository, CatRepository, CoreError, PasswordEncoder,
    UserRepository,
};
use http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

pub mod application;
pub mod config;

use application::{
    ApplicationError,
    commands::login::handle_login_request,
    middleware::{AuthenticatedUser, jwt_auth},
    token::{TokenError, TokenService},
};

// Holds shared dependencies
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub cats: Arc<dyn CatRepository>,
    pub breeds: Arc<dyn BreedRepository>,
    pub adoptions: Arc<dyn AdoptionRepository>,
    pub passwords: Arc<dyn PasswordEncoder>,
    pub tokens: Arc<TokenService>,
}

pub fn create_app(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(handle_login_request))
        .route(
            "/auth/me",
            get(current_user).route_layer(middleware::from_fn_with_state(
                app_state.clone(),
                jwt_auth,
            )),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn current_user(Extension(user): Extension<AuthenticatedUser>) -> Json<AuthenticatedUser> {
    Json(user)
}

pub fn map_core_error(err: CoreError) -> StatusCode {
    error!("CoreError occurred: {:?}", err);
    match err {
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::AlreadyExists(_) => StatusCode::CONFLICT,
        CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CoreError::Infrastructure(_) | CoreError::Configuration(_) | CoreError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn map_application_error(err: ApplicationError) -> StatusCode {
    match err {
        ApplicationError::Core(core) => map_core_error(core),
        ApplicationError::Validation(msg) => {
            warn!("Rejected request: {}", msg);
            StatusCode::BAD_REQUEST
        }
        ApplicationError::Unauthorized(msg) => {
            warn!("Unauthorized: {}", msg);
            StatusCode::UNAUTHORIZED
        }
        ApplicationError::Token(
            TokenError::Signature | TokenError::Malformed(_) | TokenError::Expired,
        ) => StatusCode::UNAUTHORIZED,
        ApplicationError::Token(e) => {
            error!("Token service failure: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_application_error() {
        assert_eq!(
            map_application_error(ApplicationError::Token(TokenError::Expired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            map_application_error(ApplicationError::Token(TokenError::Encoding("key".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            map_application_error(ApplicationError::Validation("empty".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            map_application_error(CoreError::AlreadyExists("a@example.com".into()).into()),
            StatusCode::CONFLICT
        );
    }
}

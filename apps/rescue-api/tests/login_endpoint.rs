use axum::Router;
use axum_test::TestServer;
use core_lib::{
    AdoptionRepository, BreedRepository, CatRepository, CoreError, PasswordEncoder,
    UserRepository,
    adapters::{
        InMemoryAdoptionRepository, InMemoryBreedRepository, InMemoryCatRepository,
        InMemoryUserRepository,
    },
    domain::user::{User, UserRole},
};
use http::{HeaderName, HeaderValue, StatusCode};
use serde_json::json;
use std::sync::Arc;

use rescue_api::{
    AppState,
    application::{commands::LoginResponse, token::TokenService},
    create_app,
};

const SECRET: &str = "login-endpoint-test-secret-0123456789";

// Keeps the tests fast; hashing itself is covered next to the Argon2 encoder
struct PlainTextEncoder;

impl PasswordEncoder for PlainTextEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, CoreError> {
        Ok(format!("plain:{raw_password}"))
    }

    fn matches(&self, raw_password: &str, encoded: &str) -> bool {
        encoded == format!("plain:{raw_password}")
    }
}

async fn setup_test_app(ttl_ms: i64) -> TestServer {
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::default());
    let passwords: Arc<dyn PasswordEncoder> = Arc::new(PlainTextEncoder);

    let mut john = User::new("john.doe@example.com", "John", "Doe", UserRole::User);
    john.password_hash = passwords.encode("password123").unwrap();
    john.tenant_id = Some("main".into());
    users.save(john).await.unwrap();

    let app_state = AppState {
        users,
        cats: Arc::new(InMemoryCatRepository::default()) as Arc<dyn CatRepository>,
        breeds: Arc::new(InMemoryBreedRepository::default()) as Arc<dyn BreedRepository>,
        adoptions: Arc::new(InMemoryAdoptionRepository::default()) as Arc<dyn AdoptionRepository>,
        passwords,
        tokens: Arc::new(TokenService::new(SECRET, ttl_ms).unwrap()),
    };

    let app: Router = create_app(app_state);
    TestServer::new(app).expect("Failed to create TestServer")
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

async fn login(server: &TestServer) -> LoginResponse {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "john.doe@example.com",
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<LoginResponse>()
}

#[tokio::test]
async fn test_health() {
    let server = setup_test_app(3_600_000).await;

    let response = server.get("/api/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<serde_json::Value>()["status"], "ok");
}

#[tokio::test]
async fn test_successful_login_returns_token() {
    let server = setup_test_app(3_600_000).await;

    let login_data = login(&server).await;

    assert!(!login_data.token.is_empty());
    assert_eq!(login_data.email, "john.doe@example.com");
    assert_eq!(login_data.role, UserRole::User);
    assert!(login_data.expires_at > chrono::Utc::now());
}

#[tokio::test]
async fn test_login_fails_with_wrong_password() {
    let server = setup_test_app(3_600_000).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "john.doe@example.com",
            "password": "wrong_password_456"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_fails_with_unknown_email() {
    let server = setup_test_app(3_600_000).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_empty_and_missing_fields() {
    let server = setup_test_app(3_600_000).await;

    let empty = server
        .post("/api/auth/login")
        .json(&json!({ "email": "", "password": "" }))
        .await;
    assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);

    // Axum returns 422 for JSON that does not match the request type
    let missing = server
        .post("/api/auth/login")
        .json(&json!({ "email": "john.doe@example.com" }))
        .await;
    assert_eq!(missing.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_me_requires_token() {
    let server = setup_test_app(3_600_000).await;

    let response = server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/auth/me")
        .add_header(HeaderName::from_static("authorization"), bearer("garbage"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_authenticated_user() {
    let server = setup_test_app(3_600_000).await;
    let login_data = login(&server).await;

    let response = server
        .get("/api/auth/me")
        .add_header(
            HeaderName::from_static("authorization"),
            bearer(&login_data.token),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["email"], "john.doe@example.com");
    assert_eq!(body["role"], "USER");
    assert_eq!(body["tenant_id"], "main");
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    for ttl_ms in [-1000, -500, -1] {
        let server = setup_test_app(ttl_ms).await;
        let login_data = login(&server).await;

        let response = server
            .get("/api/auth/me")
            .add_header(
                HeaderName::from_static("authorization"),
                bearer(&login_data.token),
            )
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "ttl {ttl_ms} ms");
    }
}

#[tokio::test]
async fn test_token_from_another_service_is_unauthorized() {
    let server = setup_test_app(3_600_000).await;
    let foreign = TokenService::new("some-other-deployment-secret-abcdefgh", 3_600_000).unwrap();
    let token = foreign
        .generate_token_for(&User::new(
            "john.doe@example.com",
            "John",
            "Doe",
            UserRole::User,
        ))
        .unwrap();

    let response = server
        .get("/api/auth/me")
        .add_header(HeaderName::from_static("authorization"), bearer(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_subject_must_match_stored_email_exactly() {
    let server = setup_test_app(3_600_000).await;
    // Same signing secret, but the subject differs from the stored email in case
    let tokens = TokenService::new(SECRET, 3_600_000).unwrap();
    let token = tokens
        .generate_token_for(&User::new(
            "JOHN.DOE@EXAMPLE.COM",
            "John",
            "Doe",
            UserRole::User,
        ))
        .unwrap();

    let response = server
        .get("/api/auth/me")
        .add_header(HeaderName::from_static("authorization"), bearer(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// Captain service and route tests over in-memory stores

use crate::auth::{
    AccountKind, AuthError, LoginRequest, MemoryRevokedTokenStore, SessionService, TokenService,
};
use crate::captains::{
    CaptainAuthResponse, CaptainService, CaptainStatus, MemoryCaptainStore,
    RegisterCaptainRequest, VehicleRequest, VehicleType,
};
use crate::models::FullName;
use crate::users::MemoryUserStore;
use crate::{api_router, AppState};
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

const SECRET: &str = "captain_tests_secret";

fn captain_service() -> (CaptainService, Arc<SessionService>) {
    let session = Arc::new(SessionService::new(
        TokenService::new(SECRET),
        Arc::new(MemoryRevokedTokenStore::new()),
    ));
    let service = CaptainService::new(Arc::new(MemoryCaptainStore::new()), session.clone());
    (service, session)
}

fn register_request(email: &str) -> RegisterCaptainRequest {
    RegisterCaptainRequest {
        full_name: FullName::new("Ravi", Some("Kumar".to_string())),
        email: email.to_string(),
        password: "drive123".to_string(),
        vehicle: VehicleRequest {
            color: "white".to_string(),
            number_plate: "MH-12-AB-1234".to_string(),
            vehicle_capacity: 4,
            vehicle_type: "car".to_string(),
            vehicle_model: "Swift".to_string(),
        },
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn create_test_server() -> TestServer {
    let state = AppState::new(
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryCaptainStore::new()),
        Arc::new(MemoryRevokedTokenStore::new()),
        TokenService::new(SECRET),
        false,
    );
    TestServer::new(api_router(state)).unwrap()
}

fn register_payload(email: &str) -> serde_json::Value {
    json!({
        "fullName": { "firstName": "Ravi", "lastName": "Kumar" },
        "email": email,
        "password": "drive123",
        "vehicle": {
            "color": "white",
            "numberPlate": "MH-12-AB-1234",
            "vehicleCapacity": 4,
            "vehicleType": "car",
            "vehicleModel": "Swift"
        }
    })
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

// ============================================================================
// Service
// ============================================================================

#[tokio::test]
async fn test_register_creates_offline_captain() {
    let (service, session) = captain_service();

    let (captain, token) = service.register(register_request("Ravi@Example.com")).await.unwrap();

    assert_eq!(captain.email, "ravi@example.com");
    assert_eq!(captain.status, CaptainStatus::Offline);
    assert_eq!(captain.vehicle.vehicle_type, VehicleType::Car);
    assert_eq!(captain.vehicle.vehicle_capacity, 4);
    assert!(captain.location.is_none());
    assert_ne!(captain.password_hash, "drive123");

    let claims = session.authenticate(&token, AccountKind::Captain).await.unwrap();
    assert_eq!(claims.sub, captain.id);
    assert_eq!(claims.kind, AccountKind::Captain);
}

#[tokio::test]
async fn test_register_duplicate_email_any_case() {
    let (service, _) = captain_service();
    service.register(register_request("ravi@example.com")).await.unwrap();

    let result = service.register(register_request("RAVI@example.com")).await;

    assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
}

#[tokio::test]
async fn test_register_unknown_vehicle_type_is_client_error() {
    let (service, _) = captain_service();
    let mut request = register_request("ravi@example.com");
    request.vehicle.vehicle_type = "truck".to_string();

    let result = service.register(request).await;

    assert!(matches!(result, Err(AuthError::InvalidVehicle(_))));
}

#[tokio::test]
async fn test_login_checks_credentials() {
    let (service, _) = captain_service();
    let (registered, _) = service.register(register_request("ravi@example.com")).await.unwrap();

    let (captain, _) = service
        .login(login_request("ravi@example.com", "drive123"))
        .await
        .unwrap();
    assert_eq!(captain.id, registered.id);

    let wrong = service.login(login_request("ravi@example.com", "nope-nope")).await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

    let unknown = service.login(login_request("other@example.com", "drive123")).await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_logout_revokes_only_that_token() {
    let (service, session) = captain_service();
    let (captain, token) = service.register(register_request("ravi@example.com")).await.unwrap();
    let (_, other_device) = service
        .login(login_request("ravi@example.com", "drive123"))
        .await
        .unwrap();
    assert_ne!(token, other_device);
    let claims = session.authenticate(&token, AccountKind::Captain).await.unwrap();

    service.logout(&token, &claims).await.unwrap();

    let result = session.authenticate(&token, AccountKind::Captain).await;
    assert!(matches!(result, Err(AuthError::RevokedToken)));
    assert!(session
        .authenticate(&other_device, AccountKind::Captain)
        .await
        .is_ok());
    assert!(service.find_by_id(captain.id).await.unwrap().is_some());
}

// ============================================================================
// Routes (/api/captain)
// ============================================================================

#[tokio::test]
async fn test_register_route() {
    let server = create_test_server();

    let response = server
        .post("/api/captain/register")
        .json(&register_payload("ravi@example.com"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Captain registered successfully");
    assert_eq!(body["captain"]["status"], "offline");
    assert_eq!(body["captain"]["vehicle"]["vehicleType"], "car");
    assert_eq!(body["captain"]["vehicle"]["numberPlate"], "MH-12-AB-1234");
    assert!(!response.text().contains("password"));
}

#[tokio::test]
async fn test_register_route_rejects_bad_vehicle() {
    let server = create_test_server();

    let response = server
        .post("/api/captain/register")
        .json(&json!({
            "fullName": { "firstName": "Ravi" },
            "email": "ravi@example.com",
            "password": "drive123",
            "vehicle": {
                "color": "re",
                "numberPlate": "AB",
                "vehicleCapacity": 0,
                "vehicleType": "truck",
                "vehicleModel": "  "
            }
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert_eq!(
        fields,
        vec![
            "vehicle.color",
            "vehicle.number_plate",
            "vehicle.vehicle_capacity",
            "vehicle.vehicle_model",
            "vehicle.vehicle_type",
        ]
    );
    assert!(body["details"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d["message"] == "Vehicle type must be car, bike, or auto"));
}

#[tokio::test]
async fn test_register_route_wrong_capacity_type() {
    let server = create_test_server();

    let mut payload = register_payload("ravi@example.com");
    payload["vehicle"]["vehicleCapacity"] = json!("four");
    let response = server.post("/api/captain/register").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "body");
}

#[tokio::test]
async fn test_register_route_bad_email_message() {
    let server = create_test_server();

    let mut payload = register_payload("ravi@example.com");
    payload["email"] = json!("not-an-email");
    let response = server.post("/api/captain/register").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["details"][0]["field"], "email");
    assert_eq!(body["details"][0]["message"], "Please enter a valid email");
}

#[tokio::test]
async fn test_login_profile_logout_flow() {
    let server = create_test_server();
    server
        .post("/api/captain/register")
        .json(&register_payload("ravi@example.com"))
        .await;

    let login = server
        .post("/api/captain/login")
        .json(&json!({ "email": "ravi@example.com", "password": "drive123" }))
        .await;
    assert_eq!(login.status_code(), StatusCode::OK);
    assert!(login.headers().get(header::SET_COOKIE).is_some());
    let auth: CaptainAuthResponse = login.json();

    let profile = server
        .get("/api/captain/profile")
        .add_header(header::AUTHORIZATION, bearer(&auth.token))
        .await;
    assert_eq!(profile.status_code(), StatusCode::OK);
    let body: serde_json::Value = profile.json();
    assert_eq!(body["message"], "Captain profile fetched successfully");
    assert_eq!(body["captain"]["email"], "ravi@example.com");

    let logout = server
        .get("/api/captain/logout")
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&format!("token={}", auth.token)).unwrap(),
        )
        .await;
    assert_eq!(logout.status_code(), StatusCode::OK);

    let after = server
        .get("/api/captain/profile")
        .add_header(header::AUTHORIZATION, bearer(&auth.token))
        .await;
    assert_eq!(after.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_wrong_password_route() {
    let server = create_test_server();
    server
        .post("/api/captain/register")
        .json(&register_payload("ravi@example.com"))
        .await;

    let response = server
        .post("/api/captain/login")
        .json(&json!({ "email": "ravi@example.com", "password": "wrong-pass" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Invalid email or password");
}

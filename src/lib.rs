pub mod auth;
pub mod captains;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod users;
pub mod validation;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{CookieSettings, RevokedTokenStore, SessionService, TokenService};
use captains::{CaptainService, CaptainStore};
use users::{UserService, UserStore};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        users::handlers::register_user,
        users::handlers::login_user,
        users::handlers::user_profile,
        users::handlers::logout_user,
        captains::handlers::register_captain,
        captains::handlers::login_captain,
        captains::handlers::captain_profile,
        captains::handlers::logout_captain,
    ),
    components(
        schemas(
            models::FullName,
            auth::LoginRequest,
            auth::MessageResponse,
            error::ErrorResponse,
            error::FieldError,
            users::RegisterUserRequest,
            users::UserResponse,
            users::UserAuthResponse,
            users::UserProfileResponse,
            captains::RegisterCaptainRequest,
            captains::VehicleRequest,
            captains::Vehicle,
            captains::VehicleType,
            captains::CaptainStatus,
            captains::Location,
            captains::CaptainResponse,
            captains::CaptainAuthResponse,
            captains::CaptainProfileResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Rider registration and sessions"),
        (name = "captains", description = "Driver registration and sessions")
    ),
    info(
        title = "Ride Auth API",
        version = "1.0.0",
        description = "Registration and JWT authentication for riders and captains"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "token_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(auth::cookie::TOKEN_COOKIE))),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionService>,
    pub users: UserService,
    pub captains: CaptainService,
    pub cookies: CookieSettings,
}

impl AppState {
    /// Wire services over the given stores
    pub fn new(
        user_store: Arc<dyn UserStore>,
        captain_store: Arc<dyn CaptainStore>,
        revoked_store: Arc<dyn RevokedTokenStore>,
        tokens: TokenService,
        cookie_secure: bool,
    ) -> Self {
        let cookies = CookieSettings {
            secure: cookie_secure,
            max_age_secs: tokens.duration_secs(),
        };
        let session = Arc::new(SessionService::new(tokens, revoked_store));

        Self {
            users: UserService::new(user_store, session.clone()),
            captains: CaptainService::new(captain_store, session.clone()),
            session,
            cookies,
        }
    }
}

/// Handler for GET /
async fn root() -> &'static str {
    "Ride Auth API is running"
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register_user))
        .route("/login", post(users::login_user))
        .route("/profile", get(users::user_profile))
        .route("/logout", get(users::logout_user))
}

fn captain_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(captains::register_captain))
        .route("/login", post(captains::login_captain))
        .route("/profile", get(captains::captain_profile))
        .route("/logout", get(captains::logout_captain))
}

/// Routes without docs or CORS, used directly by tests
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/user", user_routes())
        .nest("/api/captain", captain_routes())
        .with_state(state)
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState) -> Router {
    use tower::ServiceBuilder;
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router(state))
        .layer(ServiceBuilder::new().layer(cors))
}

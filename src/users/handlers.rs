// HTTP handlers for user endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use validator::Validate;

use crate::auth::{cookie::to_header_value, AuthenticatedUser, LoginRequest, MessageResponse};
use crate::error::{ApiError, ErrorResponse};
use crate::extract::ApiJson;
use crate::users::models::{RegisterUserRequest, UserAuthResponse, UserProfileResponse};
use crate::AppState;

/// Register a new user
/// POST /api/user/register
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User created", body = UserAuthResponse),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserAuthResponse>), ApiError> {
    payload.validate()?;

    let (user, token) = state.users.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserAuthResponse {
            message: "User created successfully".to_string(),
            user: user.into(),
            token,
        }),
    ))
}

/// Log a user in
/// POST /api/user/login
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token also set as cookie", body = UserAuthResponse),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn login_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let (user, token) = state.users.login(payload).await?;
    let cookie = to_header_value(&state.cookies.session_cookie(&token))
        .ok_or_else(|| ApiError::InternalError("Token is not a valid cookie value".to_string()))?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(UserAuthResponse {
            message: "Login successful".to_string(),
            user: user.into(),
            token,
        }),
    ))
}

/// Current user's profile
/// GET /api/user/profile
#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "Profile of the authenticated user", body = UserProfileResponse),
        (status = 401, description = "Missing, invalid, expired or revoked token", body = ErrorResponse)
    ),
    security(("bearer_token" = []), ("token_cookie" = [])),
    tag = "users"
)]
pub async fn user_profile(auth: AuthenticatedUser) -> Json<UserProfileResponse> {
    Json(UserProfileResponse {
        message: "User profile fetched successfully".to_string(),
        user: auth.user.into(),
    })
}

/// Log a user out, revoking the presented token
/// GET /api/user/logout
#[utoipa::path(
    get,
    path = "/api/user/logout",
    responses(
        (status = 200, description = "Token revoked and cookie cleared", body = MessageResponse),
        (status = 401, description = "Missing, invalid, expired or revoked token", body = ErrorResponse)
    ),
    security(("bearer_token" = []), ("token_cookie" = [])),
    tag = "users"
)]
pub async fn logout_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    state.users.logout(&auth.token, &auth.claims).await?;
    let cookie = to_header_value(&state.cookies.removal_cookie())
        .ok_or_else(|| ApiError::InternalError("Invalid removal cookie".to_string()))?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

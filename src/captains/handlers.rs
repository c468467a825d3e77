// HTTP handlers for captain endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use validator::Validate;

use crate::auth::{cookie::to_header_value, AuthenticatedCaptain, LoginRequest, MessageResponse};
use crate::captains::models::{CaptainAuthResponse, CaptainProfileResponse, RegisterCaptainRequest};
use crate::error::{ApiError, ErrorResponse};
use crate::extract::ApiJson;
use crate::AppState;

/// Register a new captain with their vehicle
/// POST /api/captain/register
#[utoipa::path(
    post,
    path = "/api/captain/register",
    request_body = RegisterCaptainRequest,
    responses(
        (status = 201, description = "Captain registered", body = CaptainAuthResponse),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "captains"
)]
pub async fn register_captain(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterCaptainRequest>,
) -> Result<(StatusCode, Json<CaptainAuthResponse>), ApiError> {
    payload.validate()?;

    let (captain, token) = state.captains.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CaptainAuthResponse {
            message: "Captain registered successfully".to_string(),
            captain: captain.into(),
            token,
        }),
    ))
}

/// Log a captain in
/// POST /api/captain/login
#[utoipa::path(
    post,
    path = "/api/captain/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token also set as cookie", body = CaptainAuthResponse),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    ),
    tag = "captains"
)]
pub async fn login_captain(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let (captain, token) = state.captains.login(payload).await?;
    let cookie = to_header_value(&state.cookies.session_cookie(&token))
        .ok_or_else(|| ApiError::InternalError("Token is not a valid cookie value".to_string()))?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(CaptainAuthResponse {
            message: "Login successful".to_string(),
            captain: captain.into(),
            token,
        }),
    ))
}

/// Current captain's profile
/// GET /api/captain/profile
#[utoipa::path(
    get,
    path = "/api/captain/profile",
    responses(
        (status = 200, description = "Profile of the authenticated captain", body = CaptainProfileResponse),
        (status = 401, description = "Missing, invalid, expired or revoked token", body = ErrorResponse)
    ),
    security(("bearer_token" = []), ("token_cookie" = [])),
    tag = "captains"
)]
pub async fn captain_profile(auth: AuthenticatedCaptain) -> Json<CaptainProfileResponse> {
    Json(CaptainProfileResponse {
        message: "Captain profile fetched successfully".to_string(),
        captain: auth.captain.into(),
    })
}

/// Log a captain out, revoking the presented token
/// GET /api/captain/logout
#[utoipa::path(
    get,
    path = "/api/captain/logout",
    responses(
        (status = 200, description = "Token revoked and cookie cleared", body = MessageResponse),
        (status = 401, description = "Missing, invalid, expired or revoked token", body = ErrorResponse)
    ),
    security(("bearer_token" = []), ("token_cookie" = [])),
    tag = "captains"
)]
pub async fn logout_captain(
    State(state): State<AppState>,
    auth: AuthenticatedCaptain,
) -> Result<impl IntoResponse, ApiError> {
    state.captains.logout(&auth.token, &auth.claims).await?;
    let cookie = to_header_value(&state.cookies.removal_cookie())
        .ok_or_else(|| ApiError::InternalError("Invalid removal cookie".to_string()))?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

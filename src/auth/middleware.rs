// Authentication extractors for protected routes

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::auth::{cookie::extract_token, error::AuthError, models::AccountKind, token::Claims};
use crate::captains::Captain;
use crate::error::ApiError;
use crate::users::User;
use crate::AppState;

/// Pull the token from the request and authenticate it for `kind`
async fn authenticate_parts(
    parts: &Parts,
    state: &AppState,
    kind: AccountKind,
) -> Result<(String, Claims), ApiError> {
    let endpoint = parts.uri.path();

    let token = extract_token(&parts.headers).ok_or_else(|| {
        warn!("Missing token in request to protected endpoint: {}", endpoint);
        AuthError::MissingToken
    })?;

    let claims = state.session.authenticate(&token, kind).await?;
    Ok((token, claims))
}

/// Authenticated user extractor for `/api/user` routes
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub claims: Claims,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (token, claims) = authenticate_parts(parts, state, AccountKind::User).await?;

        let user = state.users.find_by_id(claims.sub).await?.ok_or_else(|| {
            warn!("Valid token for missing user {}", claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser { user, claims, token })
    }
}

/// Authenticated captain extractor for `/api/captain` routes
#[derive(Debug, Clone)]
pub struct AuthenticatedCaptain {
    pub captain: Captain,
    pub claims: Claims,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedCaptain {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (token, claims) = authenticate_parts(parts, state, AccountKind::Captain).await?;

        let captain = state.captains.find_by_id(claims.sub).await?.ok_or_else(|| {
            warn!("Valid token for missing captain {}", claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedCaptain { captain, claims, token })
    }
}

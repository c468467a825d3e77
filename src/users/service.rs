// User account service - business logic layer

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{AccountKind, AuthError, Claims, LoginRequest, PasswordService, SessionService};
use crate::users::{
    models::{NewUser, RegisterUserRequest, User},
    repository::UserStore,
};
use crate::validation::normalize_email;

/// Coordinates registration, login and logout for users
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    session: Arc<SessionService>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, session: Arc<SessionService>) -> Self {
        Self { store, session }
    }

    /// Register a new user and issue a token for it.
    /// The request must already be validated.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<(User, String), AuthError> {
        let email = normalize_email(&request.email);

        if self.store.email_exists(&email).await? {
            warn!("Attempt to register duplicate user email: {}", email);
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = PasswordService::hash_password_blocking(request.password).await?;

        let user = self
            .store
            .create(NewUser {
                full_name: request.full_name,
                email,
                password_hash,
            })
            .await?;

        let token = self.session.issue(AccountKind::User, user.id)?;
        info!("Registered user {}", user.id);
        Ok((user, token))
    }

    /// Check credentials and issue a token.
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> Result<(User, String), AuthError> {
        let email = normalize_email(&request.email);

        let user = match self.store.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!("Login attempt for unknown user email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let valid = PasswordService::verify_password_blocking(
            request.password,
            user.password_hash.clone(),
        )
        .await?;
        if !valid {
            warn!("Failed login for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.session.issue(AccountKind::User, user.id)?;
        info!("User {} logged in", user.id);
        Ok((user, token))
    }

    /// Load the user a verified token points at
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        self.store.find_by_id(id).await
    }

    /// Revoke the token presented by an authenticated user
    pub async fn logout(&self, token: &str, claims: &Claims) -> Result<(), AuthError> {
        self.session.revoke(token, claims).await
    }
}

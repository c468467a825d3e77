// Captain account service - business logic layer

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{AccountKind, AuthError, Claims, LoginRequest, PasswordService, SessionService};
use crate::captains::{
    models::{Captain, NewCaptain, RegisterCaptainRequest},
    repository::CaptainStore,
};
use crate::validation::normalize_email;

/// Coordinates registration, login and logout for captains
#[derive(Clone)]
pub struct CaptainService {
    store: Arc<dyn CaptainStore>,
    session: Arc<SessionService>,
}

impl CaptainService {
    pub fn new(store: Arc<dyn CaptainStore>, session: Arc<SessionService>) -> Self {
        Self { store, session }
    }

    /// Register a captain with their vehicle and issue a token.
    /// The request must already be validated.
    pub async fn register(
        &self,
        request: RegisterCaptainRequest,
    ) -> Result<(Captain, String), AuthError> {
        let email = normalize_email(&request.email);

        if self.store.email_exists(&email).await? {
            warn!("Attempt to register duplicate captain email: {}", email);
            return Err(AuthError::EmailAlreadyExists);
        }

        let vehicle = request
            .vehicle
            .into_vehicle()
            .map_err(AuthError::InvalidVehicle)?;

        let password_hash = PasswordService::hash_password_blocking(request.password).await?;

        let captain = self
            .store
            .create(NewCaptain {
                full_name: request.full_name,
                email,
                password_hash,
                vehicle,
            })
            .await?;

        let token = self.session.issue(AccountKind::Captain, captain.id)?;
        info!(
            "Registered captain {} with {} {}",
            captain.id, captain.vehicle.vehicle_type, captain.vehicle.number_plate
        );
        Ok((captain, token))
    }

    /// Check credentials and issue a token.
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> Result<(Captain, String), AuthError> {
        let email = normalize_email(&request.email);

        let Some(captain) = self.store.find_by_email(&email).await? else {
            debug!("Login attempt for unknown captain email");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = PasswordService::verify_password_blocking(
            request.password,
            captain.password_hash.clone(),
        )
        .await?;
        if !valid {
            warn!("Failed login for captain {}", captain.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.session.issue(AccountKind::Captain, captain.id)?;
        info!("Captain {} logged in", captain.id);
        Ok((captain, token))
    }

    /// Load the captain a verified token points at
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Captain>, AuthError> {
        self.store.find_by_id(id).await
    }

    /// Revoke the token presented by an authenticated captain
    pub async fn logout(&self, token: &str, claims: &Claims) -> Result<(), AuthError> {
        self.session.revoke(token, claims).await
    }
}

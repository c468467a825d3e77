// Captain storage: PostgreSQL and in-memory implementations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::captains::models::{Captain, CaptainRow, CaptainStatus, NewCaptain};

/// Storage for captain accounts.
/// Emails are expected to be normalized (trimmed, lowercased) by the caller.
#[async_trait]
pub trait CaptainStore: Send + Sync {
    /// Insert a captain; a taken email yields `AuthError::EmailAlreadyExists`
    async fn create(&self, new_captain: NewCaptain) -> Result<Captain, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Captain>, AuthError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Captain>, AuthError>;

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError>;
}

const CAPTAIN_COLUMNS: &str = "id, first_name, last_name, email, password_hash, socket_id, status, \
     vehicle_color, vehicle_number_plate, vehicle_capacity, vehicle_type, vehicle_model, \
     latitude, longitude, created_at";

/// PostgreSQL-backed captain store
#[derive(Clone)]
pub struct PgCaptainStore {
    pool: PgPool,
}

impl PgCaptainStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaptainStore for PgCaptainStore {
    async fn create(&self, new_captain: NewCaptain) -> Result<Captain, AuthError> {
        let query = format!(
            r#"
            INSERT INTO captains (
                id, first_name, last_name, email, password_hash, status,
                vehicle_color, vehicle_number_plate, vehicle_capacity, vehicle_type, vehicle_model
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            CAPTAIN_COLUMNS
        );

        let vehicle = &new_captain.vehicle;
        let row = sqlx::query_as::<_, CaptainRow>(&query)
            .bind(Uuid::new_v4())
            .bind(&new_captain.full_name.first_name)
            .bind(&new_captain.full_name.last_name)
            .bind(&new_captain.email)
            .bind(&new_captain.password_hash)
            .bind(CaptainStatus::default().as_str())
            .bind(&vehicle.color)
            .bind(&vehicle.number_plate)
            .bind(vehicle.vehicle_capacity)
            .bind(vehicle.vehicle_type.as_str())
            .bind(&vehicle.vehicle_model)
            .fetch_one(&self.pool)
            .await
            .map_err(AuthError::from_insert_error)?;

        Captain::try_from(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Captain>, AuthError> {
        let query = format!(
            "SELECT {} FROM captains WHERE LOWER(email) = LOWER($1)",
            CAPTAIN_COLUMNS
        );

        sqlx::query_as::<_, CaptainRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(Captain::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Captain>, AuthError> {
        let query = format!("SELECT {} FROM captains WHERE id = $1", CAPTAIN_COLUMNS);

        sqlx::query_as::<_, CaptainRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Captain::try_from)
            .transpose()
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM captains WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }
}

/// In-memory captain store (development and tests)
#[derive(Clone, Default)]
pub struct MemoryCaptainStore {
    captains: Arc<RwLock<HashMap<Uuid, Captain>>>,
}

impl MemoryCaptainStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CaptainStore for MemoryCaptainStore {
    async fn create(&self, new_captain: NewCaptain) -> Result<Captain, AuthError> {
        let mut captains = self.captains.write().await;

        if captains
            .values()
            .any(|c| c.email.eq_ignore_ascii_case(&new_captain.email))
        {
            return Err(AuthError::EmailAlreadyExists);
        }

        let captain = Captain {
            id: Uuid::new_v4(),
            full_name: new_captain.full_name,
            email: new_captain.email,
            password_hash: new_captain.password_hash,
            socket_id: None,
            status: CaptainStatus::default(),
            vehicle: new_captain.vehicle,
            location: None,
            created_at: Utc::now(),
        };
        captains.insert(captain.id, captain.clone());
        Ok(captain)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Captain>, AuthError> {
        Ok(self
            .captains
            .read()
            .await
            .values()
            .find(|c| c.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Captain>, AuthError> {
        Ok(self.captains.read().await.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captains::models::{Vehicle, VehicleType};
    use crate::models::FullName;

    fn new_captain(email: &str) -> NewCaptain {
        NewCaptain {
            full_name: FullName::new("Ravi", None),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            vehicle: Vehicle {
                color: "white".to_string(),
                number_plate: "MH-12-AB-1234".to_string(),
                vehicle_capacity: 4,
                vehicle_type: VehicleType::Car,
                vehicle_model: "Swift".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_new_captain_starts_offline() {
        let store = MemoryCaptainStore::new();
        let captain = store.create(new_captain("ravi@example.com")).await.unwrap();

        assert_eq!(captain.status, CaptainStatus::Offline);
        assert!(captain.location.is_none());
        assert!(captain.socket_id.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryCaptainStore::new();
        store.create(new_captain("ravi@example.com")).await.unwrap();

        let result = store.create(new_captain("RAVI@example.com")).await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_email() {
        let store = MemoryCaptainStore::new();
        let captain = store.create(new_captain("ravi@example.com")).await.unwrap();

        assert_eq!(
            store.find_by_email("ravi@example.com").await.unwrap().unwrap().id,
            captain.id
        );
        assert!(store.find_by_id(captain.id).await.unwrap().is_some());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.email_exists("ravi@example.com").await.unwrap());
    }
}

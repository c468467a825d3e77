// User data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::FullName;

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub socket_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: FullName,
    pub email: String,
    pub password_hash: String,
}

/// User response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: FullName,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub socket_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: FullName::new(user.first_name, user.last_name),
            email: user.email,
            socket_id: user.socket_id,
            created_at: user.created_at,
        }
    }
}

/// Registration request DTO
#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterUserRequest {
    #[validate]
    pub full_name: FullName,
    #[validate(email(message = "Invalid Email"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[schema(example = "secret123")]
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserAuthResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

/// Returned by the profile endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    #[schema(example = "User profile fetched successfully")]
    pub message: String,
    pub user: UserResponse,
}

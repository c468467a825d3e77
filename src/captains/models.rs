// Captain (driver) data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthError;
use crate::models::FullName;
use crate::validation::{validate_vehicle_model, validate_vehicle_type};

/// Kind of vehicle a captain drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Bike,
    Auto,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Bike => "bike",
            VehicleType::Auto => "auto",
        }
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(VehicleType::Car),
            "bike" => Ok(VehicleType::Bike),
            "auto" => Ok(VehicleType::Auto),
            other => Err(format!("unknown vehicle type '{}'", other)),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability of a captain; new captains start offline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaptainStatus {
    Online,
    #[default]
    Offline,
}

impl CaptainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptainStatus::Online => "online",
            CaptainStatus::Offline => "offline",
        }
    }
}

impl FromStr for CaptainStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(CaptainStatus::Online),
            "offline" => Ok(CaptainStatus::Offline),
            other => Err(format!("unknown captain status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[schema(example = "white")]
    pub color: String,
    #[schema(example = "MH-12-AB-1234")]
    pub number_plate: String,
    #[schema(example = 4, minimum = 1)]
    pub vehicle_capacity: i32,
    pub vehicle_type: VehicleType,
    #[schema(example = "Swift")]
    pub vehicle_model: String,
}

/// Last known position of a captain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Captain domain model
#[derive(Debug, Clone)]
pub struct Captain {
    pub id: Uuid,
    pub full_name: FullName,
    pub email: String,
    pub password_hash: String,
    pub socket_id: Option<String>,
    pub status: CaptainStatus,
    pub vehicle: Vehicle,
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
}

/// Flat database row for a captain
#[derive(Debug, Clone, FromRow)]
pub struct CaptainRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub socket_id: Option<String>,
    pub status: String,
    pub vehicle_color: String,
    pub vehicle_number_plate: String,
    pub vehicle_capacity: i32,
    pub vehicle_type: String,
    pub vehicle_model: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CaptainRow> for Captain {
    type Error = AuthError;

    fn try_from(row: CaptainRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(AuthError::DatabaseError)?;
        let vehicle_type = row.vehicle_type.parse().map_err(AuthError::DatabaseError)?;
        let location = match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) => Some(Location { latitude, longitude }),
            _ => None,
        };

        Ok(Captain {
            id: row.id,
            full_name: FullName::new(row.first_name, row.last_name),
            email: row.email,
            password_hash: row.password_hash,
            socket_id: row.socket_id,
            status,
            vehicle: Vehicle {
                color: row.vehicle_color,
                number_plate: row.vehicle_number_plate,
                vehicle_capacity: row.vehicle_capacity,
                vehicle_type,
                vehicle_model: row.vehicle_model,
            },
            location,
            created_at: row.created_at,
        })
    }
}

/// Data needed to insert a captain; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewCaptain {
    pub full_name: FullName,
    pub email: String,
    pub password_hash: String,
    pub vehicle: Vehicle,
}

/// Captain response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptainResponse {
    pub id: Uuid,
    pub full_name: FullName,
    #[schema(example = "driver@example.com")]
    pub email: String,
    pub socket_id: Option<String>,
    pub status: CaptainStatus,
    pub vehicle: Vehicle,
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
}

impl From<Captain> for CaptainResponse {
    fn from(captain: Captain) -> Self {
        Self {
            id: captain.id,
            full_name: captain.full_name,
            email: captain.email,
            socket_id: captain.socket_id,
            status: captain.status,
            vehicle: captain.vehicle,
            location: captain.location,
            created_at: captain.created_at,
        }
    }
}

/// Vehicle section of the registration request
#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleRequest {
    #[validate(length(min = 3, message = "Color must be at least 3 characters long"))]
    #[schema(example = "white")]
    pub color: String,
    #[validate(length(min = 3, message = "Number plate must be at least 3 characters long"))]
    #[schema(example = "MH-12-AB-1234")]
    pub number_plate: String,
    #[validate(range(min = 1, message = "Vehicle capacity must be at least 1"))]
    #[schema(example = 4)]
    pub vehicle_capacity: i32,
    #[validate(custom = "validate_vehicle_type")]
    #[schema(example = "car")]
    pub vehicle_type: String,
    #[validate(custom = "validate_vehicle_model")]
    #[schema(example = "Swift")]
    pub vehicle_model: String,
}

impl VehicleRequest {
    /// Convert a validated request into a vehicle
    pub fn into_vehicle(self) -> Result<Vehicle, String> {
        Ok(Vehicle {
            vehicle_type: self
                .vehicle_type
                .parse()
                .map_err(|_| "Vehicle type must be car, bike, or auto".to_string())?,
            color: self.color,
            number_plate: self.number_plate,
            vehicle_capacity: self.vehicle_capacity,
            vehicle_model: self.vehicle_model.trim().to_string(),
        })
    }
}

/// Captain registration request DTO
#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterCaptainRequest {
    #[validate]
    pub full_name: FullName,
    #[validate(email(message = "Please enter a valid email"))]
    #[schema(example = "driver@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[schema(example = "secret123")]
    pub password: String,
    #[validate]
    pub vehicle: VehicleRequest,
}

/// Returned by register and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaptainAuthResponse {
    #[schema(example = "Captain registered successfully")]
    pub message: String,
    pub captain: CaptainResponse,
    pub token: String,
}

/// Returned by the profile endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaptainProfileResponse {
    #[schema(example = "Captain profile fetched successfully")]
    pub message: String,
    pub captain: CaptainResponse,
}

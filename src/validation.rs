// Validation utilities module
// Provides custom validation functions for domain-specific rules

use std::borrow::Cow;
use validator::ValidationError;

/// Accepted vehicle types for captains
pub const VEHICLE_TYPES: [&str; 3] = ["car", "bike", "auto"];

fn with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Validates that a vehicle type is one of "car", "bike", "auto"
pub fn validate_vehicle_type(vehicle_type: &str) -> Result<(), ValidationError> {
    if VEHICLE_TYPES.contains(&vehicle_type) {
        Ok(())
    } else {
        Err(with_message(
            "invalid_vehicle_type",
            "Vehicle type must be car, bike, or auto",
        ))
    }
}

/// Validates that a vehicle model is present
pub fn validate_vehicle_model(model: &str) -> Result<(), ValidationError> {
    if model.trim().is_empty() {
        Err(with_message("required", "Vehicle model is required"))
    } else {
        Ok(())
    }
}

/// Trim and lowercase an email so uniqueness checks ignore case
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Name of an account holder, shared by users and captains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FullName {
    #[validate(length(min = 3, message = "First Name must be at least 3 characters long"))]
    #[schema(example = "Jane")]
    pub first_name: String,
    #[validate(length(min = 3, message = "Last Name must be at least 3 characters long"))]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
}

impl FullName {
    pub fn new(first_name: impl Into<String>, last_name: Option<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name,
        }
    }
}

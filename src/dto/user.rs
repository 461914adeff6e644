use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{UserEntity, UserRole},
    dto::{format_system_time, validation::validate_display_name},
};

/// Payload used to create or replace the caller's profile.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterProfileRequest {
    pub full_name: String,
    pub role: UserRole,
}

impl Validate for RegisterProfileRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_display_name(&self.full_name) {
            errors.add("full_name", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Public projection of a user profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub role: UserRole,
    pub team_id: Option<Uuid>,
    pub created_at: String,
}

impl From<UserEntity> for UserProfile {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            full_name: value.full_name,
            role: value.role,
            team_id: value.team_id,
            created_at: format_system_time(value.created_at),
        }
    }
}

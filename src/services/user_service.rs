use std::{sync::Arc, time::SystemTime};

use tracing::info;

use crate::{
    dao::{
        golf_store::GolfStore,
        models::{UserEntity, UserRole},
    },
    dto::user::{RegisterProfileRequest, UserProfile},
    error::ServiceError,
    state::SharedState,
};

/// Create or replace the caller's profile. Team ownership and the original creation
/// time survive a re-registration.
pub async fn register_profile(
    state: &SharedState,
    caller_id: &str,
    request: RegisterProfileRequest,
) -> Result<UserProfile, ServiceError> {
    let store = state.require_store().await?;
    let existing = store.find_user(caller_id.to_string()).await?;

    let (team_id, created_at) = match &existing {
        Some(user) => (user.team_id, user.created_at),
        None => (None, SystemTime::now()),
    };

    if team_id.is_some() && request.role != UserRole::Scorekeeper {
        return Err(ServiceError::InvalidState(
            "a team owner cannot drop the scorekeeper role".into(),
        ));
    }

    let user = UserEntity {
        id: caller_id.to_string(),
        full_name: request.full_name.trim().to_string(),
        role: request.role,
        team_id,
        created_at,
    };
    store.save_user(user.clone()).await?;
    info!(user_id = %user.id, role = ?user.role, created = existing.is_none(), "profile saved");

    Ok(user.into())
}

/// Profile of the caller.
pub async fn get_profile(state: &SharedState, caller_id: &str) -> Result<UserProfile, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_user(caller_id.to_string())
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("profile `{caller_id}`")))
}

/// Load the caller's profile, failing when they never registered one.
pub async fn require_profile(
    store: &Arc<dyn GolfStore>,
    caller_id: &str,
) -> Result<UserEntity, ServiceError> {
    store
        .find_user(caller_id.to_string())
        .await?
        .ok_or_else(|| ServiceError::Forbidden("register a profile first".into()))
}

/// Load the caller's profile and check it carries the scorekeeper role.
pub async fn require_scorekeeper(
    store: &Arc<dyn GolfStore>,
    caller_id: &str,
) -> Result<UserEntity, ServiceError> {
    let user = require_profile(store, caller_id).await?;
    if user.role != UserRole::Scorekeeper {
        return Err(ServiceError::Forbidden(
            "only scorekeepers may perform this operation".into(),
        ));
    }
    Ok(user)
}

use axum::{Json, Router, extract::State, routing::get};
use validator::Validate;

use crate::{
    dto::user::{RegisterProfileRequest, UserProfile},
    error::AppError,
    routes::identity::CallerId,
    services::user_service,
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/users/me",
    tag = "users",
    params(("X-User-Id" = String, Header, description = "Authenticated user id")),
    request_body = RegisterProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = UserProfile),
        (status = 400, description = "Invalid name"),
        (status = 409, description = "Team owner tried to drop the scorekeeper role")
    )
)]
/// Create or replace the caller's profile.
pub async fn register_profile(
    State(state): State<SharedState>,
    CallerId(caller): CallerId,
    Json(payload): Json<RegisterProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    payload.validate()?;
    let profile = user_service::register_profile(&state, &caller, payload).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    params(("X-User-Id" = String, Header, description = "Authenticated user id")),
    responses(
        (status = 200, description = "Caller profile", body = UserProfile),
        (status = 404, description = "No profile registered")
    )
)]
/// Return the caller's profile, including the role used for gating.
pub async fn get_profile(
    State(state): State<SharedState>,
    CallerId(caller): CallerId,
) -> Result<Json<UserProfile>, AppError> {
    let profile = user_service::get_profile(&state, &caller).await?;
    Ok(Json(profile))
}

/// Configure the profile routes.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/users/me", get(get_profile).post(register_profile))
}

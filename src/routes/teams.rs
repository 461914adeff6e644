use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::team::{CreateTeamRequest, TeamSummary},
    error::AppError,
    routes::identity::CallerId,
    services::team_service,
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    params(("X-User-Id" = String, Header, description = "Authenticated scorekeeper id")),
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team registered", body = TeamSummary),
        (status = 400, description = "Invalid name or roster"),
        (status = 403, description = "Caller is not a scorekeeper"),
        (status = 409, description = "Name taken or caller already owns a team")
    )
)]
/// Register a four-player team owned by the caller.
pub async fn create_team(
    State(state): State<SharedState>,
    CallerId(caller): CallerId,
    Json(payload): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamSummary>), AppError> {
    payload.validate()?;
    let team = team_service::create_team(&state, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses((status = 200, description = "Teams sorted by name", body = [TeamSummary]))
)]
/// List every registered team.
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamSummary>>, AppError> {
    let teams = team_service::list_teams(&state).await?;
    Ok(Json(teams))
}

#[utoipa::path(
    get,
    path = "/teams/mine",
    tag = "teams",
    params(("X-User-Id" = String, Header, description = "Authenticated scorekeeper id")),
    responses(
        (status = 200, description = "Team owned by the caller", body = TeamSummary),
        (status = 404, description = "Caller has no team")
    )
)]
/// Return the team owned by the calling scorekeeper.
pub async fn my_team(
    State(state): State<SharedState>,
    CallerId(caller): CallerId,
) -> Result<Json<TeamSummary>, AppError> {
    let team = team_service::my_team(&state, &caller).await?;
    Ok(Json(team))
}

#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Team", body = TeamSummary),
        (status = 404, description = "Unknown team")
    )
)]
/// Fetch a single team.
pub async fn get_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamSummary>, AppError> {
    let team = team_service::get_team(&state, id).await?;
    Ok(Json(team))
}

/// Configure the team routes.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/teams", get(list_teams).post(create_team))
        .route("/teams/mine", get(my_team))
        .route("/teams/{id}", get(get_team))
}

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::leaderboard::{LeaderboardQuery, LeaderboardResponse},
    error::AppError,
    services::leaderboard_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    params(LeaderboardQuery),
    responses((status = 200, description = "Ranked leaderboard", body = LeaderboardResponse))
)]
/// Rank teams by best-two-of-four total, lowest first.
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let scope = query.scope.unwrap_or_default();
    let leaderboard = leaderboard_service::leaderboard(&state, scope).await?;
    Ok(Json(leaderboard))
}

/// Configure the leaderboard route.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/leaderboard", get(get_leaderboard))
}

use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::TeamEntity,
    dto::team::{CreateTeamRequest, TeamSummary},
    error::ServiceError,
    services::user_service,
    state::SharedState,
};

/// Register a team owned by the calling scorekeeper, who becomes Player A.
pub async fn create_team(
    state: &SharedState,
    caller_id: &str,
    request: CreateTeamRequest,
) -> Result<TeamSummary, ServiceError> {
    let store = state.require_store().await?;
    let mut owner = user_service::require_scorekeeper(&store, caller_id).await?;

    if owner.team_id.is_some() {
        return Err(ServiceError::InvalidState(
            "scorekeeper already owns a team".into(),
        ));
    }

    let name = request.name.trim().to_string();
    if store.find_team_by_name(name.clone()).await?.is_some() {
        return Err(ServiceError::InvalidState(format!(
            "team name `{name}` is already taken"
        )));
    }

    let players = std::iter::once(owner.full_name.clone())
        .chain(request.teammates.iter().map(|mate| mate.trim().to_string()))
        .collect();
    let team = TeamEntity::new(name, players, owner.id.clone(), SystemTime::now());
    store.save_team(team.clone()).await?;

    owner.team_id = Some(team.id);
    if let Err(err) = store.save_user(owner).await {
        // An unlinked team would hold its name forever.
        if let Err(cleanup) = store.delete_team(team.id).await {
            warn!(team_id = %team.id, error = %cleanup, "failed to remove unlinked team");
        }
        return Err(err.into());
    }

    info!(team_id = %team.id, team_name = %team.name, "team registered");
    Ok(team.into())
}

/// Every team, sorted by name.
pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamSummary>, ServiceError> {
    let store = state.require_store().await?;
    let mut teams = store.list_teams().await?;
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(teams.into_iter().map(Into::into).collect())
}

/// A single team.
pub async fn get_team(state: &SharedState, id: Uuid) -> Result<TeamSummary, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_team(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("team `{id}`")))
}

/// Team owned by the calling scorekeeper.
pub async fn my_team(state: &SharedState, caller_id: &str) -> Result<TeamSummary, ServiceError> {
    let store = state.require_store().await?;
    let owner = user_service::require_scorekeeper(&store, caller_id).await?;
    let team_id = owner
        .team_id
        .ok_or_else(|| ServiceError::NotFound("caller has not registered a team".into()))?;

    store
        .find_team(team_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}`")))
}

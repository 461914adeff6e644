use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{TEAM_SIZE, TeamEntity},
    dto::{format_system_time, validation::validate_display_name},
};

/// Payload used to register a team. The caller becomes Player A.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    pub name: String,
    /// Names of the three other players (Players B, C and D).
    pub teammates: Vec<String>,
}

impl Validate for CreateTeamRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_display_name(&self.name) {
            errors.add("name", e);
        }

        let expected = TEAM_SIZE - 1;
        if self.teammates.len() != expected {
            let mut err = ValidationError::new("teammates_count");
            err.message = Some(
                format!(
                    "Exactly {expected} teammates are required (got {})",
                    self.teammates.len()
                )
                .into(),
            );
            errors.add("teammates", err);
        } else if let Some(e) = self
            .teammates
            .iter()
            .find_map(|name| validate_display_name(name).err())
        {
            errors.add("teammates", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
/// One roster entry with its positional id.
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
/// Public projection of a team exposed to REST/SSE clients.
pub struct TeamSummary {
    pub id: Uuid,
    pub name: String,
    pub players: Vec<PlayerSummary>,
    pub scorekeeper_id: String,
    pub created_at: String,
}

impl From<TeamEntity> for TeamSummary {
    fn from(value: TeamEntity) -> Self {
        let players = value
            .roster()
            .map(|(id, name)| PlayerSummary {
                id,
                name: name.to_string(),
            })
            .collect();

        Self {
            id: value.id,
            name: value.name,
            players,
            scorekeeper_id: value.scorekeeper_id,
            created_at: format_system_time(value.created_at),
        }
    }
}

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the golf scoring backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sse::game_stream,
        crate::routes::users::register_profile,
        crate::routes::users::get_profile,
        crate::routes::teams::create_team,
        crate::routes::teams::list_teams,
        crate::routes::teams::my_team,
        crate::routes::teams::get_team,
        crate::routes::games::create_game,
        crate::routes::games::list_games,
        crate::routes::games::get_game,
        crate::routes::games::save_hole,
        crate::routes::games::finish_game,
        crate::routes::leaderboard::get_leaderboard,
        crate::routes::chat::list_messages,
        crate::routes::chat::post_message,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::user::RegisterProfileRequest,
            crate::dto::user::UserProfile,
            crate::dto::team::CreateTeamRequest,
            crate::dto::team::TeamSummary,
            crate::dto::team::PlayerSummary,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::SaveHoleRequest,
            crate::dto::game::GameSummary,
            crate::dto::game::GameScorecard,
            crate::dto::game::PlayerCard,
            crate::dto::leaderboard::LeaderboardScope,
            crate::dto::leaderboard::LeaderboardEntry,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::chat::PostChatMessageRequest,
            crate::dto::chat::ChatMessage,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
            crate::dto::sse::GameCreatedEvent,
            crate::dto::sse::GameCompletedEvent,
            crate::dao::models::UserRole,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "users", description = "Caller profile and role"),
        (name = "teams", description = "Team registration"),
        (name = "games", description = "Game lifecycle and hole-by-hole scoring"),
        (name = "leaderboard", description = "Best-two-of-four rankings"),
        (name = "chat", description = "Shared spectator chat"),
    )
)]
pub struct ApiDoc;

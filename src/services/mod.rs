/// Chat history and posting.
pub mod chat_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game lifecycle: start, list, scorecard, finish.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Leaderboard computation and live broadcast.
pub mod leaderboard_service;
/// Hole-by-hole score entry.
pub mod score_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervisor with reconnect backoff.
pub mod storage_supervisor;
/// Team registration and lookup.
pub mod team_service;
/// User profiles and role checks.
pub mod user_service;

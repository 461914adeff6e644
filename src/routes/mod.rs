use axum::Router;

use crate::state::SharedState;

pub mod chat;
pub mod docs;
pub mod games;
pub mod health;
pub mod identity;
pub mod leaderboard;
pub mod sse;
pub mod teams;
pub mod users;

/// Compose all route trees, including the Swagger UI, and attach the shared state.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(users::router())
        .merge(teams::router())
        .merge(games::router())
        .merge(leaderboard::router())
        .merge(chat::router())
        .merge(docs::router());

    api_router.with_state(state)
}

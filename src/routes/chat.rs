use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::chat::{ChatHistoryQuery, ChatMessage, PostChatMessageRequest},
    error::AppError,
    routes::identity::CallerId,
    services::chat_service,
    state::SharedState,
};
use validator::Validate;

#[utoipa::path(
    get,
    path = "/chat/messages",
    tag = "chat",
    params(ChatHistoryQuery),
    responses((status = 200, description = "Recent messages, oldest first", body = [ChatMessage]))
)]
/// Return the recent history of the shared chat.
pub async fn list_messages(
    State(state): State<SharedState>,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let messages = chat_service::list_messages(&state, query.limit).await?;
    Ok(Json(messages))
}

#[utoipa::path(
    post,
    path = "/chat/messages",
    tag = "chat",
    params(("X-User-Id" = String, Header, description = "Authenticated user id")),
    request_body = PostChatMessageRequest,
    responses(
        (status = 201, description = "Message posted", body = ChatMessage),
        (status = 400, description = "Blank or oversized message"),
        (status = 403, description = "Caller has no profile")
    )
)]
/// Post a message to the shared chat.
pub async fn post_message(
    State(state): State<SharedState>,
    CallerId(caller): CallerId,
    Json(payload): Json<PostChatMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), AppError> {
    payload.validate()?;
    let message = chat_service::post_message(&state, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Configure the chat routes.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/chat/messages", get(list_messages).post(post_message))
}

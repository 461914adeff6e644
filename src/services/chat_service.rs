use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::ChatMessageEntity,
    dto::chat::{ChatMessage, PostChatMessageRequest},
    error::ServiceError,
    services::{sse_events, user_service},
    state::SharedState,
};

/// Most recent messages of the shared channel, oldest first. A zero limit yields none.
pub async fn list_messages(
    state: &SharedState,
    limit: Option<usize>,
) -> Result<Vec<ChatMessage>, ServiceError> {
    let max = state.config().chat_history_limit();
    let limit = limit.map_or(max, |requested| requested.min(max));

    let store = state.require_store().await?;
    if limit == 0 {
        return Ok(Vec::new());
    }
    let messages = store
        .list_chat_messages(state.config().chat_channel().to_string(), limit)
        .await?;
    Ok(messages.into_iter().map(Into::into).collect())
}

/// Post a message as the caller, stamped with their name and role.
pub async fn post_message(
    state: &SharedState,
    caller_id: &str,
    request: PostChatMessageRequest,
) -> Result<ChatMessage, ServiceError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ServiceError::InvalidInput("message must not be blank".into()));
    }
    let max_len = state.config().chat_message_max_len();
    if text.chars().count() > max_len {
        return Err(ServiceError::InvalidInput(format!(
            "message must be at most {max_len} characters"
        )));
    }

    let store = state.require_store().await?;
    let sender = user_service::require_profile(&store, caller_id).await?;

    let entity = ChatMessageEntity {
        id: Uuid::new_v4(),
        channel: state.config().chat_channel().to_string(),
        text: text.to_string(),
        sender_id: sender.id,
        display_name: sender.full_name,
        role: sender.role,
        sent_at: SystemTime::now(),
    };
    store.append_chat_message(entity.clone()).await?;
    info!(message_id = %entity.id, sender_id = %entity.sender_id, "chat message posted");

    let message = ChatMessage::from(entity);
    sse_events::broadcast_chat_message(state, message.clone());
    Ok(message)
}

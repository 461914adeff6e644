use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{ChatMessageEntity, UserRole},
    dto::format_system_time,
};

/// Message posted by the caller. Surrounding whitespace is trimmed before storage.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PostChatMessageRequest {
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub text: String,
}

/// Query parameters of the chat history route.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChatHistoryQuery {
    /// Number of most recent messages, capped by the configured history limit.
    pub limit: Option<usize>,
}

/// Chat message as shown to clients.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender_id: String,
    pub display_name: String,
    pub role: UserRole,
    pub sent_at: String,
}

impl From<ChatMessageEntity> for ChatMessage {
    fn from(value: ChatMessageEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            sender_id: value.sender_id,
            display_name: value.display_name,
            role: value.role,
            sent_at: format_system_time(value.sent_at),
        }
    }
}

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use tracing::debug;

use super::{bad_id, bad_json};
use crate::models::{Conversation, ConversationId, Message, NewConversation};
use crate::state::AppState;
use crate::utils::error::ApiError;

pub async fn create_conversation_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewConversation>, JsonRejection>,
) -> Result<Json<Conversation>, ApiError> {
    let Json(input) = payload.map_err(|e| bad_json(e, "conversation"))?;

    let conversation = state
        .conversations
        .create_conversation(input.title, input.user_id)?;

    Ok(Json(conversation))
}

pub async fn get_conversation_handler(
    State(state): State<AppState>,
    id: Result<Path<ConversationId>, PathRejection>,
) -> Result<Json<Conversation>, ApiError> {
    let Path(id) = id.map_err(bad_id)?;

    state
        .conversations
        .get_conversation(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("conversation {}", id)))
}

/// Ordered history; an unknown conversation yields an empty list.
pub async fn list_messages_handler(
    State(state): State<AppState>,
    id: Result<Path<ConversationId>, PathRejection>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let Path(id) = id.map_err(bad_id)?;

    let messages = state.conversations.get_history(id);
    debug!(conversation_id = id, count = messages.len(), "Listing messages");

    Ok(Json(messages))
}

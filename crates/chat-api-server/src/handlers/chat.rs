use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use super::bad_json;
use crate::models::{ChatRequest, ChatResponse};
use crate::services::ChatTurnRequest;
use crate::state::AppState;
use crate::utils::error::ApiError;

pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_json(e, "chat"))?;

    if request.message.is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    info!(
        conversation_id = ?request.conversation_id,
        web_search_enabled = request.web_search_enabled,
        has_profile = request.user_profile.is_some(),
        "Chat request received"
    );

    let outcome = state
        .chat_service
        .handle_turn(ChatTurnRequest {
            message: request.message,
            conversation_id: request.conversation_id,
            web_search_enabled: request.web_search_enabled,
            user_profile: request.user_profile,
        })
        .await?;

    Ok(Json(ChatResponse {
        message: outcome.reply,
        conversation_id: outcome.conversation_id,
    }))
}

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use super::{bad_id, bad_json};
use crate::models::{Conversation, NewUser, User, UserId};
use crate::state::AppState;
use crate::utils::error::ApiError;

pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(input) = payload.map_err(|e| bad_json(e, "user"))?;
    let user = state.conversations.create_user(input.username)?;

    Ok(Json(user))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let Path(id) = id.map_err(bad_id)?;

    state
        .conversations
        .get_user(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))
}

pub async fn list_user_conversations_handler(
    State(state): State<AppState>,
    id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<Vec<Conversation>>, ApiError> {
    let Path(id) = id.map_err(bad_id)?;

    if state.conversations.get_user(id).is_none() {
        return Err(ApiError::NotFound(format!("user {}", id)));
    }

    Ok(Json(state.conversations.conversations_for_user(id)))
}

pub mod chat;
pub mod conversations;
pub mod health;
pub mod users;

use axum::extract::rejection::{JsonRejection, PathRejection};

use crate::utils::error::ApiError;

pub(crate) fn bad_json(rejection: JsonRejection, what: &str) -> ApiError {
    tracing::debug!("Rejected {} payload: {}", what, rejection.body_text());
    ApiError::BadRequest(format!("Invalid {} data", what))
}

pub(crate) fn bad_id(rejection: PathRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid id: {}", rejection.body_text()))
}

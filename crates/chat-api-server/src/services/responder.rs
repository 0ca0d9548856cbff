use async_trait::async_trait;
use thiserror::Error;

use crate::models::ChatTurn;

/// Everything the model needs for one reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderRequest {
    pub system_prompt: String,
    /// Windowed history, oldest first, ending with the current user turn.
    pub messages: Vec<ChatTurn>,
    /// Formatted web search results, when search was enabled.
    pub search_context: Option<String>,
}

impl ResponderRequest {
    pub fn has_search_context(&self) -> bool {
        self.search_context
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub content: String,
    pub web_search_used: bool,
}

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("model api request failed: {0}")]
    RequestFailed(String),

    #[error("model api error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// Hosted language model that turns history into a reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelResponder: Send + Sync {
    async fn respond(&self, request: ResponderRequest) -> Result<ModelReply, ResponderError>;
}

use std::sync::Arc;

use crate::services::{ChatService, ConversationService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub conversations: ConversationService,
    pub chat_service: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat_service: ChatService) -> Self {
        Self {
            conversations: chat_service.conversations().clone(),
            chat_service: Arc::new(chat_service),
        }
    }
}

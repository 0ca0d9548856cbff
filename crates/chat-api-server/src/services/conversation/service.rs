use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{
    Conversation, ConversationId, Message, NewConversation, NewMessage, NewUser, User, UserId,
};
use crate::store::{Storage, StoreError};

/// Characters of the first message kept in an implicit conversation title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Chat-turn semantics on top of the entity store.
///
/// Holds no state of its own; every read goes through the store.
#[derive(Clone)]
pub struct ConversationService {
    storage: Arc<dyn Storage>,
    title_max_chars: usize,
}

impl ConversationService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            title_max_chars: TITLE_MAX_CHARS,
        }
    }

    pub fn with_title_max_chars(mut self, title_max_chars: usize) -> Self {
        self.title_max_chars = title_max_chars;
        self
    }

    pub fn create_conversation(
        &self,
        title: Option<String>,
        user_id: Option<UserId>,
    ) -> Result<Conversation, StoreError> {
        let conversation = self
            .storage
            .create_conversation(NewConversation { title, user_id })?;
        info!(
            conversation_id = conversation.id,
            title = %conversation.title,
            "Conversation created"
        );
        Ok(conversation)
    }

    /// Returns `conversation_id` unchanged when given. Otherwise creates a
    /// conversation titled after `first_message`.
    ///
    /// An unknown id is not checked here; recording a turn against it fails
    /// with `NotFound`.
    pub fn start_or_continue(
        &self,
        conversation_id: Option<ConversationId>,
        first_message: &str,
    ) -> Result<ConversationId, StoreError> {
        if let Some(id) = conversation_id {
            debug!(conversation_id = id, "Continuing conversation");
            return Ok(id);
        }

        let title = derive_title(first_message, self.title_max_chars);
        let conversation = self.create_conversation(Some(title), None)?;
        Ok(conversation.id)
    }

    pub fn record_user_turn(
        &self,
        conversation_id: ConversationId,
        content: &str,
    ) -> Result<Message, StoreError> {
        self.storage
            .create_message(NewMessage::user(conversation_id, content))
    }

    pub fn record_assistant_turn(
        &self,
        conversation_id: ConversationId,
        content: &str,
        web_search_used: bool,
    ) -> Result<Message, StoreError> {
        self.storage.create_message(NewMessage::assistant(
            conversation_id,
            content,
            web_search_used,
        ))
    }

    pub fn get_history(&self, conversation_id: ConversationId) -> Vec<Message> {
        self.storage.get_messages_by_conversation_id(conversation_id)
    }

    pub fn get_conversation(&self, id: ConversationId) -> Option<Conversation> {
        self.storage.get_conversation(id)
    }

    pub fn conversations_for_user(&self, user_id: UserId) -> Vec<Conversation> {
        self.storage.get_conversations_by_user_id(user_id)
    }

    pub fn create_user(&self, username: String) -> Result<User, StoreError> {
        let user = self.storage.create_user(NewUser { username })?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Option<User> {
        self.storage.get_user(id)
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.storage.get_user_by_username(username)
    }
}

/// First `max_chars` characters of `message`, plus `"..."` when it was cut.
pub fn derive_title(message: &str, max_chars: usize) -> String {
    let mut chars = message.chars();
    let head: String = chars.by_ref().take(max_chars).collect();

    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

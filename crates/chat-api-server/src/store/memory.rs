use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use super::{Storage, StoreError};
use crate::models::{
    Conversation, ConversationId, Message, MessageId, NewConversation, NewMessage, NewUser, User,
    UserId, DEFAULT_CONVERSATION_TITLE,
};

/// Process-lifetime, in-memory store.
///
/// All maps, secondary indexes and id counters live behind a single lock, so
/// every create is one atomic insertion and listings never observe a
/// half-applied write.
pub struct MemStorage {
    inner: RwLock<Inner>,
}

struct Inner {
    users: BTreeMap<UserId, User>,
    conversations: BTreeMap<ConversationId, Conversation>,
    messages: BTreeMap<MessageId, Message>,

    /// username -> user id
    usernames: HashMap<String, UserId>,
    /// conversation id -> message ids in insertion order
    conversation_messages: HashMap<ConversationId, Vec<MessageId>>,

    next_user_id: UserId,
    next_conversation_id: ConversationId,
    next_message_id: MessageId,
}

impl MemStorage {
    pub fn new() -> Self {
        info!("Initializing in-memory entity store");
        Self {
            inner: RwLock::new(Inner {
                users: BTreeMap::new(),
                conversations: BTreeMap::new(),
                messages: BTreeMap::new(),
                usernames: HashMap::new(),
                conversation_messages: HashMap::new(),
                next_user_id: 1,
                next_conversation_id: 1,
                next_message_id: 1,
            }),
        }
    }

    /// Entity counts (users, conversations, messages).
    pub fn counts(&self) -> (usize, usize, usize) {
        let inner = self.inner.read();
        (
            inner.users.len(),
            inner.conversations.len(),
            inner.messages.len(),
        )
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    fn create_user(&self, input: NewUser) -> Result<User, StoreError> {
        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(StoreError::Validation("username must not be empty".to_string()));
        }

        let mut inner = self.inner.write();
        if inner.usernames.contains_key(&username) {
            return Err(StoreError::Validation(format!(
                "username '{}' is already taken",
                username
            )));
        }

        let id = inner.next_user_id;
        inner.next_user_id += 1;

        let user = User { id, username };
        inner.usernames.insert(user.username.clone(), id);
        inner.users.insert(id, user.clone());

        debug!(user_id = id, "Created user");
        Ok(user)
    }

    fn get_user(&self, id: UserId) -> Option<User> {
        self.inner.read().users.get(&id).cloned()
    }

    fn get_user_by_username(&self, username: &str) -> Option<User> {
        let inner = self.inner.read();
        let id = inner.usernames.get(username)?;
        inner.users.get(id).cloned()
    }

    fn create_conversation(&self, input: NewConversation) -> Result<Conversation, StoreError> {
        let title = input
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_CONVERSATION_TITLE.to_string());

        let mut inner = self.inner.write();
        if let Some(user_id) = input.user_id {
            if !inner.users.contains_key(&user_id) {
                return Err(StoreError::NotFound(format!("user {}", user_id)));
            }
        }

        let id = inner.next_conversation_id;
        inner.next_conversation_id += 1;

        let conversation = Conversation {
            id,
            title,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        inner.conversations.insert(id, conversation.clone());

        debug!(conversation_id = id, user_id = ?input.user_id, "Created conversation");
        Ok(conversation)
    }

    fn get_conversation(&self, id: ConversationId) -> Option<Conversation> {
        self.inner.read().conversations.get(&id).cloned()
    }

    fn get_conversations_by_user_id(&self, user_id: UserId) -> Vec<Conversation> {
        self.inner
            .read()
            .conversations
            .values()
            .filter(|c| c.user_id == Some(user_id))
            .cloned()
            .collect()
    }

    fn create_message(&self, input: NewMessage) -> Result<Message, StoreError> {
        if input.content.trim().is_empty() {
            return Err(StoreError::Validation(
                "message content must not be empty".to_string(),
            ));
        }

        let mut inner = self.inner.write();
        if !inner.conversations.contains_key(&input.conversation_id) {
            return Err(StoreError::NotFound(format!(
                "conversation {}",
                input.conversation_id
            )));
        }

        let id = inner.next_message_id;
        inner.next_message_id += 1;

        let message = Message {
            id,
            conversation_id: input.conversation_id,
            role: input.role,
            content: input.content,
            web_search_used: input.web_search_used.unwrap_or(false),
            created_at: input.created_at.unwrap_or_else(Utc::now),
        };
        inner
            .conversation_messages
            .entry(message.conversation_id)
            .or_default()
            .push(id);
        inner.messages.insert(id, message.clone());

        debug!(
            message_id = id,
            conversation_id = message.conversation_id,
            role = %message.role,
            "Appended message"
        );
        Ok(message)
    }

    fn get_message(&self, id: MessageId) -> Option<Message> {
        self.inner.read().messages.get(&id).cloned()
    }

    fn get_messages_by_conversation_id(&self, conversation_id: ConversationId) -> Vec<Message> {
        let inner = self.inner.read();
        let Some(ids) = inner.conversation_messages.get(&conversation_id) else {
            return Vec::new();
        };

        let mut messages: Vec<Message> = ids
            .iter()
            .filter_map(|id| inner.messages.get(id).cloned())
            .collect();
        drop(inner);

        // Ids grow with insertion, so they break timestamp ties.
        messages.sort_by_key(|m| (m.created_at, m.id));
        messages
    }
}

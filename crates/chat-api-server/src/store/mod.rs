//! Entity store for users, conversations and messages.
//!
//! The store is the sole authority for identity allocation. Each entity kind
//! draws ids from its own counter starting at 1; ids are never reused.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemStorage;

use crate::models::{
    Conversation, ConversationId, Message, MessageId, NewConversation, NewMessage, NewUser, User,
    UserId,
};

/// Storage surface shared by the services. Reads return `None` or an empty
/// `Vec` for missing entities; only creates can fail.
pub trait Storage: Send + Sync {
    fn create_user(&self, input: NewUser) -> Result<User, StoreError>;
    fn get_user(&self, id: UserId) -> Option<User>;
    fn get_user_by_username(&self, username: &str) -> Option<User>;

    fn create_conversation(&self, input: NewConversation) -> Result<Conversation, StoreError>;
    fn get_conversation(&self, id: ConversationId) -> Option<Conversation>;
    fn get_conversations_by_user_id(&self, user_id: UserId) -> Vec<Conversation>;

    fn create_message(&self, input: NewMessage) -> Result<Message, StoreError>;
    fn get_message(&self, id: MessageId) -> Option<Message>;
    /// Messages of one conversation, oldest first. Equal timestamps keep
    /// insertion order.
    fn get_messages_by_conversation_id(&self, conversation_id: ConversationId) -> Vec<Message>;
}

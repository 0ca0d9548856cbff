pub mod chat;
pub mod entity;

pub use chat::{ChatRequest, ChatResponse, ChatTurn, UserProfile};
pub use entity::{
    Conversation, ConversationId, Message, MessageId, MessageRole, NewConversation, NewMessage,
    NewUser, User, UserId, DEFAULT_CONVERSATION_TITLE,
};

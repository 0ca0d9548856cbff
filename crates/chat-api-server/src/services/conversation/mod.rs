//! Conversation lifecycle and history windowing
//!
//! - Conversation creation, titling and turn recording on top of the store
//! - Fixed-size sliding window over ordered history for the model call

mod context_window;
mod service;

pub use context_window::{ContextWindow, DEFAULT_CONTEXT_WINDOW};
pub use service::{derive_title, ConversationService, TITLE_MAX_CHARS};

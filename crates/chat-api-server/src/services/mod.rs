pub mod chat;
pub mod conversation;
pub mod gemini;
pub mod prompt;
pub mod responder;
pub mod web_search;

pub use chat::{ChatService, ChatTurnOutcome, ChatTurnRequest};
pub use conversation::{ContextWindow, ConversationService};
pub use gemini::GeminiResponder;
pub use prompt::PromptBuilder;
pub use responder::{ModelReply, ModelResponder, ResponderError, ResponderRequest};
pub use web_search::{
    format_search_results, DuckDuckGoSearch, SearchProvider, SearchResponse, WebSearchResult,
};

pub mod settings;

pub use settings::{ChatConfig, LlmConfig, LoggingConfig, SearchConfig, ServerConfig, Settings};

use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::services::conversation::{DEFAULT_CONTEXT_WINDOW, TITLE_MAX_CHARS};
use crate::services::PromptBuilder;

const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    /// Daily rolling log files are written here when set.
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub max_results: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatConfig {
    /// Most recent messages sent to the model.
    pub context_window: usize,
    pub title_max_chars: usize,
    pub system_prompt: String,
}

impl Settings {
    /// Defaults, then `config/settings.toml` if present, then `APP__*`
    /// environment variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info,chat_api_server=debug")?
            .set_default("logging.json", true)?
            .set_default("llm.base_url", "https://generativelanguage.googleapis.com")?
            .set_default("llm.model", "gemini-2.5-flash")?
            .set_default("llm.temperature", 0.7)?
            .set_default("llm.max_output_tokens", 1000)?
            .set_default("llm.timeout_seconds", 60)?
            .set_default("search.base_url", "https://api.duckduckgo.com/")?
            .set_default("search.max_results", 5)?
            .set_default("search.timeout_seconds", 10)?
            .set_default("chat.context_window", DEFAULT_CONTEXT_WINDOW as u64)?
            .set_default("chat.title_max_chars", TITLE_MAX_CHARS as u64)?
            .set_default("chat.system_prompt", PromptBuilder::default_persona())?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;

        if settings.llm.api_key.is_empty() {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                settings.llm.api_key = key;
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load_from("does/not/exist").unwrap();

        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.chat.context_window, 10);
        assert_eq!(settings.chat.title_max_chars, 50);
        assert_eq!(settings.search.max_results, 5);
        assert_eq!(settings.llm.model, "gemini-2.5-flash");
        assert_eq!(settings.llm.max_output_tokens, 1000);
        assert!(settings.logging.directory.is_none());
        assert!(settings.chat.system_prompt.starts_with("You are Cloud"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("chat-api-settings-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 8081\n\n[chat]\ncontext_window = 4\nsystem_prompt = \"Be brief.\""
        )
        .unwrap();

        let base = path.with_extension("");
        let settings = Settings::load_from(base.to_str().unwrap()).unwrap();

        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.chat.context_window, 4);
        assert_eq!(settings.chat.system_prompt, "Be brief.");

        std::fs::remove_dir_all(&dir).ok();
    }
}

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use chat_api_server::build_router;
use chat_api_server::config::Settings;
use chat_api_server::logging::init_logging;
use chat_api_server::services::{
    ChatService, ContextWindow, ConversationService, DuckDuckGoSearch, GeminiResponder,
    PromptBuilder,
};
use chat_api_server::state::AppState;
use chat_api_server::store::MemStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::load()?;

    // Initialize logging
    let _log_guard = init_logging(&settings.logging);

    info!("🚀 Starting Chat API Server...");

    if settings.llm.api_key.is_empty() {
        warn!("No Gemini API key configured (APP__LLM__API_KEY or GEMINI_API_KEY)");
    }

    // Entity store lives for the whole process
    let storage = Arc::new(MemStorage::new());

    // Initialize services
    let conversations = ConversationService::new(storage)
        .with_title_max_chars(settings.chat.title_max_chars);

    let chat_service = ChatService::new(
        conversations,
        ContextWindow::new(settings.chat.context_window),
        PromptBuilder::new(settings.chat.system_prompt.clone()),
        Arc::new(GeminiResponder::new(settings.llm.clone())),
        Arc::new(DuckDuckGoSearch::new(settings.search.clone())),
    );
    info!(
        context_window = settings.chat.context_window,
        model = %settings.llm.model,
        "✅ Services initialized"
    );

    let app = build_router(AppState::new(chat_service));

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

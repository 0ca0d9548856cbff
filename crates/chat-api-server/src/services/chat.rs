use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::models::{ConversationId, Message, UserProfile};
use crate::store::StoreError;

use super::conversation::{ContextWindow, ConversationService};
use super::prompt::PromptBuilder;
use super::responder::{ModelResponder, ResponderError, ResponderRequest};
use super::web_search::{format_search_results, SearchProvider};

#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Responder(#[from] ResponderError),
}

#[derive(Debug, Clone)]
pub struct ChatTurnRequest {
    pub message: String,
    pub conversation_id: Option<ConversationId>,
    pub web_search_enabled: bool,
    pub user_profile: Option<UserProfile>,
}

#[derive(Debug, Clone)]
pub struct ChatTurnOutcome {
    pub conversation_id: ConversationId,
    pub reply: Message,
}

/// Runs one chat turn: persist the user message, gather context, ask the
/// model, persist the reply.
pub struct ChatService {
    conversations: ConversationService,
    window: ContextWindow,
    prompts: PromptBuilder,
    responder: Arc<dyn ModelResponder>,
    search: Arc<dyn SearchProvider>,
}

impl ChatService {
    pub fn new(
        conversations: ConversationService,
        window: ContextWindow,
        prompts: PromptBuilder,
        responder: Arc<dyn ModelResponder>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            conversations,
            window,
            prompts,
            responder,
            search,
        }
    }

    pub fn conversations(&self) -> &ConversationService {
        &self.conversations
    }

    /// The user turn is stored before any external call and stays stored if
    /// the model call fails. The reply is stored only after the model returns.
    pub async fn handle_turn(&self, request: ChatTurnRequest) -> Result<ChatTurnOutcome, ChatError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("chat_turn", %request_id);

        self.run_turn(request).instrument(span).await
    }

    async fn run_turn(&self, request: ChatTurnRequest) -> Result<ChatTurnOutcome, ChatError> {
        let start_time = Instant::now();

        if request.message.trim().is_empty() {
            return Err(StoreError::Validation("message must not be empty".to_string()).into());
        }

        let conversation_id = self
            .conversations
            .start_or_continue(request.conversation_id, &request.message)?;

        info!(
            conversation_id,
            message_len = request.message.len(),
            web_search = request.web_search_enabled,
            "Chat turn started"
        );

        self.conversations
            .record_user_turn(conversation_id, &request.message)?;

        let history = self.conversations.get_history(conversation_id);
        let messages = self.window.build(&history);
        debug!(
            history = history.len(),
            windowed = messages.len(),
            "Context window built"
        );

        let search_context = if request.web_search_enabled {
            let response = self.search.search(&request.message).await;
            debug!(results = response.results.len(), "Search context gathered");
            Some(format_search_results(&response))
        } else {
            None
        };

        let responder_request = ResponderRequest {
            system_prompt: self.prompts.build(request.user_profile.as_ref()),
            messages,
            search_context,
        };

        let reply = self
            .responder
            .respond(responder_request)
            .await
            .map_err(|e| {
                error!(conversation_id, "Model responder failed: {}", e);
                e
            })?;

        let stored = self.conversations.record_assistant_turn(
            conversation_id,
            &reply.content,
            reply.web_search_used,
        )?;

        info!(
            conversation_id,
            message_id = stored.id,
            web_search_used = stored.web_search_used,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Chat turn completed"
        );

        Ok(ChatTurnOutcome {
            conversation_id,
            reply: stored,
        })
    }
}

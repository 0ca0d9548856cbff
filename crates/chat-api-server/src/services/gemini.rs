use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::LlmConfig;
use crate::models::{ChatTurn, MessageRole};

use super::responder::{ModelReply, ModelResponder, ResponderError, ResponderRequest};

const EMPTY_REPLY_FALLBACK: &str = "I'm sorry, I couldn't generate a response.";

/// Google Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiResponder {
    client: Client,
    config: LlmConfig,
}

// ===== REQUEST STRUCTURES =====

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// ===== RESPONSE STRUCTURES =====

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: GeminiContent,
}

impl GeminiResponder {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Persona prompt plus the search results section, when present.
    fn system_instruction(request: &ResponderRequest) -> String {
        match request.search_context.as_deref() {
            Some(context) if request.has_search_context() => format!(
                "{}\n\nYou have access to current web search results. Use this information to \
                 provide up-to-date and accurate responses. Here are the search results:\n\n{}",
                request.system_prompt, context
            ),
            _ => request.system_prompt.clone(),
        }
    }

    fn to_content(turn: &ChatTurn) -> GeminiContent {
        let role = match turn.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "model",
        };
        GeminiContent {
            role: Some(role.to_string()),
            parts: vec![GeminiPart {
                text: Some(turn.content.clone()),
            }],
        }
    }

    fn build_request(&self, request: &ResponderRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(Self::system_instruction(request)),
                }],
            },
            contents: request.messages.iter().map(Self::to_content).collect(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl ModelResponder for GeminiResponder {
    async fn respond(&self, request: ResponderRequest) -> Result<ModelReply, ResponderError> {
        if request.messages.is_empty() {
            return Err(ResponderError::RequestFailed(
                "no messages to send".to_string(),
            ));
        }

        debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            with_search = request.has_search_context(),
            "Calling Gemini generateContent"
        );

        let body = self.build_request(&request);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini network error: {}", e);
                ResponderError::RequestFailed(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, "Gemini API error: {}", body);
            return Err(ResponderError::Api { status, body });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ResponderError::InvalidResponse(e.to_string()))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        let content = if text.trim().is_empty() {
            EMPTY_REPLY_FALLBACK.to_string()
        } else {
            text
        };

        Ok(ModelReply {
            content,
            web_search_used: request.has_search_context(),
        })
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use mockall::mock;
use serde_json::{json, Value};
use tower::ServiceExt;

use chat_api_server::build_router;
use chat_api_server::services::{
    ChatService, ContextWindow, ConversationService, ModelReply, ModelResponder, PromptBuilder,
    ResponderError, ResponderRequest, SearchProvider, SearchResponse,
};
use chat_api_server::state::AppState;
use chat_api_server::store::MemStorage;

mock! {
    Responder {}

    #[async_trait]
    impl ModelResponder for Responder {
        async fn respond(&self, request: ResponderRequest) -> Result<ModelReply, ResponderError>;
    }
}

mock! {
    Search {}

    #[async_trait]
    impl SearchProvider for Search {
        async fn search(&self, query: &str) -> SearchResponse;
    }
}

fn test_app(responder: MockResponder, search: MockSearch) -> (Router, ConversationService) {
    let conversations = ConversationService::new(Arc::new(MemStorage::new()));
    let chat_service = ChatService::new(
        conversations.clone(),
        ContextWindow::default(),
        PromptBuilder::new("test persona".to_string()),
        Arc::new(responder),
        Arc::new(search),
    );

    (build_router(AppState::new(chat_service)), conversations)
}

fn echo_responder() -> MockResponder {
    let mut responder = MockResponder::new();
    responder.expect_respond().returning(|req| {
        let last = req.messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(ModelReply {
            content: format!("echo: {}", last),
            web_search_used: req.has_search_context(),
        })
    });
    responder
}

fn empty_search() -> MockSearch {
    let mut search = MockSearch::new();
    search
        .expect_search()
        .returning(|q| SearchResponse::empty(q));
    search
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app(MockResponder::new(), MockSearch::new());
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_conversation_defaults_title() {
    let (app, _) = test_app(MockResponder::new(), MockSearch::new());
    let (status, body) = send(&app, post_json("/api/conversations", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "New Chat");
    assert_eq!(body["userId"], Value::Null);
    assert!(body["createdAt"].is_string());

    let (_, second) = send(
        &app,
        post_json("/api/conversations", json!({ "title": "Recipes" })),
    )
    .await;
    assert_eq!(second["id"], 2);
    assert_eq!(second["title"], "Recipes");
}

#[tokio::test]
async fn test_create_conversation_rejects_bad_payload() {
    let (app, _) = test_app(MockResponder::new(), MockSearch::new());
    let (status, body) = send(
        &app,
        post_json("/api/conversations", json!({ "title": 12 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");
    assert_eq!(body["message"], "Invalid conversation data");
}

#[tokio::test]
async fn test_messages_for_unknown_conversation_is_empty() {
    let (app, _) = test_app(MockResponder::new(), MockSearch::new());
    let (status, body) = send(&app, get("/api/conversations/42/messages")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let (app, _) = test_app(MockResponder::new(), MockSearch::new());
    let (status, _) = send(&app, get("/api/conversations/abc/messages")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_creates_conversation_and_records_turns() {
    let (app, conversations) = test_app(echo_responder(), empty_search());

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat",
            json!({ "message": "Hello", "webSearchEnabled": false }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversationId"], 1);
    assert_eq!(body["message"]["role"], "assistant");
    assert_eq!(body["message"]["content"], "echo: Hello");
    assert_eq!(body["message"]["webSearchUsed"], false);

    let conversation = conversations.get_conversation(1).unwrap();
    assert_eq!(conversation.title, "Hello");

    let (status, history) = send(&app, get("/api/conversations/1/messages")).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[0]["content"], "Hello");
    assert_eq!(history[1]["role"], "assistant");
}

#[tokio::test]
async fn test_chat_continues_existing_conversation() {
    let (app, conversations) = test_app(echo_responder(), empty_search());
    let (_, first) = send(&app, post_json("/api/chat", json!({ "message": "One" }))).await;
    let id = first["conversationId"].as_u64().unwrap();

    let (status, second) = send(
        &app,
        post_json("/api/chat", json!({ "message": "Two", "conversationId": id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["conversationId"], id);
    assert_eq!(conversations.get_history(id).len(), 4);
}

#[tokio::test]
async fn test_chat_with_failed_search_still_completes() {
    let (app, conversations) = test_app(echo_responder(), empty_search());

    let (status, body) = send(
        &app,
        post_json("/api/chat", json!({ "message": "latest rust release?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["webSearchUsed"], true);
    assert_eq!(conversations.get_history(1).len(), 2);
}

#[tokio::test]
async fn test_chat_long_message_titles_conversation() {
    let (app, conversations) = test_app(echo_responder(), empty_search());
    let message = "x".repeat(80);

    send(
        &app,
        post_json(
            "/api/chat",
            json!({ "message": message, "webSearchEnabled": false }),
        ),
    )
    .await;

    let title = conversations.get_conversation(1).unwrap().title;
    assert_eq!(title, format!("{}...", "x".repeat(50)));
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let mut responder = MockResponder::new();
    responder.expect_respond().never();
    let (app, conversations) = test_app(responder, MockSearch::new());

    let (status, _) = send(&app, post_json("/api/chat", json!({ "message": "" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(conversations.get_conversation(1).is_none());
}

#[tokio::test]
async fn test_chat_unknown_conversation_is_not_found() {
    let mut responder = MockResponder::new();
    responder.expect_respond().never();
    let (app, _) = test_app(responder, MockSearch::new());

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat",
            json!({ "message": "Hi", "conversationId": 9, "webSearchEnabled": false }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn test_chat_responder_failure_is_distinct_and_keeps_user_turn() {
    let mut responder = MockResponder::new();
    responder
        .expect_respond()
        .returning(|_| Err(ResponderError::RequestFailed("connection reset".to_string())));
    let (app, conversations) = test_app(responder, MockSearch::new());

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat",
            json!({ "message": "Anyone there?", "webSearchEnabled": false }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "LlmError");

    let history = conversations.get_history(1);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "Anyone there?");
}

#[tokio::test]
async fn test_users_and_owned_conversations() {
    let (app, _) = test_app(MockResponder::new(), MockSearch::new());

    let (status, user) = send(&app, post_json("/api/users", json!({ "username": "ada" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], 1);

    let (status, _) = send(&app, post_json("/api/users", json!({ "username": "ada" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, conversation) = send(
        &app,
        post_json("/api/conversations", json!({ "title": "Mine", "userId": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(conversation["userId"], 1);

    let (status, owned) = send(&app, get("/api/users/1/conversations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owned.as_array().unwrap().len(), 1);
    assert_eq!(owned[0]["title"], "Mine");

    let (status, _) = send(&app, get("/api/users/2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        post_json("/api/conversations", json!({ "userId": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_conversation() {
    let (app, _) = test_app(MockResponder::new(), MockSearch::new());
    send(&app, post_json("/api/conversations", json!({ "title": "Hi" }))).await;

    let (status, body) = send(&app, get("/api/conversations/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Hi");

    let (status, _) = send(&app, get("/api/conversations/2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/chat", post(handlers::chat::chat_handler))
        .route(
            "/api/conversations",
            post(handlers::conversations::create_conversation_handler),
        )
        .route(
            "/api/conversations/{id}",
            get(handlers::conversations::get_conversation_handler),
        )
        .route(
            "/api/conversations/{id}/messages",
            get(handlers::conversations::list_messages_handler),
        )
        .route("/api/users", post(handlers::users::create_user_handler))
        .route("/api/users/{id}", get(handlers::users::get_user_handler))
        .route(
            "/api/users/{id}/conversations",
            get(handlers::users::list_user_conversations_handler),
        );

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes)
        .with_state(state)
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

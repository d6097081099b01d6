use axum::{Router, routing::{get, post}};
use crate::handler::chat_handler::{
    credential_status_handler,
    set_credential_handler,
    reset_credential_handler,
    list_messages_handler,
    send_message_handler,
    close_chat_handler,
};
use std::sync::Arc;
use crate::service::chat_service::ChatServiceImpl;

pub fn chat_router(service: Arc<ChatServiceImpl>) -> Router {
    Router::new()
        .route(
            "/chat/credential",
            get(credential_status_handler).put(set_credential_handler).delete(reset_credential_handler),
        )
        .route("/chat/messages", get(list_messages_handler).post(send_message_handler))
        .route("/chat/close", post(close_chat_handler))
        .with_state(service)
}

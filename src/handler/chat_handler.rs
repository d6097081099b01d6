use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use validator::Validate;

use crate::service::chat_service::{ChatService, ChatServiceImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};

#[derive(Debug, Deserialize, Validate)]
pub struct SetCredentialRequest {
    #[validate(length(min = 1, max = 512))]
    pub api_key: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

pub async fn credential_status_handler(
    State(service): State<Arc<ChatServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.credential_status().await?))
}

pub async fn set_credential_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Json(payload): Json<SetCredentialRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::new(HandlerErrorKind::Validation, format!("Validation error: {}", e)));
    }
    Ok(Json(service.set_credential(&payload.api_key).await?))
}

pub async fn reset_credential_handler(
    State(service): State<Arc<ChatServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.reset_credential().await?))
}

pub async fn list_messages_handler(
    State(service): State<Arc<ChatServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.open_panel().await?))
}

// Handler: Send Chat Message. Responds with the assistant reply.
pub async fn send_message_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::new(HandlerErrorKind::Validation, format!("Validation error: {}", e)));
    }
    Ok(Json(service.send_message(&payload.message).await?))
}

pub async fn close_chat_handler(State(service): State<Arc<ChatServiceImpl>>) -> impl IntoResponse {
    service.close_panel().await;
    Json(serde_json::json!({ "closed": true }))
}
